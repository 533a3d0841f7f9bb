//! # IDs
//! Layers (and anything else that needs an identity for one run of the program)
//! are named by `UniqueId<T>`, unique within this execution and namespaced by
//! the marker type `T`. Values carry no meaning across executions - never
//! persist them.
//!
//! Use the `Default` impl to allocate the next ID in a namespace.

// Next available value per namespace. The map is only written the first time a
// namespace is seen; afterwards allocation is a single relaxed fetch-add.
static ID_SERVER: parking_lot::RwLock<
    std::collections::BTreeMap<std::any::TypeId, std::sync::atomic::AtomicU64>,
> = parking_lot::const_rwlock(std::collections::BTreeMap::new());

/// ID that is guaranteed unique within this execution of the program.
/// IDs with different namespace types may share a numeric value but should
/// never be considered equal.
pub struct UniqueId<T: std::any::Any> {
    id: std::num::NonZeroU64,
    // Namespace marker
    _phantom: std::marker::PhantomData<T>,
}
impl<T: std::any::Any> Clone for UniqueId<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T: std::any::Any> Copy for UniqueId<T> {}
impl<T: std::any::Any> std::cmp::PartialEq<UniqueId<T>> for UniqueId<T> {
    fn eq(&self, other: &UniqueId<T>) -> bool {
        // Namespaces already agree at compile time.
        self.id == other.id
    }
}
impl<T: std::any::Any> std::cmp::Eq for UniqueId<T> {}

// Safety - it's just a u64. If T is !Send or !Sync that would be carried over
// to the ID even though no T is ever stored.
unsafe impl<T: std::any::Any> Send for UniqueId<T> {}
unsafe impl<T: std::any::Any> Sync for UniqueId<T> {}

impl<T: std::any::Any> std::hash::Hash for UniqueId<T> {
    /// Hashes include the `TypeId` of the namespace, whose representation is
    /// unstable between compilations. Do not compare hashes from different
    /// executions of the program.
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::any::TypeId::of::<T>().hash(state);
        self.id.hash(state);
    }
}

impl<T: std::any::Any> UniqueId<T> {
    /// Get the raw numeric value of this ID.
    /// IDs from differing namespaces may share the same numeric ID!
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id.get()
    }
    /// Allocate the next ID in this namespace.
    #[must_use]
    pub fn next() -> Self {
        // Zero is reserved as invalid; counters start at one.
        let raw = {
            let read = ID_SERVER.upgradable_read();
            let ty = std::any::TypeId::of::<T>();
            if let Some(atomic) = read.get(&ty) {
                atomic.fetch_add(1, std::sync::atomic::Ordering::Relaxed)
            } else {
                // First allocation in this namespace - transition to exclusive
                // access. Happens at most a handful of times per program run.
                let mut write = parking_lot::RwLockUpgradableReadGuard::upgrade(read);
                write.insert(ty, 2.into());
                1
            }
        };

        match std::num::NonZeroU64::new(raw) {
            Some(id) => Self {
                id,
                _phantom: std::marker::PhantomData,
            },
            // The counter wrapped: all u64::MAX - 1 values of this namespace
            // are spent and uniqueness can no longer be upheld.
            None => {
                // In builds, terminate. Under test, panic, so that exhaustion
                // behavior itself is testable.
                #[cfg(not(test))]
                {
                    log::error!("{} ID overflow! Aborting!", std::any::type_name::<T>());
                    log::logger().flush();
                    std::process::abort()
                }
                #[cfg(test)]
                {
                    panic!("{} ID overflow! Aborting!", std::any::type_name::<T>())
                }
            }
        }
    }
}
impl<T: std::any::Any> Default for UniqueId<T> {
    fn default() -> Self {
        Self::next()
    }
}
impl<T: std::any::Any> std::fmt::Display for UniqueId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Unwrap here is safe - rsplit always yields at least one element,
        // even for empty strings.
        write!(
            f,
            "{}#{}",
            std::any::type_name::<T>().rsplit("::").next().unwrap(),
            self.id
        )
    }
}

impl<T: std::any::Any> std::fmt::Debug for UniqueId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <UniqueId<T> as std::fmt::Display>::fmt(self, f)
    }
}
