//! Multi-touch input, as delivered by the host surface.
//!
//! The canvas does not own an event loop. The embedding shell hit-tests each
//! platform touch against its layers and forwards the result here as discrete
//! per-layer events. Timestamps are measured from an arbitrary monotonic
//! epoch chosen by the host; the canvas only ever looks at differences.
//!
//! Touch streams from real hardware are noisy - moves without a preceding
//! down, second fingers appearing out of nowhere. Consumers of these events
//! absorb malformed sequences rather than erroring.

use ultraviolet::Vec2;

/// One discrete touch event, already routed to a specific layer.
#[derive(Clone, Debug, PartialEq)]
pub enum TouchEvent {
    /// The first finger landed.
    Down { pos: Vec2, time: std::time::Duration },
    /// A second finger landed while the first is still held.
    PointerDown { first: Vec2, second: Vec2 },
    /// Any active finger moved. One entry per active finger, in a stable
    /// order chosen by the host.
    Move {
        pointers: smallvec::SmallVec<[Vec2; 2]>,
    },
    /// The second finger lifted; one finger remains down.
    PointerUp,
    /// The last finger lifted.
    Up { time: std::time::Duration },
}

impl TouchEvent {
    /// Finger spacing of a two-pointer event, if it has two pointers.
    #[must_use]
    pub fn spacing(&self) -> Option<f32> {
        match self {
            Self::PointerDown { first, second } => Some((*second - *first).mag()),
            Self::Move { pointers } => {
                let [a, b] = pointers.as_slice() else {
                    return None;
                };
                Some((*b - *a).mag())
            }
            _ => None,
        }
    }
}
