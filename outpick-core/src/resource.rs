//! Opaque references to source imagery.
//!
//! The canvas never decodes pixel data. A handle is whatever the render
//! collaborator can resolve - a file path, a content key, a remote URL. An
//! unresolvable handle is the collaborator's problem (it draws a placeholder),
//! not a canvas error.

/// Cheap-to-clone opaque reference to an image.
///
/// The only property the canvas enforces is non-emptiness, checked once at
/// construction.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ImageHandle(std::sync::Arc<str>);
impl ImageHandle {
    pub fn new(uri: impl AsRef<str>) -> Result<Self, EmptyHandleError> {
        let uri = uri.as_ref();
        if uri.is_empty() {
            Err(EmptyHandleError)
        } else {
            Ok(Self(uri.into()))
        }
    }
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl std::fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("image handle is empty")]
pub struct EmptyHandleError;
