//! # Session state
//!
//! One [`session::Session`] per composition screen visit: the bounded surface,
//! its background, and the paint-ordered set of placed layers. The session
//! exclusively owns its layers and is discarded whole - only the flattened
//! output outlives it.

pub mod layer;
pub mod placement;
pub mod session;

pub use layer::Layer;
pub use placement::Placement;
pub use session::{Options, OptionsError, Session};

pub type LayerID = layer::ID;
