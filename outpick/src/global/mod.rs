//! Global singletons.

pub mod preferences;
