#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::pedantic)]

//! Interactive composition canvas: freely placed clothing-image layers,
//! manipulated with multi-touch gestures and flattened into one outfit
//! snapshot. The session/layer model lives in `outpick-core`; this crate adds
//! the interaction and rasterization on top.

pub mod canvas;
pub mod compositor;
pub mod gesture;
pub mod global;
pub mod touch;
