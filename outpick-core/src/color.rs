//! The canvas background fill.
//!
//! Layers carry their own pixels via the render collaborator; the only color
//! the canvas itself owns is the flood fill underneath them.

/// 8-bit straight-alpha RGBA.
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Color(pub [u8; 4]);
impl Color {
    pub const WHITE: Self = Self([u8::MAX; 4]);
    pub const BLACK: Self = Self([0, 0, 0, u8::MAX]);
    pub const TRANSPARENT: Self = Self([0; 4]);
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }
    #[must_use]
    pub const fn as_array(self) -> [u8; 4] {
        self.0
    }
}
impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
impl From<[u8; 4]> for Color {
    fn from(channels: [u8; 4]) -> Self {
        Self(channels)
    }
}
