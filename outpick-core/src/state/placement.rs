//! Where a layer sits on the canvas.

/// A layer's transform: translation of its top-left corner, then a uniform
/// scale about that corner.
///
/// Scale is always uniform (sx == sy), so aspect ratio is preserved by
/// construction. Rotation is not modeled.
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable, PartialEq, PartialOrd)]
#[repr(C)]
pub struct Placement {
    /// Uniform scale factor. The session keeps this within its configured
    /// clamp range at every point of mutation.
    pub scale: f32,
    /// Top-left offset, in logical pixels. 0,0 is top left, +X right, +Y down.
    pub translation: [f32; 2],
}

impl Placement {
    /// Size of `base` pixels after this placement's scale is applied.
    #[must_use]
    pub fn scaled_size(&self, base: [f32; 2]) -> [f32; 2] {
        [base[0] * self.scale, base[1] * self.scale]
    }
    /// The rectangle a layer of unscaled size `base` covers on the canvas.
    #[must_use]
    pub fn bounds(&self, base: [f32; 2]) -> crate::util::Rect {
        crate::util::Rect::from_origin_size(self.translation, self.scaled_size(base))
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translation: [0.0; 2],
        }
    }
}
