//! Small geometry helpers used throughout the crate.

/// An axis-aligned rectangle in canvas space. Origin is the top-left corner,
/// +X right, +Y down, logical pixels.
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Rect {
    pub origin: [f32; 2],
    pub size: [f32; 2],
}
impl Rect {
    #[must_use]
    pub fn from_origin_size(origin: [f32; 2], size: [f32; 2]) -> Self {
        Self { origin, size }
    }
    #[must_use]
    pub fn center(&self) -> [f32; 2] {
        [
            self.origin[0] + self.size[0] / 2.0,
            self.origin[1] + self.size[1] / 2.0,
        ]
    }
    /// True when either extent is zero, negative, or NaN. Degenerate rects
    /// cannot be rasterized.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.size[0] > 0.0 && self.size[1] > 0.0)
    }
}

/// Both components finite - neither NaN nor infinite.
#[must_use]
pub fn is_finite2(v: [f32; 2]) -> bool {
    v[0].is_finite() && v[1].is_finite()
}

#[cfg(test)]
mod test {
    use super::{is_finite2, Rect};

    #[test]
    fn center() {
        let rect = Rect::from_origin_size([10.0, 20.0], [100.0, 50.0]);
        assert_eq!(rect.center(), [60.0, 45.0]);
    }
    #[test]
    fn degenerate() {
        assert!(Rect::from_origin_size([0.0; 2], [0.0, 10.0]).is_degenerate());
        assert!(Rect::from_origin_size([0.0; 2], [10.0, -1.0]).is_degenerate());
        assert!(Rect::from_origin_size([0.0; 2], [f32::NAN, 10.0]).is_degenerate());
        assert!(!Rect::from_origin_size([0.0; 2], [1.0, 1.0]).is_degenerate());
    }
    #[test]
    fn finite() {
        assert!(is_finite2([0.0, -5.5]));
        assert!(!is_finite2([f32::NAN, 0.0]));
        assert!(!is_finite2([0.0, f32::INFINITY]));
    }
}
