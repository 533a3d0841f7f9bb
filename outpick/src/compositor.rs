//! CPU flattening of a session into a single raster.
//!
//! Flattening is a pure read of session state: background fill, then every
//! layer in paint order, scaled and composited at its placement. The session
//! stays interactive afterwards, and two flattens with no intervening
//! mutation produce identical pixels.

use outpick_core::{resource::ImageHandle, state::Session};

use image::{imageops, Rgba, RgbaImage};

/// The render collaborator: turns opaque handles into pixels.
///
/// Resolution failures are not canvas errors. Returning `None` makes the
/// compositor draw a placeholder tile in the layer's place.
pub trait ResolveImage {
    fn resolve(&self, handle: &ImageHandle) -> Option<RgbaImage>;
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// The canvas has no area - typically a flatten before the host surface
    /// was laid out. The caller may retry once layout has happened.
    #[error("canvas bounds are degenerate ({width}x{height})")]
    DegenerateBounds { width: u32, height: u32 },
}

/// Rasterize the session. An empty session flattens to a plain
/// background-colored image; whether that is acceptable is the caller's
/// policy, not ours.
pub fn flatten(
    session: &Session,
    resolver: &impl ResolveImage,
) -> Result<RgbaImage, CaptureError> {
    let [w, h] = session.size();
    // Session size is already finite and non-negative.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (width, height) = (w.round() as u32, h.round() as u32);
    if width == 0 || height == 0 {
        return Err(CaptureError::DegenerateBounds { width, height });
    }

    let mut out = RgbaImage::from_pixel(width, height, Rgba(session.background().as_array()));
    for layer in session.iter() {
        let [sw, sh] = layer.placement().scaled_size(layer.base_size());
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (sw, sh) = (sw.round().max(0.0) as u32, sh.round().max(0.0) as u32);
        if sw == 0 || sh == 0 {
            continue;
        }
        let sprite = match resolver.resolve(layer.image()) {
            Some(source) => {
                if source.dimensions() == (sw, sh) {
                    source
                } else {
                    imageops::resize(&source, sw, sh, imageops::FilterType::Triangle)
                }
            }
            None => {
                log::warn!("unresolvable image {}, using placeholder", layer.image());
                placeholder(sw, sh)
            }
        };
        let [x, y] = layer.placement().translation;
        // Overlay clips at every canvas edge, including negative offsets.
        #[allow(clippy::cast_possible_truncation)]
        imageops::overlay(&mut out, &sprite, x.round() as i64, y.round() as i64);
    }
    Ok(out)
}

/// Downscale a flattened raster so its longer edge fits `max_dim`, preserving
/// aspect ratio. Images already within the cap are returned unchanged.
#[must_use]
pub fn snapshot(image: &RgbaImage, max_dim: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    if max_dim == 0 || (w <= max_dim && h <= max_dim) {
        return image.clone();
    }
    #[allow(clippy::cast_precision_loss)]
    let scale = (max_dim as f32 / w as f32).min(max_dim as f32 / h as f32);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (nw, nh) = (
        ((w as f32 * scale).round() as u32).max(1),
        ((h as f32 * scale).round() as u32).max(1),
    );
    imageops::resize(image, nw, nh, imageops::FilterType::Triangle)
}

/// Neutral tile drawn when a handle cannot be resolved.
fn placeholder(w: u32, h: u32) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba([190, 190, 190, 255]))
}

#[cfg(test)]
mod test {
    use super::{flatten, snapshot, CaptureError, ResolveImage};
    use image::{Rgba, RgbaImage};
    use outpick_core::{
        color::Color,
        resource::ImageHandle,
        state::{Options, Session},
    };

    /// Resolves every handle to a solid red image, regardless of its size.
    struct SolidRed;
    impl ResolveImage for SolidRed {
        fn resolve(&self, _: &ImageHandle) -> Option<RgbaImage> {
            Some(RgbaImage::from_pixel(100, 100, Rgba([255, 0, 0, 255])))
        }
    }
    struct NeverResolves;
    impl ResolveImage for NeverResolves {
        fn resolve(&self, _: &ImageHandle) -> Option<RgbaImage> {
            None
        }
    }

    fn options() -> Options {
        Options {
            default_layer_size: [200.0; 2],
            ..Options::default()
        }
    }

    #[test]
    fn empty_session_is_background_only() {
        let session = Session::new([64.0, 48.0], options()).unwrap();
        let out = flatten(&session, &SolidRed).unwrap();
        assert_eq!(out.dimensions(), (64, 48));
        assert!(out.pixels().all(|px| *px == Rgba([255; 4])));
    }
    #[test]
    fn degenerate_bounds_fail() {
        let session = Session::new([0.0, 1000.0], options()).unwrap();
        assert_eq!(
            flatten(&session, &SolidRed),
            Err(CaptureError::DegenerateBounds {
                width: 0,
                height: 1000
            })
        );
    }
    #[test]
    fn dragged_layer_composites_at_its_placement() {
        let mut session = Session::new([1000.0; 2], options()).unwrap();
        let id = session.add_layer(ImageHandle::new("a").unwrap());
        assert!(session.translate_layer(id, [50.0, -30.0]));

        let out = flatten(&session, &SolidRed).unwrap();
        assert_eq!(out.dimensions(), (1000, 1000));
        // Covered region is (450,370)-(650,570).
        assert_eq!(*out.get_pixel(450, 370), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(649, 569), Rgba([255, 0, 0, 255]));
        // Just outside: background.
        assert_eq!(*out.get_pixel(449, 370), Rgba([255; 4]));
        assert_eq!(*out.get_pixel(650, 570), Rgba([255; 4]));
    }
    #[test]
    fn flatten_is_idempotent() {
        let mut session = Session::new([200.0; 2], options()).unwrap();
        session.add_layer(ImageHandle::new("a").unwrap());
        let first = flatten(&session, &SolidRed).unwrap();
        let second = flatten(&session, &SolidRed).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }
    #[test]
    fn paint_order_is_bottom_to_top() {
        struct PerHandle;
        impl ResolveImage for PerHandle {
            fn resolve(&self, handle: &ImageHandle) -> Option<RgbaImage> {
                let px = match handle.as_str() {
                    "red" => Rgba([255, 0, 0, 255]),
                    _ => Rgba([0, 0, 255, 255]),
                };
                Some(RgbaImage::from_pixel(10, 10, px))
            }
        }
        let mut session = Session::new([200.0; 2], options()).unwrap();
        let red = session.add_layer(ImageHandle::new("red").unwrap());
        session.add_layer(ImageHandle::new("blue").unwrap());
        // Both layers fully overlap; blue was added last, so blue wins...
        let out = flatten(&session, &PerHandle).unwrap();
        assert_eq!(*out.get_pixel(100, 100), Rgba([0, 0, 255, 255]));
        // ...until red is touched back to the front.
        assert!(session.bring_to_front(red));
        let out = flatten(&session, &PerHandle).unwrap();
        assert_eq!(*out.get_pixel(100, 100), Rgba([255, 0, 0, 255]));
    }
    #[test]
    fn removed_layer_disappears_and_survivor_remains() {
        let mut session = Session::new([1000.0; 2], options()).unwrap();
        let kept = session.add_layer(ImageHandle::new("a").unwrap());
        let removed = session.add_layer(ImageHandle::new("b").unwrap());
        session.remove_layer(removed);
        session.remove_layer(removed);
        let out = flatten(&session, &SolidRed).unwrap();
        assert_eq!(*out.get_pixel(500, 500), Rgba([255, 0, 0, 255]));
        assert!(session.layer(kept).is_some());
    }
    #[test]
    fn unresolvable_handle_draws_placeholder() {
        let mut session = Session::new([1000.0; 2], options()).unwrap();
        session.add_layer(ImageHandle::new("missing").unwrap());
        let out = flatten(&session, &NeverResolves).unwrap();
        // Placeholder tile, not an error and not background.
        assert_eq!(*out.get_pixel(500, 500), Rgba([190, 190, 190, 255]));
    }
    #[test]
    fn scaled_layer_covers_scaled_area() {
        let mut session = Session::new([1000.0; 2], options()).unwrap();
        let id = session.add_layer(ImageHandle::new("a").unwrap());
        assert!(session.set_layer_scale(id, 2.0));
        let out = flatten(&session, &SolidRed).unwrap();
        // 200x200 at (400,400) scaled x2 about its top-left corner.
        assert_eq!(*out.get_pixel(400, 400), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(799, 799), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(800, 800), Rgba([255; 4]));
    }
    #[test]
    fn custom_background_fills() {
        let opts = Options {
            background: Color::rgba(10, 20, 30, 255),
            ..options()
        };
        let session = Session::new([8.0, 8.0], opts).unwrap();
        let out = flatten(&session, &SolidRed).unwrap();
        assert!(out.pixels().all(|px| *px == Rgba([10, 20, 30, 255])));
    }
    #[test]
    fn snapshot_caps_longer_edge() {
        let big = RgbaImage::from_pixel(1000, 500, Rgba([1, 2, 3, 255]));
        let capped = snapshot(&big, 600);
        assert_eq!(capped.dimensions(), (600, 300));

        let small = RgbaImage::from_pixel(100, 50, Rgba([1, 2, 3, 255]));
        assert_eq!(snapshot(&small, 600).dimensions(), (100, 50));
    }
}
