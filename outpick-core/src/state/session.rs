use super::layer::{self, Layer};
use crate::{color::Color, resource::ImageHandle, util};

/// Tunables for one composition session.
///
/// The clamp range and tap threshold were fixed constants in earlier builds;
/// they are configuration now so the hosting shell can adjust them.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Options {
    /// Inclusive lower bound for layer scale.
    pub min_scale: f32,
    /// Inclusive upper bound for layer scale.
    pub max_scale: f32,
    /// Gestures shorter than this with no net drag count as taps.
    pub tap_threshold: std::time::Duration,
    /// Unscaled size newly added layers take on.
    pub default_layer_size: [f32; 2],
    /// Flood fill drawn beneath all layers when flattening.
    pub background: Color,
    /// Two fingers closer together than this do not initiate a pinch.
    pub pinch_min_spacing: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            min_scale: 0.5,
            max_scale: 5.0,
            tap_threshold: std::time::Duration::from_millis(200),
            default_layer_size: [400.0; 2],
            background: Color::WHITE,
            pinch_min_spacing: 10.0,
        }
    }
}

impl Options {
    /// Check the invariants every session relies on. Called by
    /// [`Session::new`]; exposed so configuration loaders can reject bad
    /// values before a session exists.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.min_scale.is_finite() || !self.max_scale.is_finite() {
            return Err(OptionsError::NonFiniteScale);
        }
        if self.min_scale <= 0.0 {
            return Err(OptionsError::NonPositiveScale);
        }
        if self.min_scale > self.max_scale {
            return Err(OptionsError::InvertedScaleRange {
                min: self.min_scale,
                max: self.max_scale,
            });
        }
        if util::Rect::from_origin_size([0.0; 2], self.default_layer_size).is_degenerate()
            || !util::is_finite2(self.default_layer_size)
        {
            return Err(OptionsError::BadLayerSize);
        }
        if !(self.pinch_min_spacing > 0.0 && self.pinch_min_spacing.is_finite()) {
            return Err(OptionsError::BadPinchSpacing);
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum OptionsError {
    #[error("scale clamp bounds must be finite")]
    NonFiniteScale,
    #[error("minimum scale must be positive")]
    NonPositiveScale,
    #[error("minimum scale {min} exceeds maximum {max}")]
    InvertedScaleRange { min: f32, max: f32 },
    #[error("default layer size must be positive and finite")]
    BadLayerSize,
    #[error("pinch spacing must be positive and finite")]
    BadPinchSpacing,
}

/// The composition surface and its layers, scoped to one screen visit.
///
/// Index order in the layer set *is* paint order - the last entry is topmost.
/// Touch-down promotes a layer to the end, so z-order is recency of
/// interaction, not creation order.
pub struct Session {
    size: [f32; 2],
    options: Options,
    layers: Vec<Layer>,
}

impl Session {
    /// `size` may legitimately be zero before the host surface has been laid
    /// out; flattening such a session fails, interaction does not. Non-finite
    /// extents are treated as zero.
    pub fn new(size: [f32; 2], options: Options) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self {
            size: sanitize_size(size),
            options,
            layers: Vec::new(),
        })
    }
    /// A session with default options. Cannot fail.
    #[must_use]
    pub fn with_defaults(size: [f32; 2]) -> Self {
        Self {
            size: sanitize_size(size),
            options: Options::default(),
            layers: Vec::new(),
        }
    }
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }
    #[must_use]
    pub fn size(&self) -> [f32; 2] {
        self.size
    }
    /// The host surface was (re-)laid out. Existing layers keep their
    /// positions; only future `add_layer` calls see the new bounds.
    pub fn set_size(&mut self, size: [f32; 2]) {
        self.size = sanitize_size(size);
    }
    #[must_use]
    pub fn background(&self) -> Color {
        self.options.background
    }
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
    /// Layers in paint order, bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter()
    }
    #[must_use]
    pub fn layer(&self, id: layer::ID) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id() == id)
    }

    /// Place a new layer centered in the current bounds at scale 1.0, topmost.
    ///
    /// When the canvas is smaller than the default layer size, the layer is
    /// pinned to the origin instead of centered off-surface.
    pub fn add_layer(&mut self, image: ImageHandle) -> layer::ID {
        let size = self.options.default_layer_size;
        let translation = [
            ((self.size[0] - size[0]) / 2.0).max(0.0),
            ((self.size[1] - size[1]) / 2.0).max(0.0),
        ];
        let layer = Layer::new(image, size, translation);
        let id = layer.id();
        log::trace!("added {id} at {translation:?}");
        self.layers.push(layer);
        id
    }
    /// Remove a layer. Silently does nothing for unknown ids: removal racing
    /// a second removal (double-tapped delete) must not tear the session.
    pub fn remove_layer(&mut self, id: layer::ID) {
        self.layers.retain(|layer| layer.id() != id);
    }
    /// Move a layer to the top of the paint order. Returns false for unknown
    /// ids.
    pub fn bring_to_front(&mut self, id: layer::ID) -> bool {
        let Some(index) = self.layers.iter().position(|layer| layer.id() == id) else {
            return false;
        };
        let layer = self.layers.remove(index);
        self.layers.push(layer);
        true
    }
    /// Shift a layer by `delta`. Deltas accumulate in floating point with no
    /// snapping. Non-finite deltas are input noise and are dropped. Returns
    /// whether the layer moved.
    pub fn translate_layer(&mut self, id: layer::ID, delta: [f32; 2]) -> bool {
        if !util::is_finite2(delta) {
            log::trace!("dropping non-finite drag delta for {id}");
            return false;
        }
        let Some(layer) = self.layer_mut(id) else {
            return false;
        };
        layer.translate(delta);
        true
    }
    /// Set a layer's uniform scale, clamped to the configured range at this
    /// point of mutation. Non-finite input is dropped. Returns whether the
    /// layer was updated.
    pub fn set_layer_scale(&mut self, id: layer::ID, scale: f32) -> bool {
        if !scale.is_finite() {
            log::trace!("dropping non-finite scale for {id}");
            return false;
        }
        let (min, max) = (self.options.min_scale, self.options.max_scale);
        let Some(layer) = self.layer_mut(id) else {
            return false;
        };
        layer.set_scale(scale, min, max);
        true
    }

    fn layer_mut(&mut self, id: layer::ID) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| layer.id() == id)
    }
}

fn sanitize_size(size: [f32; 2]) -> [f32; 2] {
    [
        if size[0].is_finite() { size[0].max(0.0) } else { 0.0 },
        if size[1].is_finite() { size[1].max(0.0) } else { 0.0 },
    ]
}

#[cfg(test)]
mod test {
    use super::{Options, OptionsError, Session};
    use crate::resource::ImageHandle;

    fn handle(name: &str) -> ImageHandle {
        ImageHandle::new(name).unwrap()
    }
    fn small_layers() -> Options {
        Options {
            default_layer_size: [200.0; 2],
            ..Options::default()
        }
    }

    #[test]
    fn layers_center_at_creation() {
        let mut session = Session::new([1000.0; 2], small_layers()).unwrap();
        let id = session.add_layer(handle("a"));
        let layer = session.layer(id).unwrap();
        assert_eq!(layer.placement().translation, [400.0, 400.0]);
        assert_eq!(layer.placement().scale, 1.0);
    }
    #[test]
    fn tiny_canvas_pins_to_origin() {
        let mut session = Session::with_defaults([100.0, 100.0]);
        let id = session.add_layer(handle("a"));
        assert_eq!(session.layer(id).unwrap().placement().translation, [0.0, 0.0]);
    }
    #[test]
    fn newest_layer_is_topmost() {
        let mut session = Session::with_defaults([1000.0; 2]);
        let a = session.add_layer(handle("a"));
        let b = session.add_layer(handle("b"));
        let order: Vec<_> = session.iter().map(super::Layer::id).collect();
        assert_eq!(order, vec![a, b]);
    }
    #[test]
    fn bring_to_front_reorders() {
        let mut session = Session::with_defaults([1000.0; 2]);
        let a = session.add_layer(handle("a"));
        let b = session.add_layer(handle("b"));
        assert!(session.bring_to_front(a));
        let order: Vec<_> = session.iter().map(super::Layer::id).collect();
        assert_eq!(order, vec![b, a]);
    }
    #[test]
    fn remove_is_idempotent() {
        let mut session = Session::with_defaults([1000.0; 2]);
        let a = session.add_layer(handle("a"));
        let b = session.add_layer(handle("b"));
        session.remove_layer(a);
        session.remove_layer(a);
        assert_eq!(session.len(), 1);
        assert!(session.layer(b).is_some());
        // An id the session never owned is equally silent.
        assert!(!session.bring_to_front(a));
    }
    #[test]
    fn drag_deltas_accumulate() {
        let mut session = Session::new([1000.0; 2], small_layers()).unwrap();
        let id = session.add_layer(handle("a"));
        assert!(session.translate_layer(id, [50.0, -30.0]));
        assert!(session.translate_layer(id, [-10.0, 5.0]));
        assert_eq!(
            session.layer(id).unwrap().placement().translation,
            [440.0, 375.0]
        );
    }
    #[test]
    fn non_finite_input_is_dropped() {
        let mut session = Session::with_defaults([1000.0; 2]);
        let id = session.add_layer(handle("a"));
        let before = session.layer(id).unwrap().placement();
        assert!(!session.translate_layer(id, [f32::NAN, 0.0]));
        assert!(!session.set_layer_scale(id, f32::INFINITY));
        assert_eq!(session.layer(id).unwrap().placement(), before);
    }
    #[test]
    fn scale_clamps_inclusive() {
        let mut session = Session::with_defaults([1000.0; 2]);
        let id = session.add_layer(handle("a"));
        assert!(session.set_layer_scale(id, 100.0));
        assert_eq!(session.layer(id).unwrap().placement().scale, 5.0);
        assert!(session.set_layer_scale(id, 0.001));
        assert_eq!(session.layer(id).unwrap().placement().scale, 0.5);
        // The bounds themselves are representable.
        assert!(session.set_layer_scale(id, 5.0));
        assert_eq!(session.layer(id).unwrap().placement().scale, 5.0);
    }
    #[test]
    fn bad_options_are_rejected() {
        let inverted = Options {
            min_scale: 3.0,
            max_scale: 2.0,
            ..Options::default()
        };
        assert_eq!(
            Session::new([1.0; 2], inverted).err(),
            Some(OptionsError::InvertedScaleRange { min: 3.0, max: 2.0 })
        );
        let negative_size = Options {
            default_layer_size: [-4.0, 10.0],
            ..Options::default()
        };
        assert!(matches!(
            Session::new([1.0; 2], negative_size).err(),
            Some(OptionsError::BadLayerSize)
        ));
    }
}
