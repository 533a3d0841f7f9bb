use super::placement::Placement;
use crate::resource::ImageHandle;

pub type ID = crate::UniqueId<Layer>;

/// One placed image on the canvas.
///
/// Mutation goes through the owning [`super::Session`], which enforces the
/// scale clamp and ignores non-finite input.
#[derive(Clone, Debug)]
pub struct Layer {
    id: ID,
    image: ImageHandle,
    /// Unscaled pixel size the layer was created with.
    base_size: [f32; 2],
    placement: Placement,
}

impl Layer {
    pub(crate) fn new(image: ImageHandle, base_size: [f32; 2], translation: [f32; 2]) -> Self {
        Self {
            id: ID::next(),
            image,
            base_size,
            placement: Placement {
                translation,
                ..Placement::default()
            },
        }
    }
    #[must_use]
    pub fn id(&self) -> ID {
        self.id
    }
    #[must_use]
    pub fn image(&self) -> &ImageHandle {
        &self.image
    }
    #[must_use]
    pub fn base_size(&self) -> [f32; 2] {
        self.base_size
    }
    #[must_use]
    pub fn placement(&self) -> Placement {
        self.placement
    }
    /// The rectangle this layer covers on the canvas.
    #[must_use]
    pub fn bounds(&self) -> crate::util::Rect {
        self.placement.bounds(self.base_size)
    }
    pub(crate) fn translate(&mut self, delta: [f32; 2]) {
        self.placement.translation[0] += delta[0];
        self.placement.translation[1] += delta[1];
    }
    pub(crate) fn set_scale(&mut self, scale: f32, min: f32, max: f32) {
        self.placement.scale = scale.clamp(min, max);
    }
}
