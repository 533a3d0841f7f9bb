//! The interactive canvas front-end.
//!
//! Owns exactly one [`Session`] plus the per-layer gesture table, and is the
//! boundary the surrounding screens talk to: image handles in, touch events
//! in, taps and flattened rasters out.

use crate::{
    compositor::{self, CaptureError, ResolveImage},
    gesture,
    touch::TouchEvent,
};
use outpick_core::{
    resource::ImageHandle,
    state::{LayerID, Options, OptionsError, Session},
};

/// Outcome of dispatching one touch event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Touched {
    /// The canvas owns every event dispatched to one of its layers; nothing
    /// bubbles to siblings. Always true.
    pub consumed: bool,
    /// Set when the event completed a tap on a layer, for the hosting screen
    /// to show selection controls.
    pub tap: Option<LayerID>,
}

pub struct Canvas {
    session: Session,
    gestures: hashbrown::HashMap<LayerID, gesture::Phase>,
}

impl Canvas {
    pub fn new(size: [f32; 2], options: Options) -> Result<Self, OptionsError> {
        Ok(Self {
            session: Session::new(size, options)?,
            gestures: hashbrown::HashMap::new(),
        })
    }
    #[must_use]
    pub fn with_defaults(size: [f32; 2]) -> Self {
        Self {
            session: Session::with_defaults(size),
            gestures: hashbrown::HashMap::new(),
        }
    }
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
    /// Add one image as a new centered layer and begin accepting gestures
    /// for it.
    pub fn add_layer(&mut self, image: ImageHandle) -> LayerID {
        let id = self.session.add_layer(image);
        self.gestures.insert(id, gesture::Phase::Idle);
        id
    }
    /// Remove a layer and whatever gesture was in flight on it. Idempotent.
    pub fn remove_layer(&mut self, id: LayerID) {
        self.session.remove_layer(id);
        self.gestures.remove(&id);
    }
    /// Route one touch event to a layer's gesture machine.
    ///
    /// Events for ids the session no longer owns arrive when removal races
    /// input; they are absorbed, still consumed.
    pub fn handle_touch(&mut self, layer: LayerID, event: &TouchEvent) -> Touched {
        if self.session.layer(layer).is_none() {
            return Touched {
                consumed: true,
                tap: None,
            };
        }
        let phase = self.gestures.entry(layer).or_default();
        let tapped = phase.process(&mut self.session, layer, event);
        Touched {
            consumed: true,
            tap: tapped.then_some(layer),
        }
    }
    /// Rasterize the current state. Read-only: the session remains
    /// interactive, and repeated calls yield identical pixels.
    pub fn flatten(&self, resolver: &impl ResolveImage) -> Result<image::RgbaImage, CaptureError> {
        compositor::flatten(&self.session, resolver)
    }
}

#[cfg(test)]
mod test {
    use super::Canvas;
    use crate::touch::TouchEvent;
    use outpick_core::resource::ImageHandle;
    use std::time::Duration;
    use ultraviolet::Vec2;

    fn down(x: f32, y: f32) -> TouchEvent {
        TouchEvent::Down {
            pos: Vec2::new(x, y),
            time: Duration::ZERO,
        }
    }

    #[test]
    fn touch_is_always_consumed() {
        let mut canvas = Canvas::with_defaults([1000.0; 2]);
        let id = canvas.add_layer(ImageHandle::new("a").unwrap());

        assert!(canvas.handle_touch(id, &down(500.0, 500.0)).consumed);

        // Even for a layer that was just removed out from under the gesture.
        canvas.remove_layer(id);
        let touched = canvas.handle_touch(id, &down(500.0, 500.0));
        assert!(touched.consumed);
        assert_eq!(touched.tap, None);
    }
    #[test]
    fn tap_is_reported_with_its_layer() {
        let mut canvas = Canvas::with_defaults([1000.0; 2]);
        let id = canvas.add_layer(ImageHandle::new("a").unwrap());
        canvas.handle_touch(id, &down(500.0, 500.0));
        let touched = canvas.handle_touch(
            id,
            &TouchEvent::Up {
                time: Duration::from_millis(100),
            },
        );
        assert_eq!(touched.tap, Some(id));
    }
    #[test]
    fn removal_clears_gesture_state() {
        let mut canvas = Canvas::with_defaults([1000.0; 2]);
        let id = canvas.add_layer(ImageHandle::new("a").unwrap());
        canvas.handle_touch(id, &down(500.0, 500.0));
        canvas.remove_layer(id);
        assert!(canvas.session().is_empty());
        // A fresh layer reusing the slot starts idle; the old drag is gone.
        let other = canvas.add_layer(ImageHandle::new("b").unwrap());
        let touched = canvas.handle_touch(
            other,
            &TouchEvent::Up {
                time: Duration::from_millis(1),
            },
        );
        assert_eq!(touched.tap, None);
    }
}
