//! Per-layer gesture interpretation.
//!
//! One explicit state machine per touched layer, keyed by layer id - no
//! hidden state shared between listeners. Drag and pinch are mutually
//! exclusive for a layer at any instant; a second finger landing mid-drag
//! converts the drag into a pinch without passing through idle.
//!
//! Malformed event sequences (a move with no prior down, a second finger in
//! idle) are absorbed silently. Platform touch streams are allowed to be
//! noisy; the machine degrades to doing nothing rather than failing.

use crate::touch::TouchEvent;
use outpick_core::state::{LayerID, Session};
use ultraviolet::Vec2;

/// Where one layer's gesture currently stands.
#[derive(Copy, Clone, Debug, Default, PartialEq, strum::Display)]
pub enum Phase {
    #[default]
    Idle,
    Drag {
        /// Last observed finger position, or None just after a finger count
        /// change - the next move re-anchors here instead of jumping the
        /// layer.
        anchor: Option<Vec2>,
        /// Timestamp of the initial touch-down, for tap detection.
        began: std::time::Duration,
        /// Set once any drag delta lands or a pinch occurs; suppresses the
        /// tap on release.
        moved: bool,
    },
    Pinch {
        /// Finger spacing when the second finger landed.
        baseline_spacing: f32,
        /// Layer scale when the second finger landed.
        baseline_scale: f32,
        began: std::time::Duration,
    },
}

impl Phase {
    /// Advance the machine by one event, mutating the touched layer through
    /// `session`. Returns true when the event completed a tap.
    pub fn process(&mut self, session: &mut Session, layer: LayerID, event: &TouchEvent) -> bool {
        match event {
            TouchEvent::Down { pos, time } => {
                // Z-promotion is unconditional on touch-down, even if this
                // gesture turns out to be a tap.
                session.bring_to_front(layer);
                log::trace!("{layer}: {self} -> Drag");
                *self = Self::Drag {
                    anchor: Some(*pos),
                    began: *time,
                    moved: false,
                };
                false
            }
            TouchEvent::PointerDown { .. } => {
                let Self::Drag { began, .. } = *self else {
                    // Second finger with no first: noise.
                    return false;
                };
                let Some(spacing) = event.spacing() else {
                    return false;
                };
                if spacing < session.options().pinch_min_spacing {
                    // Fingers too close to measure a meaningful ratio; keep
                    // dragging.
                    return false;
                }
                let Some(touched) = session.layer(layer) else {
                    return false;
                };
                log::trace!("{layer}: {self} -> Pinch");
                *self = Self::Pinch {
                    baseline_spacing: spacing,
                    baseline_scale: touched.placement().scale,
                    began,
                };
                false
            }
            TouchEvent::Move { pointers } => {
                match self {
                    Self::Drag { anchor, moved, .. } => {
                        // If two pointers are present (a pinch that never
                        // started), track the first.
                        let Some(&pos) = pointers.first() else {
                            return false;
                        };
                        if let Some(prev) = *anchor {
                            let delta = pos - prev;
                            if (delta.x != 0.0 || delta.y != 0.0)
                                && session.translate_layer(layer, [delta.x, delta.y])
                            {
                                *moved = true;
                            }
                        }
                        *anchor = Some(pos);
                    }
                    Self::Pinch {
                        baseline_spacing,
                        baseline_scale,
                        ..
                    } => {
                        let Some(spacing) = event.spacing() else {
                            return false;
                        };
                        if spacing < session.options().pinch_min_spacing {
                            return false;
                        }
                        session
                            .set_layer_scale(layer, *baseline_scale * spacing / *baseline_spacing);
                    }
                    // Move with no prior down: noise.
                    Self::Idle => {}
                }
                false
            }
            TouchEvent::PointerUp => {
                match *self {
                    // Back to a one-finger drag. The anchor is cleared so the
                    // next move re-anchors rather than jumping; a pinch always
                    // counts as movement, so no tap can follow.
                    Self::Pinch { began, .. } => {
                        log::trace!("{layer}: Pinch -> Drag");
                        *self = Self::Drag {
                            anchor: None,
                            began,
                            moved: true,
                        };
                    }
                    // A second finger that never initiated a pinch lifted.
                    // The remaining finger may be either one; re-anchor.
                    Self::Drag { ref mut anchor, .. } => *anchor = None,
                    Self::Idle => {}
                }
                false
            }
            TouchEvent::Up { time } => {
                let finished = std::mem::take(self);
                if let Self::Drag {
                    began,
                    moved: false,
                    ..
                } = finished
                {
                    let held = time.saturating_sub(began);
                    if held < session.options().tap_threshold {
                        log::trace!("{layer}: tap ({held:?})");
                        return true;
                    }
                }
                false
            }
        }
    }
}
