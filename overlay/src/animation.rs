//! Per-element float/fade state machine
//!
//! Each element goes `Placed → Animating → Invisible`. Position and opacity
//! share one eased progress value so the element stops moving exactly when
//! it becomes fully transparent. The transition into `Invisible` is reported
//! once; later ticks are no-ops.

use std::time::Instant;

use spellfloat_core::Animation;

/// Cubic ease-out on `t` in `[0, 1]` (clamped)
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Vertical displacement and opacity at one instant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    pub dy: f32,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementPhase {
    /// Shown, animation not started yet
    Placed,
    Animating { started: Instant, animation: Animation },
    Invisible,
}

impl ElementPhase {
    /// Begin animating. Ignored unless the element is still `Placed`.
    pub fn start(&mut self, animation: Animation, now: Instant) -> bool {
        if *self != ElementPhase::Placed {
            return false;
        }
        *self = ElementPhase::Animating {
            started: now,
            animation,
        };
        true
    }

    /// Progress in `[0, 1]`; `None` before the animation starts
    pub fn progress(&self, now: Instant) -> Option<f32> {
        match self {
            ElementPhase::Placed => None,
            ElementPhase::Animating { started, animation } => {
                if animation.duration.is_zero() {
                    return Some(1.0);
                }
                let elapsed = now.saturating_duration_since(*started);
                Some((elapsed.as_secs_f32() / animation.duration.as_secs_f32()).min(1.0))
            }
            ElementPhase::Invisible => Some(1.0),
        }
    }

    /// Displacement and opacity at `now`
    pub fn frame(&self, now: Instant) -> FrameState {
        match self {
            ElementPhase::Placed => FrameState {
                dy: 0.0,
                opacity: 1.0,
            },
            ElementPhase::Animating { animation, .. } => {
                let eased = ease_out_cubic(self.progress(now).unwrap_or(0.0));
                FrameState {
                    dy: animation.float_distance as f32 * eased,
                    opacity: animation.start_opacity * (1.0 - eased),
                }
            }
            ElementPhase::Invisible => FrameState {
                dy: 0.0,
                opacity: 0.0,
            },
        }
    }

    /// Move to `Invisible` once the animation has run its course.
    ///
    /// Returns true only on the tick that makes the transition.
    pub fn advance(&mut self, now: Instant) -> bool {
        let done = matches!(self, ElementPhase::Animating { .. })
            && self.progress(now).is_some_and(|p| p >= 1.0);
        if done {
            *self = ElementPhase::Invisible;
        }
        done
    }

    pub fn is_invisible(&self) -> bool {
        matches!(self, ElementPhase::Invisible)
    }
}
