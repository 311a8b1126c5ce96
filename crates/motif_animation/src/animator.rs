//! Time-based value animator
//!
//! Drives a single `f64` from its current position toward a target over a
//! fixed duration, one frame callback at a time. Retargeting mid-flight
//! restarts the run from the live value, so the output never jumps.

use crate::easing::Easing;
use motif_core::{FrameRequestId, FrameScheduler};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Default animation duration in milliseconds
pub const DEFAULT_ANIMATION_MS: u32 = 300;

/// Targets closer than this to the current target are ignored
///
/// Absorbs floating-point drift from callers that recompute the same target
/// every render. Tunable per animator via [`AnimatorConfig::with_epsilon`].
pub const TARGET_EPSILON: f64 = 1e-6;

/// Configuration for a [`ValueAnimator`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimatorConfig {
    /// Duration of one run in milliseconds. Zero completes on the first frame.
    pub duration_ms: u32,
    pub easing: Easing,
    pub epsilon: f64,
}

impl AnimatorConfig {
    pub fn new(duration_ms: u32, easing: Easing) -> Self {
        Self {
            duration_ms,
            easing,
            epsilon: TARGET_EPSILON,
        }
    }

    /// A linear animation of the given duration
    pub fn linear(duration_ms: u32) -> Self {
        Self::new(duration_ms, Easing::Linear)
    }

    pub fn with_duration(mut self, duration_ms: u32) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Override the retarget epsilon. Negative or NaN values become zero.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = if epsilon.is_nan() { 0.0 } else { epsilon.max(0.0) };
        self
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_MS, Easing::EaseOut)
    }
}

/// Snapshot of an animator for the view layer
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimatedValueState {
    pub current: f64,
    pub is_animating: bool,
}

#[derive(Clone, Copy, Debug)]
struct AnimatorState {
    from: f64,
    to: f64,
    current: f64,
    /// Fixed by the first frame of a run
    start_time: Option<f64>,
    animating: bool,
}

impl AnimatorState {
    fn at_rest(value: f64) -> Self {
        Self {
            from: value,
            to: value,
            current: value,
            start_time: None,
            animating: false,
        }
    }
}

struct AnimatorInner {
    state: AnimatorState,
    config: AnimatorConfig,
    frames: Rc<dyn FrameScheduler>,
    pending: Option<FrameRequestId>,
    destroyed: bool,
}

impl AnimatorInner {
    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.frames.cancel_frame(id);
        }
    }
}

/// A tweened `f64` driven by frame callbacks
///
/// # Example
///
/// ```ignore
/// let scheduler = Scheduler::new();
/// let mut width = ValueAnimator::new(0.0, AnimatorConfig::linear(300), scheduler.handle());
///
/// width.set_target(120.0);
/// scheduler.frame(0.0);
/// scheduler.frame(150.0);
/// assert_eq!(width.current(), 60.0);
/// ```
pub struct ValueAnimator {
    inner: Rc<RefCell<AnimatorInner>>,
}

impl ValueAnimator {
    /// Create an animator resting at `initial`
    pub fn new(
        initial: f64,
        config: AnimatorConfig,
        frames: impl FrameScheduler + 'static,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(AnimatorInner {
                state: AnimatorState::at_rest(initial),
                config,
                frames: Rc::new(frames),
                pending: None,
                destroyed: false,
            })),
        }
    }

    /// Animate toward `target` from the current value
    ///
    /// A target within epsilon of the current target is ignored: the running
    /// animation keeps its start time and its pending frame.
    pub fn set_target(&mut self, target: f64) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed {
                return;
            }
            if (target - inner.state.to).abs() < inner.config.epsilon {
                return;
            }

            inner.cancel_pending();
            let current = inner.state.current;
            tracing::debug!(
                "ValueAnimator: retarget {:.4} -> {:.4} over {}ms",
                current,
                target,
                inner.config.duration_ms
            );
            inner.state = AnimatorState {
                from: current,
                to: target,
                current,
                start_time: None,
                animating: true,
            };
        }

        Self::schedule_tick(&self.inner);
    }

    /// Jump to `value` without animating
    pub fn snap_to(&mut self, value: f64) {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return;
        }
        inner.cancel_pending();
        inner.state = AnimatorState::at_rest(value);
    }

    /// The current interpolated value
    pub fn current(&self) -> f64 {
        self.inner.borrow().state.current
    }

    /// The value the animator is heading toward
    pub fn target(&self) -> f64 {
        self.inner.borrow().state.to
    }

    pub fn is_animating(&self) -> bool {
        self.inner.borrow().state.animating
    }

    pub fn config(&self) -> AnimatorConfig {
        self.inner.borrow().config
    }

    pub fn state(&self) -> AnimatedValueState {
        let inner = self.inner.borrow();
        AnimatedValueState {
            current: inner.state.current,
            is_animating: inner.state.animating,
        }
    }

    /// Cancel any pending frame and freeze the animator
    ///
    /// Later calls to `set_target` or `snap_to` are ignored. Also runs on drop.
    pub fn destroy(&mut self) {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return;
        }
        inner.cancel_pending();
        inner.destroyed = true;
    }

    fn schedule_tick(this: &Rc<RefCell<AnimatorInner>>) {
        let weak = Rc::downgrade(this);
        let mut inner = this.borrow_mut();

        let id = inner.frames.request_frame(Box::new(move |timestamp| {
            if let Some(strong) = weak.upgrade() {
                Self::on_tick(&strong, timestamp);
            }
        }));

        match id {
            Some(id) => inner.pending = Some(id),
            None => {
                // No frame source left: finish immediately
                tracing::debug!("ValueAnimator: scheduler gone, snapping to target");
                let target = inner.state.to;
                inner.state = AnimatorState::at_rest(target);
            }
        }
    }

    fn on_tick(this: &Rc<RefCell<AnimatorInner>>, timestamp: f64) {
        let reschedule = {
            let mut inner = this.borrow_mut();
            inner.pending = None;
            if inner.destroyed || !inner.state.animating {
                return;
            }

            let start = *inner.state.start_time.get_or_insert(timestamp);
            let elapsed = (timestamp - start).max(0.0);
            let duration = f64::from(inner.config.duration_ms);
            let progress = if duration <= 0.0 {
                1.0
            } else {
                (elapsed / duration).clamp(0.0, 1.0)
            };

            let AnimatorState { from, to, .. } = inner.state;
            if progress < 1.0 {
                let eased = inner.config.easing.apply(progress);
                inner.state.current = from + (to - from) * eased;
                true
            } else {
                inner.state.current = to;
                inner.state.animating = false;
                tracing::trace!("ValueAnimator: reached {:.4}", to);
                false
            }
        };

        if reschedule {
            Self::schedule_tick(this);
        }
    }
}

impl Drop for ValueAnimator {
    fn drop(&mut self) {
        self.destroy();
    }
}
