//! Spring physics animation
//!
//! A single damped spring stepped with semi-implicit Euler, and
//! [`SpringAnimator`], which steps it from frame callbacks until it settles.
//! Retargeting keeps value and velocity, so motion stays physically
//! continuous when the destination changes mid-flight.

use motif_core::{FrameRequestId, FrameScheduler};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Shared default tension
pub const DEFAULT_TENSION: f64 = 170.0;

/// Shared default friction
pub const DEFAULT_FRICTION: f64 = 26.0;

/// Smallest accepted tension, friction or mass
const MIN_PARAMETER: f64 = 1e-3;

/// Largest integration substep (seconds)
const SUBSTEP_SECS: f64 = 1.0 / 120.0;

/// Most substeps integrated per [`Spring::step`]
const MAX_SUBSTEPS: usize = 256;

/// Smallest accepted settling threshold
const MIN_PRECISION: f64 = 1e-9;

/// Longest frame gap integrated in one tick (seconds)
const MAX_FRAME_SECS: f64 = 0.064;

/// Frame gap assumed for the first tick of a run (seconds)
const FIRST_FRAME_SECS: f64 = 1.0 / 60.0;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringConfig {
    pub tension: f64,
    pub friction: f64,
    pub mass: f64,
    /// Settled once `|target - value|` is below this...
    pub rest_displacement: f64,
    /// ...and `|velocity|` is below this
    pub rest_velocity: f64,
}

impl SpringConfig {
    /// Create a new spring configuration with unit mass
    pub fn new(tension: f64, friction: f64) -> Self {
        Self {
            tension,
            friction,
            mass: 1.0,
            rest_displacement: 1e-4,
            rest_velocity: 1e-3,
        }
    }

    /// The shared default spring (170 / 26, just under critical damping)
    pub fn default_spring() -> Self {
        Self::new(DEFAULT_TENSION, DEFAULT_FRICTION)
    }

    /// A gentle, slow spring (good for page transitions)
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0)
    }

    /// A wobbly spring with overshoot (good for playful UI)
    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0)
    }

    /// A stiff, snappy spring (good for buttons)
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0)
    }

    /// A slow spring with no overshoot
    pub fn molasses() -> Self {
        Self::new(100.0, 20.0)
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Override the settling thresholds
    pub fn with_precision(mut self, rest_displacement: f64, rest_velocity: f64) -> Self {
        self.rest_displacement = rest_displacement;
        self.rest_velocity = rest_velocity;
        self
    }

    /// Friction at which this spring is critically damped
    pub fn critical_friction(&self) -> f64 {
        2.0 * (self.tension * self.mass).sqrt()
    }

    /// Ratio of friction to critical friction (1.0 = critically damped)
    pub fn damping_ratio(&self) -> f64 {
        self.friction / self.critical_friction()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.friction < self.critical_friction()
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.friction > self.critical_friction()
    }

    /// Clamp every parameter into its valid range
    pub fn sanitized(self) -> Self {
        let clamp = |name: &str, value: f64, min: f64| {
            if value.is_finite() && value >= min {
                value
            } else {
                tracing::warn!("SpringConfig: {} = {} clamped to {}", name, value, min);
                min
            }
        };

        Self {
            tension: clamp("tension", self.tension, MIN_PARAMETER),
            friction: clamp("friction", self.friction, MIN_PARAMETER),
            mass: clamp("mass", self.mass, MIN_PARAMETER),
            rest_displacement: clamp("rest_displacement", self.rest_displacement, MIN_PRECISION),
            rest_velocity: clamp("rest_velocity", self.rest_velocity, MIN_PRECISION),
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::default_spring()
    }
}

/// A single spring: value, velocity and target
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f64,
    velocity: f64,
    target: f64,
}

impl Spring {
    /// Create a spring at rest on `initial`. Invalid parameters are clamped and
    /// a non-finite `initial` becomes 0.
    pub fn new(config: SpringConfig, initial: f64) -> Self {
        let initial = if initial.is_finite() { initial } else { 0.0 };
        Self {
            config: config.sanitized(),
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Change the target, keeping value and velocity. Non-finite targets are ignored.
    pub fn set_target(&mut self, target: f64) {
        if !target.is_finite() {
            tracing::warn!("Spring: ignoring non-finite target {}", target);
            return;
        }
        self.target = target;
    }

    /// Integration substep for this configuration
    ///
    /// Semi-implicit Euler stays stable while `h·friction/mass` and
    /// `h·sqrt(tension/mass)` stay well under 2; both are kept at or below 0.5.
    pub fn substep(&self) -> f64 {
        let SpringConfig {
            tension,
            friction,
            mass,
            ..
        } = self.config;
        SUBSTEP_SECS
            .min(0.5 * mass / friction)
            .min(0.5 / (tension / mass).sqrt())
    }

    /// Put the spring at rest on `value`. Non-finite values are ignored.
    pub fn snap_to(&mut self, value: f64) {
        if !value.is_finite() {
            tracing::warn!("Spring: ignoring non-finite snap to {}", value);
            return;
        }
        self.value = value;
        self.target = value;
        self.velocity = 0.0;
    }

    /// Both displacement and speed are under the configured rest thresholds
    pub fn is_settled(&self) -> bool {
        (self.target - self.value).abs() < self.config.rest_displacement
            && self.velocity.abs() < self.config.rest_velocity
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// Integrates in substeps of at most [`Spring::substep`]; gaps longer than
    /// 64 ms are truncated, and so is any gap needing more than 256 substeps
    /// (very stiff springs then run slower than real time rather than
    /// diverge). A settled spring snaps onto its target.
    pub fn step(&mut self, dt: f64) {
        if !self.is_settled() {
            let substep = self.substep();
            let mut remaining = if dt.is_finite() {
                dt.clamp(0.0, MAX_FRAME_SECS).min(substep * MAX_SUBSTEPS as f64)
            } else {
                0.0
            };

            while remaining > 0.0 {
                let h = remaining.min(substep);
                // Semi-implicit Euler: velocity first, then position with the new velocity
                self.velocity += self.acceleration() * h;
                self.value += self.velocity * h;
                remaining -= h;
            }

            if !self.value.is_finite() || !self.velocity.is_finite() {
                tracing::warn!("Spring: integration diverged, snapping to {}", self.target);
                let target = self.target;
                self.snap_to(target);
            }
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    fn acceleration(&self) -> f64 {
        let spring_force = self.config.tension * (self.target - self.value);
        let damping_force = -self.config.friction * self.velocity;
        (spring_force + damping_force) / self.config.mass
    }
}

/// Snapshot of a spring animator for the view layer
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpringValueState {
    pub value: f64,
    pub is_animating: bool,
}

struct SpringInner {
    spring: Spring,
    frames: Rc<dyn FrameScheduler>,
    pending: Option<FrameRequestId>,
    last_frame_ms: Option<f64>,
    destroyed: bool,
}

impl SpringInner {
    fn cancel_pending(&mut self) {
        if let Some(id) = self.pending.take() {
            self.frames.cancel_frame(id);
        }
    }

    fn come_to_rest(&mut self) {
        let target = self.spring.target();
        self.spring.snap_to(target);
        self.last_frame_ms = None;
    }
}

/// A spring stepped once per frame until it settles
///
/// ```ignore
/// let mut scale = SpringAnimator::new(1.0, SpringConfig::default(), scheduler.handle());
/// scale.set_target(0.97);
/// // Every frame:
/// scheduler.frame(now_ms);
/// apply_scale(scale.value());
/// ```
pub struct SpringAnimator {
    inner: Rc<RefCell<SpringInner>>,
}

impl SpringAnimator {
    pub fn new(initial: f64, config: SpringConfig, frames: impl FrameScheduler + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SpringInner {
                spring: Spring::new(config, initial),
                frames: Rc::new(frames),
                pending: None,
                last_frame_ms: None,
                destroyed: false,
            })),
        }
    }

    /// Change the destination, keeping the current value and velocity
    pub fn set_target(&mut self, target: f64) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.destroyed {
                return;
            }

            inner.cancel_pending();
            inner.spring.set_target(target);
            if inner.spring.is_settled() {
                inner.come_to_rest();
                return;
            }
            tracing::debug!(
                "SpringAnimator: retarget to {:.4} at value {:.4}, velocity {:.4}",
                target,
                inner.spring.value(),
                inner.spring.velocity()
            );
        }

        Self::schedule_tick(&self.inner);
    }

    /// Put the spring at rest on `value` without animating
    pub fn snap_to(&mut self, value: f64) {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return;
        }
        inner.cancel_pending();
        inner.spring.snap_to(value);
        inner.last_frame_ms = None;
    }

    pub fn value(&self) -> f64 {
        self.inner.borrow().spring.value()
    }

    pub fn velocity(&self) -> f64 {
        self.inner.borrow().spring.velocity()
    }

    pub fn target(&self) -> f64 {
        self.inner.borrow().spring.target()
    }

    pub fn config(&self) -> SpringConfig {
        self.inner.borrow().spring.config()
    }

    /// Check if a frame is scheduled to move the spring
    pub fn is_animating(&self) -> bool {
        self.inner.borrow().pending.is_some()
    }

    pub fn state(&self) -> SpringValueState {
        let inner = self.inner.borrow();
        SpringValueState {
            value: inner.spring.value(),
            is_animating: inner.pending.is_some(),
        }
    }

    /// Cancel any pending frame and freeze the spring. Also runs on drop.
    pub fn destroy(&mut self) {
        let mut inner = self.inner.borrow_mut();
        if inner.destroyed {
            return;
        }
        inner.cancel_pending();
        inner.destroyed = true;
    }

    fn schedule_tick(this: &Rc<RefCell<SpringInner>>) {
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
                tracing::debug!("SpringAnimator: scheduler gone, snapping to target");
                inner.come_to_rest();
            }
        }
    }

    fn on_tick(this: &Rc<RefCell<SpringInner>>, timestamp: f64) {
        let reschedule = {
            let mut inner = this.borrow_mut();
            inner.pending = None;
            if inner.destroyed {
                return;
            }

            let dt = match inner.last_frame_ms {
                Some(last) => (timestamp - last) / 1000.0,
                None => FIRST_FRAME_SECS,
            };
            inner.last_frame_ms = Some(timestamp);
            inner.spring.step(dt);

            if inner.spring.is_settled() {
                inner.come_to_rest();
                tracing::trace!("SpringAnimator: settled at {:.4}", inner.spring.value());
                false
            } else {
                true
            }
        };

        if reschedule {
            Self::schedule_tick(this);
        }
    }
}

impl Drop for SpringAnimator {
    fn drop(&mut self) {
        self.destroy();
    }
}
