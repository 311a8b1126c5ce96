//! Press feedback: a spring-driven scale that dips while pressed

use crate::spring::{SpringAnimator, SpringConfig};
use motif_core::FrameScheduler;
use serde::Serialize;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Default scale while pressed
pub const DEFAULT_PRESSED_SCALE: f64 = 0.97;

/// Configuration for press feedback
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PressConfig {
    pub pressed_scale: f64,
    pub spring: SpringConfig,
}

impl PressConfig {
    pub fn new(pressed_scale: f64, spring: SpringConfig) -> Self {
        Self {
            pressed_scale,
            spring,
        }
    }

    pub fn with_pressed_scale(mut self, pressed_scale: f64) -> Self {
        self.pressed_scale = pressed_scale;
        self
    }

    pub fn with_spring(mut self, spring: SpringConfig) -> Self {
        self.spring = spring;
        self
    }

    /// Replace a non-finite or non-positive pressed scale with the default
    pub fn sanitized(self) -> Self {
        if self.pressed_scale.is_finite() && self.pressed_scale > 0.0 {
            return self;
        }
        tracing::warn!(
            "PressConfig: pressed_scale = {} replaced with {}",
            self.pressed_scale,
            DEFAULT_PRESSED_SCALE
        );
        Self {
            pressed_scale: DEFAULT_PRESSED_SCALE,
            spring: self.spring,
        }
    }
}

impl Default for PressConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PRESSED_SCALE, SpringConfig::default())
    }
}

/// Pointer or touch input relevant to press feedback
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PressEvent {
    Down,
    Up,
    /// Pointer left the element while pressed
    Leave,
    Cancel,
}

/// Output of [`PressFeedback`]
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PressState {
    pub scale: f64,
    pub is_animating: bool,
    pub is_pressed: bool,
}

/// A uniform scale transform
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTransform(pub f64);

impl fmt::Display for ScaleTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scale({})", self.0)
    }
}

struct PressInner {
    spring: SpringAnimator,
    config: PressConfig,
    pressed: bool,
}

impl PressInner {
    fn handle(&mut self, event: PressEvent) {
        let pressed = match event {
            PressEvent::Down => true,
            PressEvent::Up | PressEvent::Leave | PressEvent::Cancel => false,
        };
        // Release without a press, or a second press, changes nothing
        if pressed == self.pressed {
            return;
        }

        self.pressed = pressed;
        let target = if pressed {
            self.config.pressed_scale
        } else {
            1.0
        };
        tracing::trace!("PressFeedback: {:?} -> scale target {}", event, target);
        self.spring.set_target(target);
    }
}

/// Scale feedback for a pressable element
///
/// ```ignore
/// let press = PressFeedback::new(PressConfig::default(), scheduler.handle());
/// button.on_pointer(press.event_handler());
/// // While rendering:
/// button.transform(press.transform().to_string());
/// ```
pub struct PressFeedback {
    inner: Rc<RefCell<PressInner>>,
}

impl PressFeedback {
    /// Create press feedback at rest. An invalid pressed scale falls back to the default.
    pub fn new(config: PressConfig, frames: impl FrameScheduler + 'static) -> Self {
        let config = config.sanitized();
        Self {
            inner: Rc::new(RefCell::new(PressInner {
                spring: SpringAnimator::new(1.0, config.spring, frames),
                config,
                pressed: false,
            })),
        }
    }

    pub fn handle(&self, event: PressEvent) {
        self.inner.borrow_mut().handle(event);
    }

    pub fn press_in(&self) {
        self.handle(PressEvent::Down);
    }

    pub fn press_out(&self) {
        self.handle(PressEvent::Up);
    }

    /// Event handler for the view layer
    ///
    /// Holds only a weak reference; events arriving after this feedback is
    /// dropped are ignored.
    pub fn event_handler(&self) -> impl Fn(PressEvent) + 'static {
        let weak: Weak<RefCell<PressInner>> = Rc::downgrade(&self.inner);
        move |event| {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().handle(event);
            }
        }
    }

    pub fn scale(&self) -> f64 {
        self.inner.borrow().spring.value()
    }

    pub fn is_pressed(&self) -> bool {
        self.inner.borrow().pressed
    }

    pub fn is_animating(&self) -> bool {
        self.inner.borrow().spring.is_animating()
    }

    pub fn config(&self) -> PressConfig {
        self.inner.borrow().config
    }

    pub fn state(&self) -> PressState {
        let inner = self.inner.borrow();
        PressState {
            scale: inner.spring.value(),
            is_animating: inner.spring.is_animating(),
            is_pressed: inner.pressed,
        }
    }

    pub fn transform(&self) -> ScaleTransform {
        ScaleTransform(self.scale())
    }

    /// Stop the spring; later events are ignored by it
    pub fn destroy(&self) {
        self.inner.borrow_mut().spring.destroy();
    }
}
