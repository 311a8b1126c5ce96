//! Motif Motion System
//!
//! Easing, tweens, springs and mount/unmount transitions for Motif components.
//!
//! # Features
//!
//! - **Easing**: `linear`, `easeIn`, `easeOut` and `easeInOut` curves
//! - **Value Animator**: Duration-based tweens that retarget from the live value
//! - **Spring Physics**: Damped springs that keep velocity when retargeted
//! - **Transitions**: Enter / idle / exit lifecycle with deferred unmount
//! - **Presence**: Fade, scale and slide presets producing style properties
//! - **Press Feedback**: Spring-driven scale for pressable elements
//! - **Played Registry**: Bounded memory of one-shot animations already shown
//! - **Motion Tokens**: Theme-level durations, easing and springs from TOML
//!
//! Every animated object takes its frame clock or timer queue from
//! [`motif_core`], cancels its single pending callback when the input changes,
//! and cancels it again when destroyed or dropped.
//!
//! # Example
//!
//! ```rust
//! use motif_animation::{AnimatorConfig, ValueAnimator};
//! use motif_core::Scheduler;
//!
//! let scheduler = Scheduler::new();
//! let mut opacity = ValueAnimator::new(0.0, AnimatorConfig::linear(300), scheduler.handle());
//!
//! opacity.set_target(1.0);
//! scheduler.frame(0.0);
//! scheduler.frame(150.0);
//! assert_eq!(opacity.current(), 0.5);
//! scheduler.frame(300.0);
//! assert_eq!(opacity.current(), 1.0);
//! assert!(!opacity.is_animating());
//! ```

pub mod animator;
pub mod easing;
pub mod error;
pub mod presence;
pub mod press;
pub mod registry;
pub mod spring;
pub mod tokens;
pub mod transition;

pub use animator::{AnimatedValueState, AnimatorConfig, ValueAnimator, DEFAULT_ANIMATION_MS};
pub use easing::Easing;
pub use error::{MotionError, Result};
pub use presence::{presence_style, Presence, PresencePreset, PresenceStyle};
pub use press::{PressConfig, PressEvent, PressFeedback, PressState, ScaleTransform};
pub use registry::PlayedRegistry;
pub use spring::{Spring, SpringAnimator, SpringConfig, SpringValueState};
pub use tokens::{MotionTokens, Speed};
pub use transition::{Phase, TransitionConfig, TransitionController, TransitionState};
