//! Presence: enter/exit presets bound to the transition lifecycle
//!
//! [`presence_style`] maps a preset and a [`Phase`] to the visual properties
//! the view layer applies. [`Presence`] owns a [`TransitionController`] and
//! yields that style while the element is mounted, `None` once it is not.
//!
//! | Preset      | Hidden endpoint                | Visible endpoint |
//! |-------------|--------------------------------|------------------|
//! | `fadeIn`    | opacity 0                      | opacity 1        |
//! | `scaleIn`   | opacity 0, scale 0.95          | opacity 1, scale 1 |
//! | `slideUp`   | opacity 0, translateY(8px)     | opacity 1, translateY(0) |
//! | `slideDown` | opacity 0, translateY(-8px)    | opacity 1, translateY(0) |

use crate::error::{MotionError, Result};
use crate::transition::{Phase, TransitionConfig, TransitionController, TransitionState};
use motif_core::TimerScheduler;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vertical offset of the hidden endpoint of slide presets, in pixels
pub const SLIDE_OFFSET_PX: f64 = 8.0;

/// Scale of the hidden endpoint of `scaleIn`
pub const SCALE_FROM: f64 = 0.95;

/// Catalog of enter/exit presets
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PresencePreset {
    /// Opacity only
    FadeIn,
    /// Opacity plus a uniform scale from 0.95
    ScaleIn,
    /// Opacity plus a rise from 8px below
    SlideUp,
    /// Opacity plus a drop from 8px above
    SlideDown,
}

impl PresencePreset {
    pub const ALL: [PresencePreset; 4] = [
        PresencePreset::FadeIn,
        PresencePreset::ScaleIn,
        PresencePreset::SlideUp,
        PresencePreset::SlideDown,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PresencePreset::FadeIn => "fadeIn",
            PresencePreset::ScaleIn => "scaleIn",
            PresencePreset::SlideUp => "slideUp",
            PresencePreset::SlideDown => "slideDown",
        }
    }
}

impl FromStr for PresencePreset {
    type Err = MotionError;

    fn from_str(name: &str) -> Result<Self> {
        PresencePreset::ALL
            .into_iter()
            .find(|preset| preset.name() == name)
            .ok_or_else(|| MotionError::UnknownPreset(name.to_string()))
    }
}

impl fmt::Display for PresencePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Visual properties for one phase of a preset
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceStyle {
    pub opacity: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    /// Timing the view layer should transition these properties with
    pub timing: TransitionConfig,
}

impl PresenceStyle {
    /// Transform descriptor, or `None` for the identity transform
    ///
    /// ```ignore
    /// assert_eq!(style.transform().as_deref(), Some("translateY(8px)"));
    /// ```
    pub fn transform(&self) -> Option<String> {
        let mut parts = Vec::new();
        if self.translate_x != 0.0 || self.translate_y != 0.0 {
            if self.translate_x == 0.0 {
                parts.push(format!("translateY({}px)", self.translate_y));
            } else if self.translate_y == 0.0 {
                parts.push(format!("translateX({}px)", self.translate_x));
            } else {
                parts.push(format!(
                    "translate({}px, {}px)",
                    self.translate_x, self.translate_y
                ));
            }
        }
        if self.scale != 1.0 {
            parts.push(format!("scale({})", self.scale));
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Transition descriptor covering opacity and transform
    pub fn transition(&self) -> String {
        let duration = self.timing.duration_ms;
        let easing = self.timing.easing.css_name();
        format!("opacity {duration}ms {easing}, transform {duration}ms {easing}")
    }
}

/// Style of `preset` for `phase`
///
/// `Enter` and `Idle` yield the visible endpoint, `Exit` the hidden one.
pub fn presence_style(
    preset: PresencePreset,
    phase: Phase,
    timing: TransitionConfig,
) -> PresenceStyle {
    let mut style = PresenceStyle {
        opacity: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 1.0,
        timing,
    };
    if phase.is_visible() {
        return style;
    }

    style.opacity = 0.0;
    match preset {
        PresencePreset::FadeIn => {}
        PresencePreset::ScaleIn => style.scale = SCALE_FROM,
        PresencePreset::SlideUp => style.translate_y = SLIDE_OFFSET_PX,
        PresencePreset::SlideDown => style.translate_y = -SLIDE_OFFSET_PX,
    }
    style
}

/// An element that animates in and out with a preset
///
/// ```ignore
/// let config = TransitionConfig::default();
/// let mut toast = Presence::from_name("slideUp", false, config, scheduler.handle())?;
/// toast.set_visible(true);
/// if let Some(style) = toast.style() {
///     render_toast(style.opacity, style.transform());
/// }
/// ```
pub struct Presence {
    preset: PresencePreset,
    controller: TransitionController,
}

impl Presence {
    pub fn new(
        preset: PresencePreset,
        visible: bool,
        config: TransitionConfig,
        timers: impl TimerScheduler + 'static,
    ) -> Self {
        Self {
            preset,
            controller: TransitionController::new(visible, config, timers),
        }
    }

    /// Like [`Presence::new`], resolving the preset by name
    pub fn from_name(
        preset: &str,
        visible: bool,
        config: TransitionConfig,
        timers: impl TimerScheduler + 'static,
    ) -> Result<Self> {
        let preset = preset.parse()?;
        Ok(Self::new(preset, visible, config, timers))
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.controller.set_visible(visible);
    }

    pub fn preset(&self) -> PresencePreset {
        self.preset
    }

    pub fn state(&self) -> TransitionState {
        self.controller.state()
    }

    pub fn is_mounted(&self) -> bool {
        self.controller.is_mounted()
    }

    /// Properties to render, `None` while unmounted
    pub fn style(&self) -> Option<PresenceStyle> {
        let state = self.controller.state();
        state
            .mounted
            .then(|| presence_style(self.preset, state.phase, self.controller.config()))
    }

    pub fn controller(&self) -> &TransitionController {
        &self.controller
    }

    pub fn destroy(&mut self) {
        self.controller.destroy();
    }
}
