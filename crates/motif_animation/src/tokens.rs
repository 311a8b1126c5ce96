//! Motion design tokens
//!
//! Durations, easing, spring and press settings shared by every motion
//! primitive of a theme. Tokens load from TOML; every section and field is
//! optional and falls back to its default:
//!
//! ```toml
//! reduced_motion = false
//!
//! [durations]
//! fast = 150
//! normal = 200
//! slow = 300
//!
//! [easing]
//! default = "easeOut"
//!
//! [spring]
//! tension = 170.0
//! friction = 26.0
//!
//! [press]
//! scale = 0.97
//! ```

use crate::animator::AnimatorConfig;
use crate::easing::Easing;
use crate::error::{MotionError, Result};
use crate::press::{PressConfig, DEFAULT_PRESSED_SCALE};
use crate::spring::{SpringConfig, DEFAULT_FRICTION, DEFAULT_TENSION};
use crate::transition::TransitionConfig;
use serde::{Deserialize, Serialize};

/// Named duration steps
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Speed {
    Fast,
    #[default]
    Normal,
    Slow,
}

/// Motion tokens of a theme
#[derive(Clone, Debug, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionTokens {
    /// Resolve every duration to zero (instant transitions)
    pub reduced_motion: bool,
    pub durations: DurationTokens,
    pub easing: EasingTokens,
    pub spring: SpringTokens,
    pub press: PressTokens,
}

// =============================================================================
// Sections
// =============================================================================

/// Durations in milliseconds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DurationTokens {
    pub fast: u32,
    pub normal: u32,
    pub slow: u32,
}

impl Default for DurationTokens {
    fn default() -> Self {
        Self {
            fast: 150,
            normal: 200,
            slow: 300,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EasingTokens {
    /// Unknown names fall back to `easeOut`
    #[serde(rename = "default")]
    pub standard: Easing,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpringTokens {
    pub tension: f64,
    pub friction: f64,
    pub mass: f64,
}

impl Default for SpringTokens {
    fn default() -> Self {
        Self {
            tension: DEFAULT_TENSION,
            friction: DEFAULT_FRICTION,
            mass: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PressTokens {
    /// Scale while pressed
    pub scale: f64,
}

impl Default for PressTokens {
    fn default() -> Self {
        Self {
            scale: DEFAULT_PRESSED_SCALE,
        }
    }
}

// =============================================================================
// Loading and resolution
// =============================================================================

impl MotionTokens {
    /// Parse and validate tokens from TOML
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let tokens: MotionTokens = toml::from_str(source)?;
        tokens.validate()?;
        tracing::debug!("MotionTokens: loaded {:?}", tokens);
        Ok(tokens)
    }

    /// Reject values the motion primitives would otherwise have to clamp
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(MotionError::InvalidConfig(format!(
                    "{name} must be a positive number, got {value}"
                )))
            }
        };

        positive("spring.tension", self.spring.tension)?;
        positive("spring.friction", self.spring.friction)?;
        positive("spring.mass", self.spring.mass)?;
        positive("press.scale", self.press.scale)?;
        Ok(())
    }

    /// Duration for `speed`, zero under reduced motion
    pub fn duration(&self, speed: Speed) -> u32 {
        if self.reduced_motion {
            return 0;
        }
        match speed {
            Speed::Fast => self.durations.fast,
            Speed::Normal => self.durations.normal,
            Speed::Slow => self.durations.slow,
        }
    }

    pub fn easing(&self) -> Easing {
        self.easing.standard
    }

    pub fn transition_config(&self, speed: Speed) -> TransitionConfig {
        TransitionConfig::new(self.duration(speed), self.easing())
    }

    pub fn animator_config(&self, speed: Speed) -> AnimatorConfig {
        AnimatorConfig::new(self.duration(speed), self.easing())
    }

    pub fn spring_config(&self) -> SpringConfig {
        SpringConfig::new(self.spring.tension, self.spring.friction).with_mass(self.spring.mass)
    }

    pub fn press_config(&self) -> PressConfig {
        PressConfig::new(self.press.scale, self.spring_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_primitives() {
        let tokens = MotionTokens::default();
        assert_eq!(tokens.transition_config(Speed::Normal), TransitionConfig::default());
        assert_eq!(tokens.spring_config(), SpringConfig::default());
        assert_eq!(tokens.press_config(), PressConfig::default());
        assert_eq!(tokens.duration(Speed::Fast), 150);
        assert_eq!(tokens.duration(Speed::Slow), 300);
    }

    #[test]
    fn test_parse_full_file() {
        let tokens = MotionTokens::from_toml_str(
            r#"
            reduced_motion = false

            [durations]
            fast = 100
            normal = 250
            slow = 400

            [easing]
            default = "easeInOut"

            [spring]
            tension = 300.0
            friction = 20.0

            [press]
            scale = 0.95
            "#,
        )
        .unwrap();

        assert_eq!(tokens.duration(Speed::Normal), 250);
        assert_eq!(tokens.easing(), Easing::EaseInOut);
        assert_eq!(tokens.spring_config().tension, 300.0);
        assert_eq!(tokens.spring_config().mass, 1.0);
        assert_eq!(tokens.press_config().pressed_scale, 0.95);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let tokens = MotionTokens::from_toml_str("[durations]\nslow = 500\n").unwrap();
        assert_eq!(tokens.duration(Speed::Slow), 500);
        assert_eq!(tokens.duration(Speed::Fast), 150);
        assert_eq!(tokens.easing(), Easing::EaseOut);

        assert_eq!(MotionTokens::from_toml_str("").unwrap(), MotionTokens::default());
    }

    #[test]
    fn test_unknown_easing_falls_back() {
        let tokens = MotionTokens::from_toml_str("[easing]\ndefault = \"spring\"\n").unwrap();
        assert_eq!(tokens.easing(), Easing::EaseOut);
    }

    #[test]
    fn test_reduced_motion_zeroes_durations() {
        let tokens = MotionTokens::from_toml_str("reduced_motion = true\n").unwrap();
        assert_eq!(tokens.transition_config(Speed::Slow).duration_ms, 0);
        assert_eq!(tokens.animator_config(Speed::Fast).duration_ms, 0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = MotionTokens::from_toml_str("[spring]\ntension = -1.0\n").unwrap_err();
        assert!(matches!(
            err,
            MotionError::InvalidConfig(ref msg) if msg.contains("spring.tension")
        ));

        let err = MotionTokens::from_toml_str("[press]\nscale = 0.0\n").unwrap_err();
        assert!(matches!(err, MotionError::InvalidConfig(_)));

        let err = MotionTokens::from_toml_str("[durations]\nfast = -5\n").unwrap_err();
        assert!(matches!(err, MotionError::Parse(_)));
    }
}
