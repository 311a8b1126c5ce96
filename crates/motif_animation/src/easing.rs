//! Easing curves
//!
//! Map linear progress in `[0, 1]` to eased progress in `[0, 1]`.
//! Every curve is monotonic with `f(0) == 0` and `f(1) == 1`.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Easing curve applied to animation progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    /// No easing
    Linear,
    /// Quadratic acceleration: `t²`
    EaseIn,
    /// Quadratic deceleration: `t·(2−t)`
    #[default]
    EaseOut,
    /// Quadratic acceleration until `t = 0.5`, deceleration after
    EaseInOut,
}

impl Easing {
    /// All supported curves
    pub const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
    ];

    /// Apply the curve to linear progress. Input is clamped to `[0, 1]`.
    #[inline]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }

    /// Resolve a curve by name
    ///
    /// Unknown names fall back to [`Easing::EaseOut`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "linear" => Easing::Linear,
            "easeIn" => Easing::EaseIn,
            "easeOut" => Easing::EaseOut,
            "easeInOut" => Easing::EaseInOut,
            other => {
                tracing::debug!("Unknown easing '{}', falling back to easeOut", other);
                Easing::EaseOut
            }
        }
    }

    /// Name accepted by [`Easing::from_name`]
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "easeIn",
            Easing::EaseOut => "easeOut",
            Easing::EaseInOut => "easeInOut",
        }
    }

    /// CSS timing-function keyword
    pub fn css_name(self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::EaseIn => "ease-in",
            Easing::EaseOut => "ease-out",
            Easing::EaseInOut => "ease-in-out",
        }
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Easing {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Easing::from_name(&name))
    }
}
