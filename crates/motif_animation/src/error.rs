//! Motion error types

use thiserror::Error;

/// Errors raised while resolving motion names or loading motion tokens
///
/// Nothing on the per-frame path returns an error; these only surface at
/// construction or configuration time.
#[derive(Error, Debug)]
pub enum MotionError {
    /// A presence preset name outside the catalog
    #[error("Unknown presence preset: {0}")]
    UnknownPreset(String),

    /// A configuration value outside its valid range
    #[error("Invalid motion configuration: {0}")]
    InvalidConfig(String),

    /// Motion tokens could not be parsed
    #[error("Failed to parse motion tokens: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
