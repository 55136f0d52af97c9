//! Configuration errors
//!
//! Gameplay never fails; a life lost is a state transition. The only errors
//! are malformed world layouts or settings, rejected when they are loaded.

/// Error raised while loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Viewport dimensions must be positive and finite
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    /// A layout value is NaN or infinite
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),

    /// A length, width or size is zero or negative
    #[error("{kind} {index} has non-positive extent {value}")]
    NonPositive {
        kind: &'static str,
        index: usize,
        value: f32,
    },

    /// Two platforms share horizontal span
    #[error("platforms {a} and {b} overlap")]
    OverlappingPlatforms { a: usize, b: usize },

    /// Two canyons share horizontal span
    #[error("canyons {a} and {b} overlap")]
    OverlappingCanyons { a: usize, b: usize },

    /// A canyon is so narrow its edge margins swallow it
    #[error("canyon {index} is narrower than its edge margins")]
    CanyonTooNarrow { index: usize },

    /// The flagpole cannot be reached
    #[error("flagpole at {x} is unreachable: {reason}")]
    UnreachableFlagpole { x: f32, reason: &'static str },

    /// A setting is out of its allowed range
    #[error("setting {name} out of range: {value}")]
    SettingOutOfRange { name: &'static str, value: f32 },

    /// JSON parse failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File read failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
