//! # CLI Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        What Reaches main()                              │
//! │                                                                         │
//! │  ConfigError ──┐                                                        │
//! │  SessionError ─┼──► CliError ──► anyhow::Error ──► stderr, exit 2       │
//! │  FetchError ───┘                                                        │
//! │                                                                         │
//! │  LookupOutcome / ScanResult are NOT errors: they are rendered and       │
//! │  mapped to an exit status by the command.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use foodscan_capture::SessionError;
use foodscan_lookup::FetchError;
use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Config Error
// =============================================================================

/// Configuration loading, validation and saving failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or parse the config file.
    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    /// Failed to write the config file.
    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    /// A value is out of range or malformed.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The platform has no config directory and no path was given.
    #[error("No config path available, pass --config")]
    NoConfigPath,
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

// =============================================================================
// CLI Error
// =============================================================================

/// Anything that stops a command before it has an outcome to show.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Capture session error: {0}")]
    Session(#[from] SessionError),

    #[error("Cannot create HTTP client: {0}")]
    Client(#[from] FetchError),

    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_errors_convert() {
        let err: ConfigError = toml::from_str::<toml::Value>("= broken").unwrap_err().into();
        assert!(matches!(err, ConfigError::LoadFailed(_)));
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err: CliError = ConfigError::Invalid("timeout_secs must be > 0".into()).into();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: timeout_secs must be > 0"
        );
    }
}
