//! # FoodScan Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority)                               │
//! │     --endpoint 'http://localhost:8080/product/{code}.json'              │
//! │                                                                         │
//! │  2. Environment Variables                                               │
//! │     FOODSCAN_ENDPOINT, FOODSCAN_TIMEOUT_SECS,                           │
//! │     FOODSCAN_USER_AGENT, FOODSCAN_BELL                                  │
//! │                                                                         │
//! │  3. TOML Config File                                                    │
//! │     ~/.config/foodscan/foodscan.toml (Linux)                            │
//! │     ~/Library/Application Support/org.foodscan.foodscan/ (macOS)        │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! endpoint = "https://world.openfoodfacts.org/api/v2/product/{code}.json"
//! timeout_secs = 15
//! user_agent = "foodscan/0.1.0"
//!
//! [scanner]
//! bell = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use foodscan_core::DEFAULT_ENDPOINT_TEMPLATE;
use foodscan_lookup::{EndpointTemplate, HttpFetcherConfig, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// File name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "foodscan.toml";

// =============================================================================
// API Settings
// =============================================================================

/// Where and how products are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Request URL template with one `{code}` placeholder.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Whole-request timeout (seconds).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `User-Agent` sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT_TEMPLATE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

// =============================================================================
// Scanner Settings
// =============================================================================

/// Scanner behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerSettings {
    /// Ring the terminal bell when a code is scanned.
    #[serde(default = "default_true")]
    pub bell: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ScannerSettings {
    fn default() -> Self {
        ScannerSettings { bell: true }
    }
}

// =============================================================================
// App Configuration
// =============================================================================

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub scanner: ScannerSettings,
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (foodscan.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns defaults if loading fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file, returning the path written.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::SaveFailed(e.to_string()))?;
        }

        std::fs::write(&path, self.to_toml()?)
            .map_err(|e| ConfigError::SaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(path)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        self.endpoint_template()?;

        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.timeout_secs must be greater than 0".into(),
            ));
        }

        if self.api.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid("api.user_agent must not be empty".into()));
        }

        Ok(())
    }

    /// The parsed endpoint template.
    pub fn endpoint_template(&self) -> ConfigResult<EndpointTemplate> {
        EndpointTemplate::new(self.api.endpoint.as_str())
            .map_err(|e| ConfigError::Invalid(format!("api.endpoint: {}", e)))
    }

    /// Settings for the HTTP fetcher.
    pub fn fetcher_config(&self) -> HttpFetcherConfig {
        HttpFetcherConfig {
            timeout: Duration::from_secs(self.api.timeout_secs),
            user_agent: self.api.user_agent.clone(),
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("org", "foodscan", "foodscan")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = var("FOODSCAN_ENDPOINT") {
            debug!(endpoint = %endpoint, "Overriding endpoint from environment");
            self.api.endpoint = endpoint;
        }

        if let Some(timeout) = var("FOODSCAN_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric FOODSCAN_TIMEOUT_SECS"),
            }
        }

        if let Some(user_agent) = var("FOODSCAN_USER_AGENT") {
            self.api.user_agent = user_agent;
        }

        if let Some(bell) = var("FOODSCAN_BELL") {
            match bell.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.scanner.bell = true,
                "0" | "false" | "no" | "off" => self.scanner.bell = false,
                _ => warn!(value = %bell, "Unknown FOODSCAN_BELL value"),
            }
        }
    }
}
