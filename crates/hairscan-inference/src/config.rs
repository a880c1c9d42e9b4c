//! Configuration loading.
//!
//! Configuration can be loaded from:
//! - a TOML file (default: `<config_dir>/hairscan/hairscan.toml`)
//! - environment variables (`HAIRSCAN_*`)
//!
//! # Example
//!
//! ```rust,no_run
//! use hairscan_inference::config::HairscanConfig;
//!
//! // Load from default path or fall back to env vars
//! let config = HairscanConfig::load().expect("Failed to load config");
//!
//! // Or explicitly from a file
//! let config = HairscanConfig::from_file(std::path::Path::new("hairscan.toml")).expect("Failed to load");
//! ```
//!
//! ```toml
//! [api]
//! api_key = "${OPENAI_API_KEY}"
//! vision_model = "gpt-4o"
//!
//! [pipeline]
//! failure_mode = "graceful"
//! ```

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use hairscan_core::defaults::{
    ENV_API_KEY, ENV_API_URL, ENV_FAILURE_MODE, ENV_FALLBACK_SEED, ENV_OPENAI_API_KEY,
    ENV_SKIP_TLS_VERIFY, ENV_TEXT_MODEL, ENV_TIMEOUT, ENV_VISION_MODEL,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::openai::OpenAIConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid failure mode: {0} (expected \"strict\" or \"graceful\")")]
    InvalidFailureMode(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for hairscan_core::Error {
    fn from(e: ConfigError) -> Self {
        hairscan_core::Error::Config(e.to_string())
    }
}

/// How the orchestrator reacts to API failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Surface every API error to the caller.
    #[default]
    Strict,
    /// Substitute fallback data and complete the session.
    Graceful,
}

impl FromStr for FailureMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "graceful" => Ok(Self::Graceful),
            _ => Err(ConfigError::InvalidFailureMode(s.to_string())),
        }
    }
}

impl fmt::Display for FailureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Graceful => write!(f, "graceful"),
        }
    }
}

/// Orchestrator settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub failure_mode: FailureMode,
    /// Pin the fallback generator to one seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_seed: Option<u64>,
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HairscanConfig {
    pub api: OpenAIConfig,
    pub pipeline: PipelineSettings,
}

impl HairscanConfig {
    /// Get the default config file path.
    ///
    /// Returns: `<config_dir>/hairscan/hairscan.toml`
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push("hairscan");
        path.push("hairscan.toml");
        path
    }

    /// Load configuration from the default path, falling back to environment variables.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_config_path();

        if path.exists() {
            info!("Loading config from: {}", path.display());
            Self::from_file(&path)
        } else {
            debug!(
                "Config file not found at {}, using environment variables",
                path.display()
            );
            Self::from_env()
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML content, substituting `${VAR}` references first.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let content = Self::substitute_env_vars(content);
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        if config.api.api_key.is_some() && !config.api.is_configured() {
            warn!("api.api_key is set but unusable (blank, placeholder or unresolved ${{VAR}})");
        }
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> ConfigResult<Self> {
        let defaults = OpenAIConfig::default();

        let api = OpenAIConfig {
            base_url: env::var(ENV_API_URL).unwrap_or(defaults.base_url),
            api_key: env::var(ENV_API_KEY)
                .or_else(|_| env::var(ENV_OPENAI_API_KEY))
                .ok(),
            vision_model: env::var(ENV_VISION_MODEL).unwrap_or(defaults.vision_model),
            text_model: env::var(ENV_TEXT_MODEL).unwrap_or(defaults.text_model),
            timeout_seconds: env::var(ENV_TIMEOUT)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.timeout_seconds),
            skip_tls_verify: env::var(ENV_SKIP_TLS_VERIFY)
                .map(|v| v == "1" || v.to_lowercase() == "true")
                .unwrap_or(false),
        };

        let failure_mode = match env::var(ENV_FAILURE_MODE) {
            Ok(value) => value.parse()?,
            Err(_) => FailureMode::default(),
        };

        let pipeline = PipelineSettings {
            failure_mode,
            fallback_seed: env::var(ENV_FALLBACK_SEED)
                .ok()
                .and_then(|s| s.parse().ok()),
        };

        let config = Self { api, pipeline };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        let api = &self.api;

        if api.base_url.is_empty() {
            return Err(ConfigError::Validation(
                "api.base_url cannot be empty".to_string(),
            ));
        }

        if !api.base_url.starts_with("http://") && !api.base_url.starts_with("https://") {
            return Err(ConfigError::Validation(format!(
                "api.base_url must start with http:// or https://, got: {}",
                api.base_url
            )));
        }

        if api.vision_model.is_empty() {
            return Err(ConfigError::Validation(
                "api.vision_model cannot be empty".to_string(),
            ));
        }

        if api.text_model.is_empty() {
            return Err(ConfigError::Validation(
                "api.text_model cannot be empty".to_string(),
            ));
        }

        if api.timeout_seconds == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Substitute environment variables in the format ${VAR_NAME}.
    fn substitute_env_vars(content: &str) -> String {
        let re = match regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
            Ok(re) => re,
            Err(_) => return content.to_string(),
        };
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hairscan_core::defaults::{API_URL, TEXT_MODEL, VISION_MODEL};

    #[test]
    fn test_env_var_substitution_with_value() {
        let content = "api_key = \"${HAIRSCAN_TEST_SUBSTITUTION_VAR}\"";

        env::set_var("HAIRSCAN_TEST_SUBSTITUTION_VAR", "test-value");
        let result = HairscanConfig::substitute_env_vars(content);
        env::remove_var("HAIRSCAN_TEST_SUBSTITUTION_VAR");

        assert_eq!(result, "api_key = \"test-value\"");
    }

    #[test]
    fn test_env_var_substitution_missing() {
        let content = "api_key = \"${NONEXISTENT_HAIRSCAN_VAR_12345}\"";
        let result = HairscanConfig::substitute_env_vars(content);
        assert_eq!(result, "api_key = \"${NONEXISTENT_HAIRSCAN_VAR_12345}\"");
    }

    #[test]
    fn test_defaults() {
        let config = HairscanConfig::default();
        assert_eq!(config.api.base_url, API_URL);
        assert_eq!(config.api.vision_model, VISION_MODEL);
        assert_eq!(config.api.text_model, TEXT_MODEL);
        assert_eq!(config.pipeline.failure_mode, FailureMode::Strict);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
            [api]
            base_url = "http://localhost:8080/v1"
            api_key = "sk-local"
            vision_model = "llava"
            text_model = "llama3"
            timeout_seconds = 30

            [pipeline]
            failure_mode = "graceful"
            fallback_seed = 42
        "#;

        let config = HairscanConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8080/v1");
        assert!(config.api.is_configured());
        assert_eq!(config.api.vision_model, "llava");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.pipeline.failure_mode, FailureMode::Graceful);
        assert_eq!(config.pipeline.fallback_seed, Some(42));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = "[pipeline]\nfailure_mode = \"strict\"\n";
        let config = HairscanConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.api.vision_model, VISION_MODEL);
        assert!(!config.api.is_configured());
    }

    #[test]
    fn test_unresolved_key_reference_is_unconfigured() {
        let toml_str = "[api]\napi_key = \"${HAIRSCAN_TEST_UNSET_KEY_4711}\"\n";
        let config = HairscanConfig::from_toml_str(toml_str).unwrap();

        assert_eq!(config.api.api_key.as_deref(), Some("${HAIRSCAN_TEST_UNSET_KEY_4711}"));
        assert!(!config.api.is_configured());
    }

    #[test]
    fn test_resolved_key_reference_is_configured() {
        let toml_str = "[api]\napi_key = \"${HAIRSCAN_TEST_SET_KEY_4711}\"\n";

        env::set_var("HAIRSCAN_TEST_SET_KEY_4711", "sk-from-env");
        let config = HairscanConfig::from_toml_str(toml_str).unwrap();
        env::remove_var("HAIRSCAN_TEST_SET_KEY_4711");

        assert_eq!(config.api.api_key.as_deref(), Some("sk-from-env"));
        assert!(config.api.is_configured());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = HairscanConfig::from_toml_str("[api]\nbase_url = \"ftp://x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_invalid_failure_mode_rejected() {
        let err = HairscanConfig::from_toml_str("[pipeline]\nfailure_mode = \"lenient\"\n");
        assert!(err.is_err());
        assert!("lenient".parse::<FailureMode>().is_err());
    }

    #[test]
    fn test_failure_mode_parse() {
        assert_eq!("strict".parse::<FailureMode>().unwrap(), FailureMode::Strict);
        assert_eq!(" Graceful ".parse::<FailureMode>().unwrap(), FailureMode::Graceful);
        assert_eq!(FailureMode::Graceful.to_string(), "graceful");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hairscan.toml");
        std::fs::write(&path, "[api]\ntext_model = \"gpt-4.1-mini\"\n").unwrap();

        let config = HairscanConfig::from_file(&path).unwrap();
        assert_eq!(config.api.text_model, "gpt-4.1-mini");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = HairscanConfig::from_file(Path::new("/nonexistent/hairscan.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead(_)));
    }
}
