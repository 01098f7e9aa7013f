//! Top-level krill configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{EnvPlacement, ExtractConfig, IdentifierConfig, ResolveConfig};
use crate::errors::ConfigError;

/// Project-level config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "krill.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`KRILL_*`)
/// 3. Project config (`krill.toml` in project root)
/// 4. User config (`~/.krill/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KrillConfig {
    pub identifier: IdentifierConfig,
    pub extract: ExtractConfig,
    pub resolve: ResolveConfig,
}

/// Override arguments supplied by the embedding program.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub prefix: Option<String>,
    pub min_width: Option<usize>,
    pub env_marker: Option<String>,
    pub max_identifier_len: Option<usize>,
}

impl KrillConfig {
    /// Load configuration with layered resolution rooted at `root`.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Lowest priority: user config. Only a parse failure is fatal here.
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Compiled defaults plus `KRILL_*` environment variables, no files.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &KrillConfig) -> Result<(), ConfigError> {
        if config.identifier.min_width == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "identifier.min_width".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.identifier.env_marker.as_deref() == Some("") {
            return Err(ConfigError::ValidationFailed {
                field: "identifier.env_marker".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if config.extract.root_key_variable.as_deref() == Some("") {
            return Err(ConfigError::ValidationFailed {
                field: "extract.root_key_variable".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if config.resolve.max_identifier_len == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "resolve.max_identifier_len".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.krill/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".krill").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut KrillConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: KrillConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `Some` values in `other` win.
    fn merge(base: &mut KrillConfig, other: &KrillConfig) {
        // Identifier
        if other.identifier.prefix.is_some() {
            base.identifier.prefix = other.identifier.prefix.clone();
        }
        if other.identifier.min_width.is_some() {
            base.identifier.min_width = other.identifier.min_width;
        }
        if other.identifier.env_marker.is_some() {
            base.identifier.env_marker = other.identifier.env_marker.clone();
        }
        if other.identifier.env_placement.is_some() {
            base.identifier.env_placement = other.identifier.env_placement;
        }
        if other.identifier.env_separator.is_some() {
            base.identifier.env_separator = other.identifier.env_separator.clone();
        }

        // Extract
        if other.extract.root_key_variable.is_some() {
            base.extract.root_key_variable = other.extract.root_key_variable.clone();
        }

        // Resolve
        if other.resolve.max_identifier_len.is_some() {
            base.resolve.max_identifier_len = other.resolve.max_identifier_len;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `KRILL_IDENTIFIER_PREFIX`, `KRILL_RESOLVE_MAX_IDENTIFIER_LEN`, etc.
    /// Values that fail to parse are ignored.
    fn apply_env_overrides(config: &mut KrillConfig) {
        if let Ok(val) = std::env::var("KRILL_IDENTIFIER_PREFIX") {
            config.identifier.prefix = Some(val);
        }
        if let Ok(val) = std::env::var("KRILL_IDENTIFIER_MIN_WIDTH") {
            if let Ok(v) = val.parse::<usize>() {
                config.identifier.min_width = Some(v);
            }
        }
        if let Ok(val) = std::env::var("KRILL_IDENTIFIER_ENV_MARKER") {
            config.identifier.env_marker = Some(val);
        }
        if let Ok(val) = std::env::var("KRILL_IDENTIFIER_ENV_PLACEMENT") {
            if let Ok(v) = val.parse::<EnvPlacement>() {
                config.identifier.env_placement = Some(v);
            }
        }
        if let Ok(val) = std::env::var("KRILL_IDENTIFIER_ENV_SEPARATOR") {
            config.identifier.env_separator = Some(val);
        }
        if let Ok(val) = std::env::var("KRILL_EXTRACT_ROOT_KEY_VARIABLE") {
            config.extract.root_key_variable = Some(val);
        }
        if let Ok(val) = std::env::var("KRILL_RESOLVE_MAX_IDENTIFIER_LEN") {
            if let Ok(v) = val.parse::<usize>() {
                config.resolve.max_identifier_len = Some(v);
            }
        }
    }

    /// Apply explicit overrides (highest priority).
    pub fn apply_overrides(config: &mut KrillConfig, overrides: &ConfigOverrides) {
        if let Some(ref v) = overrides.prefix {
            config.identifier.prefix = Some(v.clone());
        }
        if let Some(v) = overrides.min_width {
            config.identifier.min_width = Some(v);
        }
        if let Some(ref v) = overrides.env_marker {
            config.identifier.env_marker = Some(v.clone());
        }
        if let Some(v) = overrides.max_identifier_len {
            config.resolve.max_identifier_len = Some(v);
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
