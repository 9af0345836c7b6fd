//! Validator settings
//!
//! ```yaml
//! stop_on_first_violation: false
//! missing_fields: skip
//! cache_metadata: true
//! mapping_files:
//!   - config/validation/user.yml
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::SettingsError;

/// How [`Collection`](crate::validators::Collection) treats missing keys
/// when the constraint does not say.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Report "This field is missing.".
    #[default]
    Violation,
    /// Ignore missing keys.
    Skip,
}

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case", deny_unknown_fields)]
pub struct ValidatorSettings {
    /// Stop an explicit constraint list after the first constraint that
    /// reported a violation.
    pub stop_on_first_violation: bool,
    /// Default for Collection's `allowMissingFields`.
    pub missing_fields: MissingFieldPolicy,
    /// Cache resolved record metadata per type.
    pub cache_metadata: bool,
    /// YAML mapping files loaded after the builder's own sources.
    pub mapping_files: Vec<PathBuf>,
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            stop_on_first_violation: true,
            missing_fields: MissingFieldPolicy::Violation,
            cache_metadata: true,
            mapping_files: Vec::new(),
        }
    }
}

impl ValidatorSettings {
    /// Parses settings from YAML text. An empty document yields the defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, SettingsError> {
        let settings: Option<Self> = serde_yaml::from_str(text)?;
        Ok(settings.unwrap_or_default())
    }

    /// Reads settings from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded validator settings");
        Ok(settings)
    }

    #[must_use]
    pub fn with_stop_on_first_violation(mut self, stop: bool) -> Self {
        self.stop_on_first_violation = stop;
        self
    }

    #[must_use]
    pub fn with_missing_fields(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_fields = policy;
        self
    }

    #[must_use]
    pub fn with_cache_metadata(mut self, enabled: bool) -> Self {
        self.cache_metadata = enabled;
        self
    }

    /// Appends a YAML mapping file.
    #[must_use]
    pub fn with_mapping_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.mapping_files.push(path.into());
        self
    }
}
