//! Error types for the validation engine
//!
//! Violations are never errors: a failed rule is recorded in a
//! [`ViolationList`](crate::foundation::ViolationList). The types here
//! describe the cases where validation could not run at all.
//!
//! - [`ConfigurationError`]: a constraint could not be built from its options.
//! - [`MappingError`]: a metadata source (method, attributes, YAML) is broken.
//! - [`UsageError`]: the engine was called without anything to check.
//! - [`SettingsError`]: validator settings could not be read.
//! - [`ValidatorError`]: the umbrella returned by [`Validator`](crate::Validator).

use std::path::PathBuf;

// ============================================================================
// CONFIGURATION ERROR
// ============================================================================

/// Raised while constructing a constraint.
///
/// Not recoverable at runtime; the caller has to fix the constraint
/// declaration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// The constraint kind is neither built in nor registered.
    #[error("unknown constraint kind `{kind}`")]
    UnknownConstraint {
        /// Kind name as written by the caller.
        kind: String,
    },

    /// A required option was not supplied.
    #[error("constraint `{kind}` requires option `{option}`")]
    MissingOption {
        /// Constraint kind.
        kind: String,
        /// Name of the missing option.
        option: String,
    },

    /// An option key is not understood by the constraint kind.
    #[error("constraint `{kind}` does not accept option `{option}`")]
    UnknownOption {
        /// Constraint kind.
        kind: String,
        /// Name of the unrecognized option.
        option: String,
    },

    /// An option is present but its value is unusable.
    #[error("constraint `{kind}` option `{option}` is invalid: {reason}")]
    InvalidOption {
        /// Constraint kind.
        kind: String,
        /// Name of the offending option.
        option: String,
        /// What is wrong with the value.
        reason: String,
    },

    /// A bare value was given but the kind declares no default option.
    #[error("constraint `{kind}` has no default option; pass options as a map")]
    NoDefaultOption {
        /// Constraint kind.
        kind: String,
    },

    /// A constraint declaration could not be read at all.
    #[error("malformed constraint declaration: {reason}")]
    MalformedDeclaration {
        /// Human-readable description.
        reason: String,
    },
}

impl ConfigurationError {
    pub(crate) fn missing(kind: &str, option: &str) -> Self {
        Self::MissingOption {
            kind: kind.to_owned(),
            option: option.to_owned(),
        }
    }

    pub(crate) fn unknown_option(kind: &str, option: &str) -> Self {
        Self::UnknownOption {
            kind: kind.to_owned(),
            option: option.to_owned(),
        }
    }

    pub(crate) fn invalid(kind: &str, option: &str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            kind: kind.to_owned(),
            option: option.to_owned(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDeclaration {
            reason: reason.into(),
        }
    }
}

// ============================================================================
// MAPPING ERROR
// ============================================================================

/// Raised while loading record metadata from one of its sources.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// A mapping file could not be read.
    #[error("failed to read mapping file {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A mapping document is not valid YAML or has the wrong layout.
    #[error("failed to parse mapping {origin}: {source}")]
    Yaml {
        /// File path or a caller-supplied label.
        origin: String,
        /// Underlying parser error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A constraint declared for a property could not be built.
    #[error("{source_name} mapping for `{shape}.{property}`: {error}")]
    Constraint {
        /// Metadata source that declared the constraint.
        source_name: &'static str,
        /// Record name.
        shape: String,
        /// Property name.
        property: String,
        /// Construction failure.
        #[source]
        error: ConfigurationError,
    },

    /// The static metadata method of a record failed.
    #[error("static metadata method of `{shape}` failed: {error}")]
    StaticMethod {
        /// Record name.
        shape: String,
        /// Construction failure raised inside the method.
        #[source]
        error: ConfigurationError,
    },
}

// ============================================================================
// USAGE ERROR
// ============================================================================

/// Raised when the engine is called without anything it could check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    /// A plain value was passed without explicit constraints.
    #[error("no constraints given for a {shape} value and no record metadata to derive them from")]
    NoConstraints {
        /// JSON type of the value (`string`, `array`, ...).
        shape: &'static str,
    },
}

// ============================================================================
// SETTINGS ERROR
// ============================================================================

/// Raised when validator settings cannot be read.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("failed to read settings file {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings document could not be parsed.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),
}

// ============================================================================
// VALIDATOR ERROR
// ============================================================================

/// Everything that can stop [`Validator::validate`](crate::Validator::validate)
/// from producing a violation list.
#[derive(Debug, thiserror::Error)]
pub enum ValidatorError {
    /// The call itself was malformed.
    #[error(transparent)]
    Usage(#[from] UsageError),

    /// Record metadata could not be resolved.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// A constraint refers to a kind the validator cannot evaluate.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A record could not be turned into a value tree.
    #[error("failed to serialize record `{shape}`: {source}")]
    Serialization {
        /// Record name.
        shape: &'static str,
        /// Underlying serializer error.
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_error_messages() {
        let error = ConfigurationError::missing("GreaterThanOrEqual", "value");
        assert_eq!(
            error.to_string(),
            "constraint `GreaterThanOrEqual` requires option `value`"
        );

        let error = ConfigurationError::unknown_option("NotBlank", "colour");
        assert_eq!(
            error.to_string(),
            "constraint `NotBlank` does not accept option `colour`"
        );
    }

    #[test]
    fn usage_error_converts_into_validator_error() {
        let error: ValidatorError = UsageError::NoConstraints { shape: "string" }.into();
        assert!(matches!(error, ValidatorError::Usage(_)));
        assert!(error.to_string().contains("string value"));
    }

    #[test]
    fn mapping_error_keeps_source() {
        let error = MappingError::Constraint {
            source_name: "yaml",
            shape: "User".into(),
            property: "age".into(),
            error: ConfigurationError::missing("GreaterThanOrEqual", "value"),
        };
        assert!(std::error::Error::source(&error).is_some());
        assert!(error.to_string().starts_with("yaml mapping for `User.age`"));
    }

    #[test]
    fn every_mapping_error_names_where_it_failed() {
        fn origin(error: &MappingError) -> String {
            match error {
                MappingError::Io { path, .. } => path.display().to_string(),
                MappingError::Yaml { origin, .. } => origin.clone(),
                MappingError::Constraint { shape, property, .. } => format!("{shape}.{property}"),
                MappingError::StaticMethod { shape, .. } => shape.clone(),
            }
        }

        let errors = [
            MappingError::Io {
                path: PathBuf::from("mapping/user.yml"),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            },
            MappingError::StaticMethod {
                shape: "User".into(),
                error: ConfigurationError::malformed("empty constraint map"),
            },
        ];
        for error in &errors {
            assert!(error.to_string().contains(&origin(error)), "{error}");
        }
    }
}
