//! Typed access to a constraint's option map.

use serde_json::{Map, Value};

use crate::foundation::{ConfigurationError, Groups};

/// Consumes options one key at a time; whatever is left over at
/// [`finish`](Self::finish) is an unknown option.
#[derive(Debug)]
pub(crate) struct OptionReader<'k> {
    kind: &'k str,
    options: Map<String, Value>,
}

impl<'k> OptionReader<'k> {
    pub(crate) fn new(kind: &'k str, options: Map<String, Value>) -> Self {
        Self { kind, options }
    }

    pub(crate) fn kind(&self) -> &'k str {
        self.kind
    }

    pub(crate) fn take(&mut self, key: &str) -> Option<Value> {
        self.options.remove(key)
    }

    pub(crate) fn required(&mut self, key: &str) -> Result<Value, ConfigurationError> {
        match self.take(key) {
            Some(Value::Null) | None => Err(ConfigurationError::missing(self.kind, key)),
            Some(value) => Ok(value),
        }
    }

    pub(crate) fn string(&mut self, key: &str) -> Result<Option<String>, ConfigurationError> {
        match self.take(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.wrong_type(key, "a string", &other)),
        }
    }

    pub(crate) fn bool(&mut self, key: &str) -> Result<Option<bool>, ConfigurationError> {
        match self.take(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(b)),
            Some(other) => Err(self.wrong_type(key, "a boolean", &other)),
        }
    }

    pub(crate) fn usize(&mut self, key: &str) -> Result<Option<usize>, ConfigurationError> {
        match self.take(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| {
                    ConfigurationError::invalid(self.kind, key, "expected a non-negative integer")
                }),
            Some(other) => Err(self.wrong_type(key, "a non-negative integer", &other)),
        }
    }

    /// Leftover keys are rejected; the first one is reported.
    pub(crate) fn finish(self) -> Result<(), ConfigurationError> {
        match self.options.keys().next() {
            Some(key) => Err(ConfigurationError::unknown_option(self.kind, key)),
            None => Ok(()),
        }
    }

    fn wrong_type(&self, key: &str, expected: &str, found: &Value) -> ConfigurationError {
        ConfigurationError::invalid(
            self.kind,
            key,
            format!("expected {expected}, found {}", crate::foundation::type_name(found)),
        )
    }
}

/// Reads the `groups` option: a string or a list of strings.
pub(crate) fn parse_groups(kind: &str, value: Value) -> Result<Option<Groups>, ConfigurationError> {
    match value {
        Value::Null => Ok(None),
        Value::String(name) => Ok(Some(Groups::single(name))),
        Value::Array(items) => {
            if items.is_empty() {
                return Ok(None);
            }
            items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name),
                    other => Err(ConfigurationError::invalid(
                        kind,
                        "groups",
                        format!(
                            "expected group names, found {}",
                            crate::foundation::type_name(&other)
                        ),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(|names| Some(Groups::new(names)))
        }
        other => Err(ConfigurationError::invalid(
            kind,
            "groups",
            format!(
                "expected a string or a list of strings, found {}",
                crate::foundation::type_name(&other)
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reader(value: Value) -> OptionReader<'static> {
        match value {
            Value::Object(map) => OptionReader::new("Test", map),
            _ => OptionReader::new("Test", Map::new()),
        }
    }

    #[test]
    fn typed_reads() {
        let mut options = reader(json!({"min": 3, "message": "m", "allowNull": true}));
        assert_eq!(options.usize("min"), Ok(Some(3)));
        assert_eq!(options.string("message"), Ok(Some("m".to_owned())));
        assert_eq!(options.bool("allowNull"), Ok(Some(true)));
        assert_eq!(options.usize("max"), Ok(None));
        assert!(options.finish().is_ok());
    }

    #[test]
    fn wrong_type_is_invalid_option() {
        let mut options = reader(json!({"min": "three"}));
        assert!(matches!(
            options.usize("min"),
            Err(ConfigurationError::InvalidOption { .. })
        ));
    }

    #[test]
    fn leftovers_are_unknown() {
        let options = reader(json!({"colour": "red"}));
        assert_eq!(
            options.finish(),
            Err(ConfigurationError::UnknownOption {
                kind: "Test".into(),
                option: "colour".into()
            })
        );
    }

    #[test]
    fn required_rejects_null() {
        let mut options = reader(json!({"value": null}));
        assert!(matches!(
            options.required("value"),
            Err(ConfigurationError::MissingOption { .. })
        ));
    }

    #[test]
    fn groups_forms() {
        assert_eq!(parse_groups("T", json!("identity")), Ok(Some(Groups::from("identity"))));
        assert_eq!(
            parse_groups("T", json!(["identity", "Default"])),
            Ok(Some(Groups::from(["Default", "identity"])))
        );
        assert_eq!(parse_groups("T", json!([])), Ok(None));
        assert!(parse_groups("T", json!(5)).is_err());
    }
}
