//! Violations and violation lists
//!
//! A [`Violation`] records one failed rule: where it failed, the rendered
//! message and the template it came from, a stable code, the originating
//! constraint and the offending value. A [`ViolationList`] keeps violations
//! in evaluation order and renders one line per violation.

use std::fmt;

use serde::Serialize;
use serde::ser::SerializeStruct;
use serde_json::Value;

use crate::constraint::Constraint;
use crate::foundation::message::{self, Parameters};
use crate::foundation::path::PropertyPath;

// ============================================================================
// VIOLATION
// ============================================================================

/// One failed rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub(crate) path: PropertyPath,
    pub(crate) root: String,
    pub(crate) message: String,
    pub(crate) template: String,
    pub(crate) parameters: Parameters,
    pub(crate) plural: Option<u64>,
    pub(crate) code: String,
    pub(crate) constraint: Option<Constraint>,
    pub(crate) invalid_value: Value,
}

impl Violation {
    /// Creates a violation at the root path with an uninterpolated message.
    ///
    /// Mostly useful for callers that edit a [`ViolationList`] by hand;
    /// validators build violations through
    /// [`ExecutionContext::build_violation`](crate::foundation::ExecutionContext::build_violation).
    pub fn new(template: impl Into<String>, code: impl Into<String>) -> Self {
        let template = template.into();
        Self {
            path: PropertyPath::root(),
            root: String::new(),
            message: message::select_plural(&template, None).to_owned(),
            template,
            parameters: Parameters::new(),
            plural: None,
            code: code.into(),
            constraint: None,
            invalid_value: Value::Null,
        }
    }

    /// Sets the path and returns the violation.
    pub fn with_path(mut self, path: impl Into<PropertyPath>) -> Self {
        self.path = path.into();
        self
    }

    /// Adds a parameter and re-renders the message.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self.message = message::render(&self.template, &self.parameters, self.plural);
        self
    }

    /// Attaches the originating constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }

    /// Sets the offending value.
    pub fn with_invalid_value(mut self, value: Value) -> Self {
        self.invalid_value = value;
        self
    }

    /// Location of the failure. Empty for the validated value itself.
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    /// Interpolated message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message before interpolation and plural selection.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Parameters used to render the message.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Number used for plural selection, if any.
    pub fn plural(&self) -> Option<u64> {
        self.plural
    }

    /// Stable code identifying the failure reason.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Constraint that produced the violation.
    pub fn constraint(&self) -> Option<&Constraint> {
        self.constraint.as_ref()
    }

    /// Value that failed.
    pub fn invalid_value(&self) -> &Value {
        &self.invalid_value
    }

    fn label(&self) -> String {
        if self.path.is_root() {
            self.root.clone()
        } else {
            self.path.to_string()
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (code {})",
            message::escape_line(&self.label()),
            message::escape_line(&self.message),
            message::escape_line(&self.code)
        )
    }
}

impl Serialize for Violation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Violation", 7)?;
        state.serialize_field("path", &self.path)?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("template", &self.template)?;
        state.serialize_field("parameters", &self.parameters)?;
        state.serialize_field("code", &self.code)?;
        state.serialize_field("constraint", &self.constraint.as_ref().map(Constraint::name))?;
        state.serialize_field("invalid_value", &self.invalid_value)?;
        state.end()
    }
}

// ============================================================================
// VIOLATION LIST
// ============================================================================

/// Ordered collection of violations produced by one validation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ViolationList(Vec<Violation>);

impl ViolationList {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Alias of [`len`](Self::len).
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.len()
    }

    /// Returns true when validation passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Violation at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Violation> {
        self.0.get(index)
    }

    /// Appends a violation.
    pub fn add(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    /// Appends every violation of `other`.
    pub fn extend(&mut self, other: ViolationList) {
        self.0.extend(other.0);
    }

    /// Replaces the violation at `index` and returns the old one.
    ///
    /// Out-of-range indices leave the list untouched and return `None`.
    pub fn set(&mut self, index: usize, violation: Violation) -> Option<Violation> {
        let slot = self.0.get_mut(index)?;
        Some(std::mem::replace(slot, violation))
    }

    /// Removes and returns the violation at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Violation> {
        (index < self.0.len()).then(|| self.0.remove(index))
    }

    /// Violations whose rendered path equals `path`.
    pub fn by_path<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.0.iter().filter(move |v| v.path.to_string() == path)
    }

    /// Violations carrying `code`.
    pub fn by_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.0.iter().filter(move |v| v.code == code)
    }

    /// JSON export of the whole list.
    #[must_use]
    pub fn to_json_value(&self) -> Value {
        Value::Array(
            self.0
                .iter()
                .map(|v| serde_json::to_value(v).unwrap_or(Value::Null))
                .collect(),
        )
    }

    /// `Ok(())` when empty, the list itself otherwise.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ViolationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for violation in &self.0 {
            writeln!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl IntoIterator for ViolationList {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ViolationList {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Violation> for ViolationList {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// TESTS
// ============================================================================
