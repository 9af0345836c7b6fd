//! Message templates
//!
//! Templates carry `{{ name }}` placeholders and may hold a singular and a
//! plural form separated by `|`:
//!
//! ```text
//! This value is too short. It should have {{ limit }} character or more.|This value is too short. It should have {{ limit }} characters or more.
//! ```

use std::borrow::Cow;

use indexmap::IndexMap;
use serde_json::Value;

/// Placeholder name to rendered value, in insertion order.
pub type Parameters = IndexMap<String, String>;

/// Picks the singular or plural form of a template.
///
/// Templates without `|` are returned whole. Otherwise the first form is
/// used when `plural` is `None` or `1`, the second form for anything else.
#[must_use]
pub fn select_plural(template: &str, plural: Option<u64>) -> &str {
    let Some((singular, rest)) = template.split_once('|') else {
        return template;
    };
    match plural {
        None | Some(1) => singular,
        Some(_) => rest.split('|').next().unwrap_or(rest),
    }
}

/// Replaces `{{ name }}` placeholders with their parameter values.
///
/// Whitespace inside the braces is ignored. Unknown placeholders are kept
/// verbatim.
#[must_use]
pub fn interpolate(template: &str, parameters: &Parameters) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = after[..end].trim();
        match parameters.get(name) {
            Some(value) => out.push_str(value),
            None => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

/// Renders a message for `template` in one step.
#[must_use]
pub fn render(template: &str, parameters: &Parameters, plural: Option<u64>) -> String {
    interpolate(select_plural(template, plural), parameters)
}

/// Formats a value for use as a message parameter.
///
/// Strings are quoted, containers are named by their type.
#[must_use]
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format!("\"{s}\""),
        Value::Array(_) => "array".to_owned(),
        Value::Object(_) => "object".to_owned(),
    }
}

/// Formats a list of values as a comma separated parameter.
#[must_use]
pub fn format_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> String {
    values
        .into_iter()
        .map(format_value)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escapes control characters so the text stays on one line.
///
/// Text without control characters is borrowed unchanged.
#[must_use]
pub fn escape_line(text: &str) -> Cow<'_, str> {
    if !text.chars().any(char::is_control) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if c.is_control() {
            escaped.extend(c.escape_default());
        } else {
            escaped.push(c);
        }
    }
    Cow::Owned(escaped)
}

/// JSON type name of a value, as used in type-mismatch messages.
#[must_use]
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> Parameters {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn interpolates_placeholders() {
        let rendered = interpolate(
            "This value should be greater than or equal to {{ compared_value }}.",
            &params(&[("compared_value", "18")]),
        );
        assert_eq!(rendered, "This value should be greater than or equal to 18.");
    }

    #[test]
    fn tolerates_tight_braces_and_unknown_names() {
        let rendered = interpolate("{{a}} and {{ b }}", &params(&[("a", "1")]));
        assert_eq!(rendered, "1 and {{ b }}");
    }

    #[test]
    fn unterminated_placeholder_is_kept() {
        assert_eq!(interpolate("broken {{ limit", &Parameters::new()), "broken {{ limit");
    }

    #[test]
    fn escape_line_keeps_text_on_one_line() {
        assert!(matches!(escape_line("plain text"), Cow::Borrowed("plain text")));
        assert_eq!(escape_line("a\nb\r\tc"), "a\\nb\\r\\tc");
        assert_eq!(escape_line("line\u{85}next").lines().count(), 1);
    }

    #[test]
    fn plural_selection() {
        let template = "{{ limit }} character|{{ limit }} characters";
        assert_eq!(select_plural(template, Some(1)), "{{ limit }} character");
        assert_eq!(select_plural(template, Some(3)), "{{ limit }} characters");
        assert_eq!(select_plural(template, None), "{{ limit }} character");
        assert_eq!(select_plural("no forms", Some(5)), "no forms");
    }

    #[test]
    fn value_formatting() {
        assert_eq!(format_value(&json!("lior")), "\"lior\"");
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(7)), "7");
        assert_eq!(format_value(&json!([1, 2])), "array");
        assert_eq!(format_values(&[json!("a"), json!(1)]), "\"a\", 1");
    }
}
