//! Name conversions shared by the derives.

/// Splits a Rust identifier (snake_case or PascalCase) into lowercase words.
fn words(ident: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for ch in ident.trim_start_matches("r#").chars() {
        if ch == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if ch.is_uppercase() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.extend(ch.to_lowercase());
        } else {
            current.push(ch);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `allow_extra_fields` → `allowExtraFields`.
pub(crate) fn to_camel_case(ident: &str) -> String {
    let words = words(ident);
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(word);
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

/// Applies a serde `rename_all` rule to a field name.
///
/// Fields are snake_case already, so only word boundaries at `_` change
/// case. Returns `None` for rules serde does not know.
pub(crate) fn apply_rename_rule(rule: &str, field: &str) -> Option<String> {
    let field = field.trim_start_matches("r#");
    let renamed = match rule {
        "lowercase" | "snake_case" => field.to_owned(),
        "UPPERCASE" | "SCREAMING_SNAKE_CASE" => field.to_ascii_uppercase(),
        "PascalCase" => to_pascal_field(field),
        "camelCase" => {
            let pascal = to_pascal_field(field);
            let mut chars = pascal.chars();
            match chars.next() {
                Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        }
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING-KEBAB-CASE" => field.to_ascii_uppercase().replace('_', "-"),
        _ => return None,
    };
    Some(renamed)
}

fn to_pascal_field(field: &str) -> String {
    let mut pascal = String::with_capacity(field.len());
    let mut capitalize = true;
    for ch in field.chars() {
        if ch == '_' {
            capitalize = true;
        } else if capitalize {
            pascal.push(ch.to_ascii_uppercase());
            capitalize = false;
        } else {
            pascal.push(ch);
        }
    }
    pascal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_keys() {
        assert_eq!(to_camel_case("allow_extra_fields"), "allowExtraFields");
        assert_eq!(to_camel_case("min"), "min");
        assert_eq!(to_camel_case("minMessage"), "minMessage");
    }

    #[test]
    fn serde_rules() {
        assert_eq!(apply_rename_rule("camelCase", "first_name").as_deref(), Some("firstName"));
        assert_eq!(apply_rename_rule("PascalCase", "first_name").as_deref(), Some("FirstName"));
        assert_eq!(
            apply_rename_rule("SCREAMING-KEBAB-CASE", "first_name").as_deref(),
            Some("FIRST-NAME")
        );
        assert_eq!(apply_rename_rule("Title Case", "first_name"), None);
    }

    #[test]
    fn lowercase_rules_keep_underscores() {
        assert_eq!(apply_rename_rule("lowercase", "first_name").as_deref(), Some("first_name"));
        assert_eq!(apply_rename_rule("UPPERCASE", "first_name").as_deref(), Some("FIRST_NAME"));
        assert_eq!(apply_rename_rule("snake_case", "r#type").as_deref(), Some("type"));
    }

    #[test]
    fn digits_do_not_split_words() {
        assert_eq!(apply_rename_rule("camelCase", "line2_total").as_deref(), Some("line2Total"));
        assert_eq!(apply_rename_rule("kebab-case", "line2_total").as_deref(), Some("line2-total"));
    }
}
