//! Property-based tests for assay-validator.

use assay_validator::prelude::*;
use proptest::prelude::*;
use serde_json::{Value, json};

fn run(value: &Value, constraints: &[Constraint]) -> ViolationList {
    Validator::new()
        .validate_value(value, constraints)
        .expect("validation runs")
}

/// Built-in constraints that tolerate both `null` and `""`.
fn absence_tolerant(bound: i64, word: String) -> Vec<Constraint> {
    vec![
        Email::new().into(),
        Email::new().mode(EmailMode::Html5).into(),
        GmailAddress::new().into(),
        GreaterThanOrEqual::new(bound).into(),
        LessThanOrEqual::new(bound).into(),
        Choice::new([word.clone()]).into(),
        Choice::new([word]).multiple().into(),
        Collection::new().field("name", [Constraint::from(NotBlank::new())]).into(),
        All::new([Constraint::from(NotBlank::new())]).into(),
    ]
}

// ============================================================================
// ABSENCE: null and "" pass everything but the absence checks
// ============================================================================

proptest! {
    #[test]
    fn absent_values_pass(bound in any::<i64>(), word in "[a-z]{1,8}", min in 1usize..10) {
        for constraint in absence_tolerant(bound, word) {
            prop_assert!(run(&Value::Null, &[constraint.clone()]).is_empty());
            prop_assert!(run(&json!(""), &[constraint]).is_empty());
        }
        prop_assert!(run(&Value::Null, &[Length::min(min).into()]).is_empty());
        prop_assert_eq!(run(&json!(""), &[Length::min(min).into()]).len(), 1);
        prop_assert_eq!(run(&Value::Null, &[NotNull::new().into()]).len(), 1);
        prop_assert_eq!(run(&json!(""), &[NotBlank::new().into()]).len(), 1);
    }
}

// ============================================================================
// RENDERING: one line per violation
// ============================================================================

proptest! {
    #[test]
    fn rendered_lines_match_count(
        values in prop::collection::vec(-50i64..150, 0..20),
        low in 0i64..50,
        high in 50i64..100,
    ) {
        let all = All::new([
            Constraint::from(GreaterThanOrEqual::new(low)),
            Constraint::from(LessThanOrEqual::new(high)),
        ]);
        let violations = run(&json!(values), &[all.into()]);

        let expected = values.iter().filter(|v| **v < low || **v > high).count();
        prop_assert_eq!(violations.len(), expected);
        prop_assert_eq!(violations.to_string().lines().count(), violations.len());
    }

    #[test]
    fn string_roots_render_on_one_line(s in "[a-z@.]{2,6}\\n[a-z@.\\r\\t\\n]{0,6}") {
        let constraints = [
            Constraint::from(Email::new()),
            Constraint::from(GmailAddress::new()),
            Constraint::from(Length::max(2)),
        ];
        for constraint in constraints {
            let violations = run(&json!(s), &[constraint]);
            prop_assert_eq!(violations.len(), 1);
            prop_assert_eq!(violations.to_string().lines().count(), violations.len());
        }
        let all = All::new([Constraint::from(GmailAddress::new())]);
        let violations = run(&json!([s.clone(), s]), &[all.into()]);
        prop_assert_eq!(violations.to_string().lines().count(), violations.len());
    }

    #[test]
    fn validation_is_deterministic(s in ".{0,40}") {
        let constraints = [Constraint::from(NotBlank::new()), Constraint::from(Email::new())];
        let value = json!(s);
        prop_assert_eq!(run(&value, &constraints), run(&value, &constraints));
    }

    #[test]
    fn length_counts_characters(s in "\\PC{1,30}") {
        let count = s.chars().count();
        prop_assert!(run(&json!(s), &[Length::exactly(count).into()]).is_empty());
        prop_assert_eq!(run(&json!(s), &[Length::max(count - 1).into()]).len(), 1);
    }
}

// ============================================================================
// GROUPS: selection is an intersection test
// ============================================================================

proptest! {
    #[test]
    fn group_selection_is_intersection(
        declared in prop::collection::vec("[a-c]", 1..3),
        requested in prop::collection::vec("[a-c]", 1..3),
    ) {
        let constraint = Constraint::from(NotBlank::new()).in_groups(Groups::new(declared.clone()));
        let violations = Validator::new()
            .validate_value_in_groups(&json!(""), &[constraint], Groups::new(requested.clone()))
            .expect("validation runs");
        let intersects = declared.iter().any(|group| requested.contains(group));
        prop_assert_eq!(violations.len(), usize::from(intersects));
    }
}
