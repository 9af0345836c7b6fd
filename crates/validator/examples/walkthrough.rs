//! A tour of the engine: plain values, groups, records and mapping files.
//!
//! Run with `cargo run -p assay-validator --example walkthrough`.

use assay_validator::prelude::*;
use serde::Serialize;
use serde_json::json;

#[derive(Serialize, Record)]
#[serde(rename_all = "camelCase")]
struct Author {
    #[validate(NotBlank(groups = "identity"), Length(min = 3, groups = ["identity"]))]
    first_name: String,

    #[validate(GmailAddress)]
    email: String,

    #[validate(Valid)]
    books: Vec<Book>,
}

#[derive(Serialize, Record)]
struct Book {
    #[validate(NotBlank)]
    title: String,
}

const MAPPING: &str = r"
Author:
  properties:
    email:
      - Email: { mode: html5 }
      - GmailAddress
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let validator = Validator::builder()
        .enable_attribute_mapping()
        .add_yaml_mapping_str("walkthrough.yml", MAPPING)
        .build()?;

    println!("== plain values ==");
    let ages = json!([19, 23, 20, 33, 7, 22, 85]);
    let all = All::new([
        Constraint::from(GreaterThanOrEqual::new(18)),
        Constraint::from(LessThanOrEqual::new(70)),
    ]);
    print!("{}", validator.validate_value(&ages, &[all.into()])?);

    print!(
        "{}",
        validator.validate_value(&json!(""), &[NotBlank::new().into(), Email::new().into()])?
    );

    println!("== records ==");
    let author = Author {
        first_name: "Jo".into(),
        email: "jo@hotmail.com".into(),
        books: vec![Book { title: String::new() }],
    };
    print!("{}", validator.validate_record(&author)?);

    println!("== identity group ==");
    print!("{}", validator.validate_record_in_groups(&author, "identity")?);

    println!("== json ==");
    let violations = validator.validate_record_in_groups(&author, ["Default", "identity"])?;
    println!("{}", serde_json::to_string_pretty(&violations.to_json_value())?);

    Ok(())
}
