//! Procedural macros for assay-validator
//!
//! - **`#[derive(Record)]`** - attribute-style constraint declarations
//!
//! Use the re-export `assay_validator::Record` rather than depending on this
//! crate directly.

use proc_macro::TokenStream;

mod record;
mod utils;

// ============================================================================
// RECORD DERIVE
// ============================================================================

/// Implements `assay_validator::Record` for a struct with named fields.
///
/// # Field attributes
///
/// `#[validate(...)]` lists constraint declarations for the field:
///
/// - `Kind` - a kind without options: `#[validate(NotBlank)]`
/// - `Kind(key = value, ...)` - options by name; snake_case keys are
///   converted to camelCase (`allow_extra_fields` → `allowExtraFields`)
/// - `Kind(value)` - the kind's default option: `#[validate(GreaterThanOrEqual(18))]`
/// - `Valid` - validate the field as a nested record (also through
///   `Option`, `Vec` and `Box`)
///
/// Values use `serde_json::json!` syntax, so lists and maps work as well:
/// `#[validate(Length(min = 3, groups = ["identity"]))]`.
///
/// # Container attributes
///
/// - `#[record(name = "User")]` - record name used by mapping files
///   (defaults to the struct name)
/// - `#[record(loader = path::to::fn)]` - a
///   `fn(&mut ClassMetadata) -> Result<(), ConfigurationError>` used as the
///   static-method source
///
/// Property names follow `#[serde(rename = "...")]` and
/// `#[serde(rename_all = "...")]`; `#[serde(skip)]` fields are ignored.
///
/// # Examples
///
/// ```rust,ignore
/// use assay_validator::Record;
/// use serde::Serialize;
///
/// #[derive(Serialize, Record)]
/// #[serde(rename_all = "camelCase")]
/// struct User {
///     #[validate(NotBlank(groups = "identity"), Length(min = 3, groups = ["identity"]))]
///     first_name: String,
///
///     #[validate(GreaterThanOrEqual(18))]
///     age: u32,
///
///     #[validate(Valid)]
///     addresses: Vec<Address>,
/// }
/// ```
#[proc_macro_derive(Record, attributes(validate, record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record_impl(input)
}
