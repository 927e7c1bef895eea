//! Declarative validation of populated records.
//!
//! Constraints come from field annotations (`#[envconf(...)]` when derived):
//!
//! - `required`: the value must not be empty (see [`rules::is_empty`])
//! - `min = N` / `max = N`: bounds on a string's length in characters
//! - `pattern = "name"`: a named check; only `alphanumeric` is defined and
//!   any other name always matches
//!
//! Unlike filling, validation never stops early. Every field of the whole
//! record tree is visited in declaration order and every violation ends up
//! in one [`ValidationErrors`] value.
//!
//! Violations are reported by path: field names lowercased and joined with
//! `.` (`database.host`), with `rename` annotations replacing a segment.

pub mod rules;

use crate::error::{Error, Result, ValidationError, ValidationErrors};
use crate::reflect::{PointerRef, Record, Reflect, Tags, ValueRef};

/// Validates configuration values.
pub trait Validator {
    /// Validates `config` and every record nested in it.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigNil`] if `config` is `None`
    /// - [`Error::ConfigPointerNil`] if `config` is an unset `Option`
    /// - [`Error::ConfigNotStruct`] if `config` is not a record
    /// - [`Error::Validation`] with every violation otherwise
    fn validate_struct(&self, config: Option<&dyn Reflect>) -> Result<()>;
}

/// Validator driven by field annotations.
///
/// Holds no state, so one instance can validate any number of records,
/// from any number of threads.
///
/// # Examples
///
/// ```
/// use envconf::{Record, StructValidator, Validator};
///
/// #[derive(Record, Default)]
/// pub struct Config {
///     #[envconf(required, pattern = "alphanumeric")]
///     pub name: String,
/// }
///
/// let validator = StructValidator::new();
///
/// let ok = Config { name: "abc123".into() };
/// assert!(validator.validate_struct(Some(&ok)).is_ok());
///
/// let bad = Config { name: String::new() };
/// let err = validator.validate_struct(Some(&bad)).unwrap_err();
/// assert!(err.to_string().contains("field 'name' is required"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct StructValidator;

impl StructValidator {
    /// Creates a validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_record(&self, record: &dyn Record, prefix: &str) -> ValidationErrors {
        let mut errors = ValidationErrors::new();

        for field in record.fields() {
            let tags = field.tags();
            let path = field_path(field.name(), tags, prefix);
            let value = field.value().reflect();

            match value {
                ValueRef::Record(nested) => errors.extend(self.validate_record(nested, &path)),
                ValueRef::Pointer(ptr) if ptr.to_record() => match record_behind(ptr) {
                    Some(nested) => errors.extend(self.validate_record(nested, &path)),
                    None => log::trace!("Skipping unset optional record '{path}'"),
                },
                _ => check_constraints(&path, tags, &value, &mut errors),
            }
        }

        errors
    }
}

/// Follows optional indirection down to a record. `None` if any level is
/// unset.
fn record_behind(ptr: PointerRef<'_>) -> Option<&dyn Record> {
    let mut current = ptr.target()?.reflect();
    loop {
        match current {
            ValueRef::Record(record) => return Some(record),
            ValueRef::Pointer(inner) => current = inner.target()?.reflect(),
            _ => return None,
        }
    }
}

impl Validator for StructValidator {
    fn validate_struct(&self, config: Option<&dyn Reflect>) -> Result<()> {
        let config = config.ok_or(Error::ConfigNil)?;

        let mut current = config.reflect();
        let record = loop {
            match current {
                ValueRef::Record(record) => break record,
                ValueRef::Pointer(ptr) => {
                    current = ptr.target().ok_or(Error::ConfigPointerNil)?.reflect();
                }
                other => return Err(Error::ConfigNotStruct { kind: other.kind() }),
            }
        };

        let errors = self.validate_record(record, "");

        if errors.is_empty() {
            return Ok(());
        }

        log::debug!(
            "Validation of {} found {} violation(s)",
            record.type_name(),
            errors.len()
        );
        Err(Error::Validation(errors))
    }
}

/// Validates a record with a [`StructValidator`].
///
/// # Errors
///
/// Returns [`Error::Validation`] with every violation found.
pub fn validate<T: Reflect>(config: &T) -> Result<()> {
    StructValidator::new().validate_struct(Some(config))
}

/// Computes the dotted path of a field.
///
/// A non-empty `rename` annotation replaces the lowercased field name.
///
/// # Examples
///
/// ```
/// use envconf::validate::field_path;
/// use envconf::Tags;
///
/// assert_eq!(field_path("TestField", Tags::EMPTY, ""), "testfield");
/// assert_eq!(field_path("TestField", Tags::EMPTY, "parent"), "parent.testfield");
///
/// static RENAMED: [(&str, &str); 1] = [("rename", "custom_name")];
/// assert_eq!(field_path("TestField", Tags::new(&RENAMED), "parent"), "parent.custom_name");
/// ```
#[must_use]
pub fn field_path(name: &str, tags: Tags, prefix: &str) -> String {
    let segment = match tags.get("rename") {
        Some(rename) if !rename.is_empty() => rename.to_string(),
        _ => name.to_lowercase(),
    };

    if prefix.is_empty() {
        segment
    } else {
        format!("{prefix}.{segment}")
    }
}

/// Whether the `required` annotation is set to `"true"`.
#[must_use]
pub fn is_required(tags: Tags) -> bool {
    tags.get("required") == Some("true")
}

/// Applies `required`, `min`, `max` and `pattern`, in that order.
fn check_constraints(path: &str, tags: Tags, value: &ValueRef<'_>, errors: &mut ValidationErrors) {
    if is_required(tags) && rules::is_empty(value) {
        errors.push(ValidationError::new(
            path,
            format!("field '{path}' is required"),
        ));
    }

    let Some(text) = string_value(value) else {
        return;
    };

    if let Some(min) = tags.get("min") {
        let min = rules::parse_int(min, 0);
        if rules::length(text) < min {
            errors.push(ValidationError::new(
                path,
                format!("field '{path}': minimum length is {min}"),
            ));
        }
    }

    if let Some(max) = tags.get("max") {
        let max = rules::parse_int(max, i64::MAX);
        if rules::length(text) > max {
            errors.push(ValidationError::new(
                path,
                format!("field '{path}': maximum length is {max}"),
            ));
        }
    }

    if let Some(pattern) = tags.get("pattern") {
        if !rules::matches_pattern(text, pattern) {
            errors.push(ValidationError::new(
                path,
                format!("field '{path}' does not match required pattern '{pattern}'"),
            ));
        }
    }
}

/// The string a length or pattern check applies to, looking through a set
/// optional.
fn string_value<'a>(value: &ValueRef<'a>) -> Option<&'a str> {
    match value {
        ValueRef::Str(s) => Some(*s),
        ValueRef::Pointer(ptr) => match ptr.target()?.reflect() {
            ValueRef::Str(s) => Some(s),
            _ => None,
        },
        _ => None,
    }
}
