//! Populating records from an environment mapping.
//!
//! Each exported field gets a key built from its declared name: the name
//! uppercased at the top level, or `PREFIX_NAME` inside a nested record.
//! Nested records are always traversed with their own key as the new
//! prefix, so `database.host` reads `DATABASE_HOST`.
//!
//! Key derivation is naive on purpose. A field called `database_host`
//! and a `host` field inside a `database` record both read `DATABASE_HOST`.
//!
//! Filling fails fast: the first value that cannot be coerced aborts the
//! call. Fields assigned before the failure keep their new values.

use crate::error::{Error, Result};
use crate::reflect::{PointerMut, Record, Reflect, ValueMut};
use crate::source::EnvMap;

/// Fills `target` from `env`.
///
/// Keys missing from `env` leave their fields untouched. Unset `Option`
/// fields are allocated only when at least one value is written into them.
///
/// # Errors
///
/// Returns [`Error::FieldCoercion`] for the first value that does not parse
/// as its field's type.
///
/// # Examples
///
/// ```
/// use envconf::{fill, EnvMap, Record};
///
/// #[derive(Record, Default)]
/// pub struct Database {
///     pub host: String,
///     pub port: u16,
/// }
///
/// #[derive(Record, Default)]
/// pub struct Config {
///     pub database: Database,
/// }
///
/// let env: EnvMap = [("DATABASE_HOST", "localhost"), ("DATABASE_PORT", "5432")]
///     .into_iter()
///     .collect();
///
/// let mut config = Config::default();
/// fill("", &mut config, &env).unwrap();
/// assert_eq!(config.database.host, "localhost");
/// assert_eq!(config.database.port, 5432);
/// ```
pub fn fill<T: Record + ?Sized>(prefix: &str, target: &mut T, env: &EnvMap) -> Result<()> {
    let mut written = 0;
    let result = fill_record(prefix, target, env, &mut written);
    log::debug!(
        "Filled {written} field(s) of {} from {} variable(s)",
        target.type_name(),
        env.len()
    );
    result
}

/// Computes the environment key for `name` under `prefix`.
///
/// # Examples
///
/// ```
/// use envconf::fill::env_key;
///
/// assert_eq!(env_key("", "host"), "HOST");
/// assert_eq!(env_key("DATABASE", "host"), "DATABASE_HOST");
/// ```
#[must_use]
pub fn env_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_uppercase()
    } else {
        format!("{prefix}_{name}").to_uppercase()
    }
}

/// Fills every field of `record`. `written` counts assigned values, including
/// those assigned before an error.
fn fill_record<R: Record + ?Sized>(
    prefix: &str,
    record: &mut R,
    env: &EnvMap,
    written: &mut usize,
) -> Result<()> {
    for mut field in record.fields_mut() {
        let name = field.name();
        let key = env_key(prefix, name);
        fill_value(name, &key, field.value_mut(), env, written)?;
    }

    Ok(())
}

fn fill_value(
    name: &str,
    key: &str,
    slot: &mut dyn Reflect,
    env: &EnvMap,
    written: &mut usize,
) -> Result<()> {
    match slot.reflect_mut() {
        ValueMut::Record(record) => fill_record(key, record, env, written),
        ValueMut::Pointer(pointer) => fill_pointer(name, key, pointer, env, written),
        ValueMut::Unsupported => Ok(()),
        primitive => {
            let Some(raw) = env.get(key) else {
                log::trace!("No value for {key}");
                return Ok(());
            };
            assign(name, key, primitive, raw)?;
            log::debug!("Set field '{name}' from {key}");
            *written += 1;
            Ok(())
        }
    }
}

/// Fills an optional slot in place when set. When unset, fills a fresh
/// value and keeps it only if something was written into it.
fn fill_pointer(
    name: &str,
    key: &str,
    pointer: &mut dyn PointerMut,
    env: &EnvMap,
    written: &mut usize,
) -> Result<()> {
    if let Some(target) = pointer.get_mut() {
        return fill_value(name, key, target, env, written);
    }

    let before = *written;
    let result = fill_value(name, key, pointer.allocate(), env, written);
    if *written == before {
        log::trace!("Leaving {key} unset");
        pointer.reset();
    }
    result
}

fn assign(name: &str, key: &str, slot: ValueMut<'_>, raw: &str) -> Result<()> {
    let coercion_error = |reason: String| Error::FieldCoercion {
        field: name.to_string(),
        key: key.to_string(),
        value: raw.to_string(),
        reason,
    };

    match slot {
        ValueMut::Str(s) => {
            *s = raw.to_string();
        }
        ValueMut::Int(n) => {
            n.set_from_str(raw).map_err(|e| coercion_error(e.to_string()))?;
        }
        ValueMut::Bool(b) => {
            *b = parse_bool(raw).ok_or_else(|| {
                coercion_error("expected true/false/1/0/yes/no/on/off".to_string())
            })?;
        }
        ValueMut::List(items) => {
            *items = split_list(raw);
        }
        ValueMut::Record(_) | ValueMut::Pointer(_) | ValueMut::Unsupported => {}
    }

    Ok(())
}

/// Parses a boolean, case-insensitively.
///
/// Accepts: true/1/yes/on for true, false/0/no/off for false.
#[must_use]
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Splits a comma-separated list, trimming each element.
///
/// An empty value is an empty list. Otherwise every element is kept, so
/// `"a,,b"` yields `["a", "", "b"]`.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    raw.split(',').map(|item| item.trim().to_string()).collect()
}
