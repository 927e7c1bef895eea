//! Snapshots of the current process environment.

use std::env;

use crate::source::EnvMap;

/// Captures every environment variable of the current process.
///
/// Variables whose name or value is not valid UTF-8 are skipped.
#[must_use]
pub fn snapshot() -> EnvMap {
    let mut result = EnvMap::new();

    for (key, value) in env::vars_os() {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => {
                result.insert(key, value);
            }
            (Ok(key), Err(_)) => {
                log::debug!("Skipping environment variable {key}: value is not valid UTF-8");
            }
            (Err(key), _) => {
                log::debug!("Skipping environment variable {key:?}: name is not valid UTF-8");
            }
        }
    }

    result
}

/// Captures the variables named `PREFIX_*`, with `PREFIX_` stripped.
///
/// The prefix is matched case-insensitively. An empty prefix captures
/// everything, like [`snapshot`].
///
/// # Examples
///
/// ```no_run
/// use envconf::source::process;
///
/// // With APP_DATABASE_HOST=localhost set in the environment:
/// let env = process::snapshot_prefixed("app");
/// assert_eq!(env.get("DATABASE_HOST"), Some("localhost"));
/// ```
#[must_use]
pub fn snapshot_prefixed(prefix: &str) -> EnvMap {
    let all = snapshot();
    if prefix.is_empty() {
        return all;
    }

    let head = format!("{}_", prefix.to_uppercase());
    all.into_iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(&head)
                .filter(|rest| !rest.is_empty())
                .map(|rest| (rest.to_string(), value))
        })
        .collect()
}
