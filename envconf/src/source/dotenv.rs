//! `.env` buffers and files.
//!
//! Parsing is delegated to `dotenvy`, which handles comments, blank lines,
//! `export` prefixes, quoting and surrounding whitespace. Nothing here
//! writes to the process environment.
//!
//! Values go through dotenvy's shell-style substitution. In unquoted and
//! double-quoted values, `${NAME}` expands from the process environment
//! first, then from keys defined earlier in the same input, and to an empty
//! string otherwise. The unbraced `$NAME` form does the same but stops the
//! name at the first character that is not a letter or digit, so
//! `$APP_HOST` reads `APP`. Single-quote a value, or escape the dollar sign
//! as `\$`, to keep it verbatim:
//!
//! ```text
//! PASSWORD='pa$$word'
//! TEMPLATE=\${HOME}/data
//! ```

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::source::EnvMap;

/// Parses a `.env` formatted byte buffer.
///
/// # Errors
///
/// Returns [`Error::DotenvParse`](crate::Error::DotenvParse) for invalid
/// syntax. The error carries the byte index only, never the line itself.
///
/// See the [module documentation](self) for `$` substitution.
///
/// # Examples
///
/// ```
/// use envconf::source::dotenv;
///
/// let env = dotenv::parse(b"# database\nDATABASE_HOST=localhost\n\nDATABASE_PORT = 5432\n").unwrap();
/// assert_eq!(env.get("DATABASE_HOST"), Some("localhost"));
/// assert_eq!(env.get("DATABASE_PORT"), Some("5432"));
/// ```
pub fn parse(bytes: &[u8]) -> Result<EnvMap> {
    let mut env = EnvMap::new();

    for item in dotenvy::from_read_iter(bytes) {
        let (key, value) = item?;
        env.insert(key, value);
    }

    Ok(env)
}

/// Reads and parses a `.env` file.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if the file cannot be read, or
/// a parse error as for [`parse`].
pub fn load(path: &Path) -> Result<EnvMap> {
    let bytes = fs::read(path)?;
    log::debug!("Loaded .env file {}", path.display());
    parse(&bytes)
}

/// Like [`load`], but a missing file yields `Ok(None)`.
///
/// # Errors
///
/// Returns any error other than "not found".
pub fn load_optional(path: &Path) -> Result<Option<EnvMap>> {
    match fs::read(path) {
        Ok(bytes) => parse(&bytes).map(Some),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::trace!("Optional .env file {} not found", path.display());
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serial_test::serial;
    use std::env;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Sets a variable for the lifetime of the guard.
    struct EnvGuard {
        key: &'static str,
        old_value: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let old_value = env::var(key).ok();
            env::set_var(key, value);
            Self { key, old_value }
        }

        fn unset(key: &'static str) -> Self {
            let old_value = env::var(key).ok();
            env::remove_var(key);
            Self { key, old_value }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.old_value {
                Some(value) => env::set_var(self.key, value),
                None => env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn test_parse_simple_pairs() {
        let env = parse(b"A=1\nB=two\n").unwrap();
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("A"), Some("1"));
        assert_eq!(env.get("B"), Some("two"));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let env = parse(b"# comment\n\n   \nKEY=value\n# another\n").unwrap();
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("KEY"), Some("value"));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let env = parse(b"  KEY = value  \n").unwrap();
        assert_eq!(env.get("KEY"), Some("value"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let env = parse(b"GREETING=\"hello world\"\nSINGLE='a b'\n").unwrap();
        assert_eq!(env.get("GREETING"), Some("hello world"));
        assert_eq!(env.get("SINGLE"), Some("a b"));
    }

    #[test]
    fn test_parse_normalizes_keys() {
        let env = parse(b"database_host=localhost\n").unwrap();
        assert_eq!(env.iter().next(), Some(("DATABASE_HOST", "localhost")));
    }

    #[test]
    fn test_parse_later_line_wins() {
        let env = parse(b"KEY=first\nKEY=second\n").unwrap();
        assert_eq!(env.get("KEY"), Some("second"));
    }

    #[test]
    fn test_parse_empty_buffer() {
        assert!(parse(b"").unwrap().is_empty());
    }

    #[test]
    fn test_parse_invalid_line() {
        let result = parse(b"VALID=1\nNOT A PAIR\n");
        assert!(matches!(result, Err(Error::DotenvParse { .. })));
    }

    #[test]
    fn test_load_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "APP_NAME=demo").unwrap();
        let env = load(file.path()).unwrap();
        assert_eq!(env.get("APP_NAME"), Some("demo"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("missing.env"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_load_optional_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_optional(&dir.path().join("missing.env")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    #[serial]
    fn test_parse_substitutes_process_variables() {
        let _guard = EnvGuard::set("ENVCONF_DOTENV_SUBST", "from-env");
        let input = b"PLAIN=${ENVCONF_DOTENV_SUBST}\nQUOTED=\"x-${ENVCONF_DOTENV_SUBST}\"\n";
        let env = parse(input).unwrap();
        assert_eq!(env.get("PLAIN"), Some("from-env"));
        assert_eq!(env.get("QUOTED"), Some("x-from-env"));
    }

    #[test]
    #[serial]
    fn test_parse_substitutes_earlier_keys() {
        let _guard = EnvGuard::unset("ENVCONF_DOTENV_BASE");
        let env = parse(b"ENVCONF_DOTENV_BASE=/srv\nDATA=${ENVCONF_DOTENV_BASE}/data\n").unwrap();
        assert_eq!(env.get("DATA"), Some("/srv/data"));
    }

    #[test]
    #[serial]
    fn test_parse_unknown_reference_is_empty() {
        let _guard = EnvGuard::unset("ENVCONF_DOTENV_MISSING");
        let env = parse(b"VALUE=${ENVCONF_DOTENV_MISSING}\n").unwrap();
        assert_eq!(env.get("VALUE"), Some(""));
    }

    #[test]
    #[serial]
    fn test_parse_single_quotes_and_escapes_stay_verbatim() {
        let _guard = EnvGuard::set("ENVCONF_DOTENV_SUBST", "from-env");
        let input = b"QUOTED='${ENVCONF_DOTENV_SUBST} $ENVCONF_DOTENV_SUBST'\n\
                      ESCAPED=\\${ENVCONF_DOTENV_SUBST}\n";
        let env = parse(input).unwrap();
        assert_eq!(
            env.get("QUOTED"),
            Some("${ENVCONF_DOTENV_SUBST} $ENVCONF_DOTENV_SUBST")
        );
        assert_eq!(env.get("ESCAPED"), Some("${ENVCONF_DOTENV_SUBST}"));
    }
}
