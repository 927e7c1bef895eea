//! One-call loading: merge sources, fill a record, validate it.
//!
//! Sources are merged with the following precedence (highest to lowest):
//!
//! 1. Programmatic overrides (via [`Loader::with_var`])
//! 2. Process environment (unless [`Loader::skip_env`])
//! 3. `.env` buffers and `.env` files, later ones winning over earlier ones
//!
//! # Examples
//!
//! ```
//! use envconf::{Loader, Record};
//!
//! #[derive(Record, Default)]
//! pub struct Database {
//!     #[envconf(required)]
//!     pub host: String,
//!     pub port: u16,
//! }
//!
//! #[derive(Record, Default)]
//! pub struct Config {
//!     pub database: Database,
//! }
//!
//! let config: Config = Loader::new()
//!     .skip_env()
//!     .dotenv_bytes(b"DATABASE_HOST=localhost\nDATABASE_PORT=5432\n")
//!     .load()
//!     .unwrap();
//!
//! assert_eq!(config.database.host, "localhost");
//! assert_eq!(config.database.port, 5432);
//! ```

use std::path::PathBuf;

use crate::error::Result;
use crate::fill::fill;
use crate::reflect::{Record, Reflect};
use crate::source::{self, dotenv, process, EnvMap};
use crate::validate::{StructValidator, Validator};

/// A configured input, kept in the order it was added.
#[derive(Debug, Clone)]
enum Source {
    DotenvBytes(Vec<u8>),
    DotenvFile { path: PathBuf, optional: bool },
}

/// Builder that loads a record from several sources.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    prefix: String,
    sources: Vec<Source>,
    overrides: EnvMap,
    skip_env: bool,
}

impl Loader {
    /// Creates a loader that reads only the process environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key prefix, so `prefix("app")` fills `host` from `APP_HOST`.
    ///
    /// The prefix applies to every source alike.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Adds an in-memory `.env` buffer.
    #[must_use]
    pub fn dotenv_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.sources.push(Source::DotenvBytes(bytes.into()));
        self
    }

    /// Adds a `.env` file that must exist.
    #[must_use]
    pub fn dotenv_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::DotenvFile {
            path: path.into(),
            optional: false,
        });
        self
    }

    /// Adds a `.env` file that is ignored if missing.
    #[must_use]
    pub fn optional_dotenv_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::DotenvFile {
            path: path.into(),
            optional: true,
        });
        self
    }

    /// Sets a value that overrides every source.
    ///
    /// The key is used as given; it is not prefixed.
    #[must_use]
    pub fn with_var(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.overrides.insert(key, value);
        self
    }

    /// Does not read the process environment.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Builds the merged mapping without filling anything.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read or a source fails to parse.
    pub fn env_map(&self) -> Result<EnvMap> {
        let mut layers = Vec::with_capacity(self.sources.len() + 2);

        for source in &self.sources {
            match source {
                Source::DotenvBytes(bytes) => layers.push(dotenv::parse(bytes)?),
                Source::DotenvFile { path, optional } => {
                    if *optional {
                        if let Some(env) = dotenv::load_optional(path)? {
                            layers.push(env);
                        }
                    } else {
                        layers.push(dotenv::load(path)?);
                    }
                }
            }
        }

        if !self.skip_env {
            layers.push(process::snapshot());
        }

        layers.push(self.overrides.clone());

        Ok(source::merge(layers))
    }

    /// Fills `target` from the merged sources, then validates it.
    ///
    /// # Errors
    ///
    /// Returns a source error, the first fill error, or every validation
    /// violation as [`Error::Validation`](crate::Error::Validation).
    pub fn load_into<T: Record + Reflect>(&self, target: &mut T) -> Result<()> {
        let env = self.env_map()?;
        fill(&self.prefix, target, &env)?;
        StructValidator::new().validate_struct(Some(&*target))
    }

    /// Loads a record starting from its default value.
    ///
    /// # Errors
    ///
    /// See [`Loader::load_into`].
    pub fn load<T: Record + Reflect + Default>(&self) -> Result<T> {
        let mut target = T::default();
        self.load_into(&mut target)?;
        Ok(target)
    }
}
