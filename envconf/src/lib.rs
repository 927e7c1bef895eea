#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # envconf
//!
//! A library for loading configuration structs from environment variables.
//!
//! Loading happens in three independent steps the caller composes:
//!
//! 1. Build an [`EnvMap`] from `.env` buffers or the process environment,
//!    merging them with [`source::merge`].
//! 2. [`fill`] a record from the mapping. Field `host` inside `database`
//!    reads `DATABASE_HOST`.
//! 3. [`validate`] the record against its `#[envconf(...)]` annotations,
//!    collecting every violation.
//!
//! [`Loader`] performs all three in one call.
//!
//! ## Core Types
//!
//! - [`Record`] and [`Reflect`]: field tables, usually derived
//! - [`EnvMap`]: uppercase key to value mapping
//! - [`StructValidator`] and [`Validator`]: annotation-driven validation
//! - [`Error`], [`ValidationErrors`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use envconf::{fill, validate, EnvMap, Record};
//!
//! #[derive(Record, Default)]
//! pub struct Config {
//!     #[envconf(required, min = 3)]
//!     pub name: String,
//!     pub workers: u32,
//!     pub features: Vec<String>,
//! }
//!
//! let env: EnvMap = [("NAME", "api"), ("WORKERS", "4"), ("FEATURES", "auth, metrics")]
//!     .into_iter()
//!     .collect();
//!
//! let mut config = Config::default();
//! fill("", &mut config, &env).unwrap();
//! validate(&config).unwrap();
//!
//! assert_eq!(config.workers, 4);
//! assert_eq!(config.features, vec!["auth", "metrics"]);
//! ```

// Lets `#[derive(Record)]` output, which names `::envconf`, compile inside
// this crate's own tests.
extern crate self as envconf;

pub mod error;
pub mod fill;
pub mod loader;
pub mod reflect;
pub mod source;
pub mod validate;

#[cfg(test)]
mod proptests;

// Re-export key types at crate root for convenience
pub use envconf_derive::Record;
pub use error::{Error, Result, ValidationError, ValidationErrors};
pub use fill::fill;
pub use loader::Loader;
pub use reflect::{
    FieldMut, FieldRef, Integer, PointerMut, PointerRef, Record, Reflect, Tags, ValueMut,
    ValueRef,
};
pub use source::EnvMap;
pub use validate::{validate, StructValidator, Validator};
