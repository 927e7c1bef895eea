//! Procedural macros for envconf.
//!
//! This crate provides `#[derive(Record)]`, which generates the field table
//! envconf uses to fill and validate a struct. Use it through the
//! re-export in `envconf`:
//!
//! ```rust,ignore
//! use envconf::Record;
//!
//! #[derive(Record, Default)]
//! pub struct Database {
//!     #[envconf(required, pattern = "alphanumeric")]
//!     pub name: String,
//!     #[envconf(min = 1, max = 255, rename = "hostname")]
//!     pub host: String,
//!     pub port: u16,
//!     #[envconf(skip)]
//!     pub pool: Pool,
//! }
//! ```

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `envconf::Record` and `envconf::Reflect` for a struct with named
/// fields.
///
/// Only `pub` fields appear in the generated table, in declaration order.
/// Every listed field's type must implement `envconf::Reflect`.
///
/// # Field attributes
///
/// | Attribute | Meaning |
/// |-----------|---------|
/// | `required` / `required = false` | value must not be empty |
/// | `min = N` | minimum string length |
/// | `max = N` | maximum string length |
/// | `pattern = "alphanumeric"` | named pattern check |
/// | `rename = "name"` | path segment used in validation errors |
/// | `skip` | leave the field out of the table |
#[proc_macro_derive(Record, attributes(envconf))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match record::derive_record(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
