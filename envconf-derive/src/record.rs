//! `#[derive(Record)]` implementation.
//!
//! For a struct like
//!
//! ```rust,ignore
//! #[derive(Record)]
//! pub struct Server {
//!     #[envconf(required, max = 64)]
//!     pub host: String,
//!     pub port: u16,
//!     secret: String,
//! }
//! ```
//!
//! the macro emits `impl Record` listing `host` and `port` (not `secret`,
//! which is private) with their annotations as static `(name, text)` pairs,
//! and `impl Reflect` presenting the struct as a record.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, Lit, Visibility};

/// One field that goes into the table.
struct TableField {
    ident: Ident,
    name: String,
    tags: Vec<(String, String)>,
}

/// Parsed `#[envconf(...)]` markers on a field.
#[derive(Default)]
struct FieldAttrs {
    skip: bool,
    tags: Vec<(String, String)>,
}

pub fn derive_record(input: &DeriveInput) -> syn::Result<TokenStream> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(syn::Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        Data::Enum(_) => {
            return Err(syn::Error::new(
                input.span(),
                "Record cannot be derived for enums",
            ))
        }
        Data::Union(_) => {
            return Err(syn::Error::new(
                input.span(),
                "Record cannot be derived for unions",
            ))
        }
    };

    let mut table = Vec::new();
    for field in fields {
        let attrs = parse_field_attrs(&field.attrs)?;
        if attrs.skip || !matches!(field.vis, Visibility::Public(_)) {
            continue;
        }

        let Some(ident) = field.ident.clone() else {
            continue;
        };
        table.push(TableField {
            name: ident.unraw().to_string(),
            ident,
            tags: attrs.tags,
        });
    }

    Ok(generate(input, &table))
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("envconf") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            let Some(key) = meta.path.get_ident().map(ToString::to_string) else {
                return Err(meta.error("expected an annotation name"));
            };

            match key.as_str() {
                "skip" => {
                    result.skip = true;
                }
                "required" => {
                    let value = if meta.input.peek(syn::Token![=]) {
                        required_text(&meta.value()?.parse::<Lit>()?)?
                    } else {
                        "true".to_string()
                    };
                    result.tags.push((key, value));
                }
                "min" | "max" | "pattern" | "rename" => {
                    let value = lit_text(&meta.value()?.parse::<Lit>()?)?;
                    result.tags.push((key, value));
                }
                _ => {
                    return Err(meta.error(format!(
                        "unknown envconf annotation `{key}`; expected one of \
                         required, min, max, pattern, rename, skip"
                    )))
                }
            }
            Ok(())
        })?;
    }

    Ok(result)
}

/// `required = true`, `required = false`, or the same as a string.
fn required_text(lit: &Lit) -> syn::Result<String> {
    match lit {
        Lit::Bool(b) => Ok(b.value.to_string()),
        Lit::Str(s) if matches!(s.value().as_str(), "true" | "false") => Ok(s.value()),
        other => Err(syn::Error::new(
            other.span(),
            "`required` expects `true` or `false`",
        )),
    }
}

/// Annotation values are stored as text and parsed by the validator.
fn lit_text(lit: &Lit) -> syn::Result<String> {
    match lit {
        Lit::Str(s) => Ok(s.value()),
        Lit::Int(i) => Ok(i.base10_digits().to_string()),
        Lit::Bool(b) => Ok(b.value.to_string()),
        other => Err(syn::Error::new(
            other.span(),
            "expected a string, integer or boolean literal",
        )),
    }
}

fn generate(input: &DeriveInput, table: &[TableField]) -> TokenStream {
    let name = &input.ident;
    let type_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let field_refs = table.iter().map(|field| {
        let ident = &field.ident;
        let field_name = &field.name;
        let keys = field.tags.iter().map(|(k, _)| k);
        let values = field.tags.iter().map(|(_, v)| v);
        quote! {
            ::envconf::FieldRef::new(
                #field_name,
                ::envconf::Tags::new(&[#((#keys, #values)),*]),
                &self.#ident,
            )
        }
    });

    let field_muts = table.iter().map(|field| {
        let ident = &field.ident;
        let field_name = &field.name;
        quote! {
            ::envconf::FieldMut::new(#field_name, &mut self.#ident)
        }
    });

    quote! {
        impl #impl_generics ::envconf::Record for #name #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                #type_name
            }

            fn fields(&self) -> ::std::vec::Vec<::envconf::FieldRef<'_>> {
                ::std::vec![#(#field_refs),*]
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<::envconf::FieldMut<'_>> {
                ::std::vec![#(#field_muts),*]
            }
        }

        impl #impl_generics ::envconf::Reflect for #name #ty_generics #where_clause {
            fn reflect(&self) -> ::envconf::ValueRef<'_> {
                ::envconf::ValueRef::Record(self)
            }

            fn reflect_mut(&mut self) -> ::envconf::ValueMut<'_> {
                ::envconf::ValueMut::Record(self)
            }

            fn is_record() -> bool {
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    #[test]
    fn test_required_accepts_booleans() {
        assert_eq!(required_text(&parse_quote!(true)).unwrap(), "true");
        assert_eq!(required_text(&parse_quote!(false)).unwrap(), "false");
        assert_eq!(required_text(&parse_quote!("true")).unwrap(), "true");
        assert_eq!(required_text(&parse_quote!("false")).unwrap(), "false");
    }

    #[test]
    fn test_required_rejects_other_values() {
        let rejected: [Lit; 4] = [
            parse_quote!("yes"),
            parse_quote!("TRUE"),
            parse_quote!(""),
            parse_quote!(1),
        ];
        for lit in rejected {
            let err = required_text(&lit).unwrap_err();
            assert!(err.to_string().contains("expects `true` or `false`"));
        }
    }

    #[test]
    fn test_derive_rejects_bad_required_string() {
        let input: DeriveInput = parse_quote! {
            struct Config {
                #[envconf(required = "yes")]
                pub name: String,
            }
        };
        assert!(derive_record(&input).is_err());
    }

    #[test]
    fn test_derive_lists_only_public_fields() {
        let input: DeriveInput = parse_quote! {
            struct Config {
                #[envconf(required = "false", min = 2)]
                pub name: String,
                secret: String,
                #[envconf(skip)]
                pub cache: String,
            }
        };
        let tokens = derive_record(&input).unwrap().to_string();
        assert!(tokens.contains("\"name\""));
        assert!(tokens.contains("\"false\""));
        assert!(!tokens.contains("secret"));
        assert!(!tokens.contains("cache"));
    }
}
