//! Field descriptor tables and shape inspection.
//!
//! Rust has no runtime reflection, so every record exposes its fields through
//! the [`Record`] trait, normally generated by `#[derive(Record)]`. Each field
//! value in turn exposes its shape through [`Reflect`], a closed set of
//! variants the filler and validator dispatch on.
//!
//! Descriptor tables are built fresh on every call to [`Record::fields`] or
//! [`Record::fields_mut`] and always list fields in declaration order.
//!
//! # Examples
//!
//! ```
//! use envconf::{Record, Reflect, ValueRef};
//!
//! #[derive(Record, Default)]
//! pub struct Server {
//!     #[envconf(required)]
//!     pub host: String,
//!     pub port: u16,
//! }
//!
//! let server = Server { host: "localhost".into(), port: 8080 };
//! let fields = server.fields();
//! assert_eq!(fields[0].name(), "host");
//! assert_eq!(fields[0].tags().get("required"), Some("true"));
//! assert!(matches!(fields[1].value().reflect(), ValueRef::Int(8080)));
//! ```

use std::collections::{BTreeMap, HashMap};
use std::num::ParseIntError;

/// A value whose shape can be inspected and written by envconf.
///
/// Implemented for the supported primitives, `Option<T>` (optional
/// indirection), `Box<T>` (transparent), collections, and every type that
/// derives [`Record`].
pub trait Reflect {
    /// Read-only view of this value's shape.
    fn reflect(&self) -> ValueRef<'_>;

    /// Writable view of this value's shape.
    fn reflect_mut(&mut self) -> ValueMut<'_>;

    /// Whether values of this type are records. Used to classify unset
    /// optionals, which have no value to inspect.
    #[doc(hidden)]
    fn is_record() -> bool
    where
        Self: Sized,
    {
        false
    }
}

/// Read-only shape of a value.
#[derive(Clone, Copy)]
pub enum ValueRef<'a> {
    /// A string.
    Str(&'a str),
    /// An integer of any built-in width.
    Int(i128),
    /// A boolean.
    Bool(bool),
    /// A list of strings.
    List(&'a [String]),
    /// Any other sequence or map. Only its length is observable.
    Collection(usize),
    /// A nested record.
    Record(&'a dyn Record),
    /// An optional value that may be unset.
    Pointer(PointerRef<'a>),
    /// A value envconf neither fills nor checks.
    Unsupported,
}

impl<'a> ValueRef<'a> {
    /// Short name of the shape, used in error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Bool(_) => "bool",
            Self::List(_) => "string list",
            Self::Collection(_) => "collection",
            Self::Record(_) => "struct",
            Self::Pointer(_) => "optional",
            Self::Unsupported => "unsupported",
        }
    }
}

/// An optional value seen through [`ValueRef::Pointer`].
#[derive(Clone, Copy)]
pub struct PointerRef<'a> {
    target: Option<&'a dyn Reflect>,
    to_record: bool,
}

impl<'a> PointerRef<'a> {
    /// Creates a pointer view.
    #[must_use]
    pub fn new(target: Option<&'a dyn Reflect>, to_record: bool) -> Self {
        Self { target, to_record }
    }

    /// The pointee, if set.
    #[must_use]
    pub fn target(&self) -> Option<&'a dyn Reflect> {
        self.target
    }

    /// Whether the pointee type is a record, known even when unset.
    #[must_use]
    pub fn to_record(&self) -> bool {
        self.to_record
    }
}

/// Writable shape of a value.
pub enum ValueMut<'a> {
    /// A string.
    Str(&'a mut String),
    /// An integer of any built-in width.
    Int(&'a mut dyn Integer),
    /// A boolean.
    Bool(&'a mut bool),
    /// A list of strings.
    List(&'a mut Vec<String>),
    /// A nested record.
    Record(&'a mut dyn Record),
    /// An optional value that can be allocated on demand.
    Pointer(&'a mut dyn PointerMut),
    /// A value envconf does not write.
    Unsupported,
}

/// An integer slot that can be set from base-10 text.
pub trait Integer {
    /// Parses `raw` into the slot's own width.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `raw` is not a base-10 integer that fits.
    fn set_from_str(&mut self, raw: &str) -> Result<(), ParseIntError>;
}

/// An optional slot the filler can allocate lazily.
pub trait PointerMut {
    /// The pointee, if set.
    fn get_mut(&mut self) -> Option<&mut dyn Reflect>;

    /// Sets the slot to a fresh default value and returns it.
    fn allocate(&mut self) -> &mut dyn Reflect;

    /// Unsets the slot.
    fn reset(&mut self);
}

/// A record with an ordered table of exported fields.
///
/// Usually derived. The derive lists only `pub` fields, so private fields
/// are invisible to both filling and validation.
pub trait Record {
    /// The Rust type name, for diagnostics.
    fn type_name(&self) -> &'static str;

    /// Read-only descriptors of every exported field, in declaration order.
    fn fields(&self) -> Vec<FieldRef<'_>>;

    /// Writable descriptors of every exported field, in declaration order.
    fn fields_mut(&mut self) -> Vec<FieldMut<'_>>;
}

/// Annotations attached to a field, as `(name, text)` pairs.
///
/// Values stay text; each consumer parses what it needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tags {
    entries: &'static [(&'static str, &'static str)],
}

impl Tags {
    /// No annotations.
    pub const EMPTY: Self = Self { entries: &[] };

    /// Wraps a static annotation table.
    #[must_use]
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Looks up an annotation. The first entry wins if a name repeats.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| *value)
    }

    /// Returns true if there are no annotations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all annotations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        self.entries.iter().copied()
    }
}

/// Read-only descriptor of one field.
pub struct FieldRef<'a> {
    name: &'static str,
    tags: Tags,
    value: &'a dyn Reflect,
}

impl<'a> FieldRef<'a> {
    /// Creates a descriptor.
    pub fn new(name: &'static str, tags: Tags, value: &'a dyn Reflect) -> Self {
        Self { name, tags, value }
    }

    /// The declared field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The field's annotations.
    #[must_use]
    pub fn tags(&self) -> Tags {
        self.tags
    }

    /// The field's current value.
    #[must_use]
    pub fn value(&self) -> &'a dyn Reflect {
        self.value
    }
}

/// Writable descriptor of one field.
pub struct FieldMut<'a> {
    name: &'static str,
    value: &'a mut dyn Reflect,
}

impl<'a> FieldMut<'a> {
    /// Creates a descriptor.
    pub fn new(name: &'static str, value: &'a mut dyn Reflect) -> Self {
        Self { name, value }
    }

    /// The declared field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The field's slot.
    pub fn value_mut(&mut self) -> &mut dyn Reflect {
        &mut *self.value
    }
}

impl Reflect for String {
    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Str(self)
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Str(self)
    }
}

impl Reflect for bool {
    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Bool(*self)
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Bool(self)
    }
}

impl Reflect for Vec<String> {
    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::List(self)
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        ValueMut::List(self)
    }
}

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Integer for $ty {
                fn set_from_str(&mut self, raw: &str) -> Result<(), ParseIntError> {
                    *self = raw.parse()?;
                    Ok(())
                }
            }

            impl Reflect for $ty {
                fn reflect(&self) -> ValueRef<'_> {
                    ValueRef::Int(i128::try_from(*self).unwrap_or(i128::MAX))
                }

                fn reflect_mut(&mut self) -> ValueMut<'_> {
                    ValueMut::Int(self)
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_unsupported {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn reflect(&self) -> ValueRef<'_> {
                    ValueRef::Unsupported
                }

                fn reflect_mut(&mut self) -> ValueMut<'_> {
                    ValueMut::Unsupported
                }
            }
        )*
    };
}

impl_unsupported!(f32, f64, char);

impl<T: Reflect + Default> Reflect for Option<T> {
    fn reflect(&self) -> ValueRef<'_> {
        let target = self.as_ref().map(|value| value as &dyn Reflect);
        ValueRef::Pointer(PointerRef::new(target, T::is_record()))
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Pointer(self)
    }

    fn is_record() -> bool {
        T::is_record()
    }
}

impl<T: Reflect + Default> PointerMut for Option<T> {
    fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|value| value as &mut dyn Reflect)
    }

    fn allocate(&mut self) -> &mut dyn Reflect {
        self.insert(T::default())
    }

    fn reset(&mut self) {
        *self = None;
    }
}

impl<T: Reflect> Reflect for Box<T> {
    fn reflect(&self) -> ValueRef<'_> {
        (**self).reflect()
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        (**self).reflect_mut()
    }

    fn is_record() -> bool {
        T::is_record()
    }
}

/// Non-string vectors are only checked for emptiness.
macro_rules! impl_collection {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflect for Vec<$ty> {
                fn reflect(&self) -> ValueRef<'_> {
                    ValueRef::Collection(self.len())
                }

                fn reflect_mut(&mut self) -> ValueMut<'_> {
                    ValueMut::Unsupported
                }
            }
        )*
    };
}

impl_collection!(
    bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char
);

impl<T, const N: usize> Reflect for [T; N] {
    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Collection(N)
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Unsupported
    }
}

impl<K, V, S> Reflect for HashMap<K, V, S> {
    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Collection(self.len())
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Unsupported
    }
}

impl<K, V> Reflect for BTreeMap<K, V> {
    fn reflect(&self) -> ValueRef<'_> {
        ValueRef::Collection(self.len())
    }

    fn reflect_mut(&mut self) -> ValueMut<'_> {
        ValueMut::Unsupported
    }
}
