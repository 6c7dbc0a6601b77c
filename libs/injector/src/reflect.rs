//! Field-accessor table.
//!
//! Rust has no runtime reflection, so every type that can be walked or
//! written by name implements [`Reflect`]. Scalars and `String` are covered
//! here; structs get their table from `#[derive(Reflect)]`.
//!
//! # Example
//!
//! ```ignore
//! #[derive(Reflect, Default)]
//! pub struct Husky {
//!     #[inject(rename = "IQ")]
//!     pub iq: u8,
//! }
//! ```

use crate::types::Type;
use crate::value::Value;

/// A type whose values can be read and written through a [`Slot`].
pub trait Reflect {
    /// Declared type of `self`, including the shape of nested structs.
    fn reflect_type(&self) -> Type;

    /// Typed mutable handle to `self`.
    fn slot(&mut self) -> Slot<'_>;

    /// Current contents as a dynamic value.
    fn to_value(&self) -> Value;

    /// Shared view of the field table, for structs.
    fn as_struct(&self) -> Option<&dyn Struct> {
        None
    }
}

/// A struct with named fields. Lookup is exact and case-sensitive.
pub trait Struct: Reflect {
    fn type_name(&self) -> &'static str;

    /// Names in declaration order, skipped fields excluded.
    fn field_names(&self) -> &'static [&'static str];

    fn field(&self, name: &str) -> Option<&dyn Reflect>;

    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>>;
}

/// A field found by name.
pub struct FieldMut<'a> {
    pub value: &'a mut dyn Reflect,
    /// Only `pub` fields may be written through a path.
    pub exported: bool,
}

/// Typed mutable handle to a reflected location.
pub enum Slot<'a> {
    Bool(&'a mut bool),
    I8(&'a mut i8),
    I16(&'a mut i16),
    I32(&'a mut i32),
    I64(&'a mut i64),
    Isize(&'a mut isize),
    U8(&'a mut u8),
    U16(&'a mut u16),
    U32(&'a mut u32),
    U64(&'a mut u64),
    Usize(&'a mut usize),
    F32(&'a mut f32),
    F64(&'a mut f64),
    String(&'a mut String),
    Struct(&'a mut dyn Struct),
}

impl std::fmt::Debug for Slot<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Struct(s) => write!(f, "Slot::Struct({})", s.type_name()),
            _ => f.write_str("Slot(..)"),
        }
    }
}

macro_rules! impl_reflect_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn reflect_type(&self) -> Type {
                    Type::$variant
                }

                fn slot(&mut self) -> Slot<'_> {
                    Slot::$variant(self)
                }

                fn to_value(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

impl_reflect_scalar! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl Reflect for String {
    fn reflect_type(&self) -> Type {
        Type::String
    }

    fn slot(&mut self) -> Slot<'_> {
        Slot::String(self)
    }

    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}
