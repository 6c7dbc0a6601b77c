use std::fmt;

use crate::error::ConvertError;
use crate::types::{FieldType, StructType, Type};

/// A dynamically typed value supplied by the caller or read back from a field.
///
/// The runtime type of a value is fully determined by its variant (and, for
/// structs, by its fields), see [`Value::ty`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    Isize(isize),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Str(String),
    Struct(StructValue),
}

/// Field values of a struct, in declaration order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StructValue {
    pub name: Option<String>,
    pub fields: Vec<(String, Value)>,
}

impl StructValue {
    /// A value of an unnamed struct type, e.g. `struct { IQ: u8 }`.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            fields: Vec::new(),
        }
    }

    /// Builder: appends a field.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn ty(&self) -> StructType {
        StructType {
            name: self.name.clone(),
            fields: self
                .fields
                .iter()
                .map(|(name, value)| FieldType::new(name.clone(), value.ty(), true))
                .collect(),
        }
    }
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Bool(_) => Type::Bool,
            Value::I8(_) => Type::I8,
            Value::I16(_) => Type::I16,
            Value::I32(_) => Type::I32,
            Value::I64(_) => Type::I64,
            Value::Isize(_) => Type::Isize,
            Value::U8(_) => Type::U8,
            Value::U16(_) => Type::U16,
            Value::U32(_) => Type::U32,
            Value::U64(_) => Type::U64,
            Value::Usize(_) => Type::Usize,
            Value::F32(_) => Type::F32,
            Value::F64(_) => Type::F64,
            Value::Str(_) => Type::String,
            Value::Struct(s) => Type::Struct(s.ty()),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&StructValue> {
        match self {
            Value::Struct(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// Natural text form: base-10 integers, floats in Rust's plain decimal
/// `Display` form (`1000.0` renders as `1000`, `1e21` as
/// `1000000000000000000000`, infinity as `inf`), strings verbatim, structs as
/// `{Name:value Other:value}`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{v}"),
            Value::I8(v) => write!(f, "{v}"),
            Value::I16(v) => write!(f, "{v}"),
            Value::I32(v) => write!(f, "{v}"),
            Value::I64(v) => write!(f, "{v}"),
            Value::Isize(v) => write!(f, "{v}"),
            Value::U8(v) => write!(f, "{v}"),
            Value::U16(v) => write!(f, "{v}"),
            Value::U32(v) => write!(f, "{v}"),
            Value::U64(v) => write!(f, "{v}"),
            Value::Usize(v) => write!(f, "{v}"),
            Value::F32(v) => write!(f, "{v}"),
            Value::F64(v) => write!(f, "{v}"),
            Value::Str(v) => f.write_str(v),
            Value::Struct(s) => write!(f, "{s}"),
        }
    }
}

impl fmt::Display for StructValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{name}:{value}")?;
        }
        f.write_str("}")
    }
}

// ---------------------------------------------------------------------------
// From impls
// ---------------------------------------------------------------------------

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
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
    String => Str,
    StructValue => Struct,
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

/// JSON documents map onto values the way config sources usually carry them:
/// integers become `I64` (`U64` above `i64::MAX`), other numbers `F64`,
/// objects anonymous structs in document order. `null` and arrays have no
/// field representation.
impl TryFrom<serde_json::Value> for Value {
    type Error = ConvertError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::Null => Err(ConvertError::UnsupportedJson("null")),
            serde_json::Value::Array(_) => Err(ConvertError::UnsupportedJson("array")),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::String(s) => Ok(Value::Str(s)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::I64(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Value::U64(u))
                } else {
                    n.as_f64()
                        .map(Value::F64)
                        .ok_or(ConvertError::UnsupportedJson("number"))
                }
            }
            serde_json::Value::Object(map) => {
                let mut value = StructValue::anonymous();
                for (name, field) in map {
                    value.fields.push((name, Value::try_from(field)?));
                }
                Ok(Value::Struct(value))
            }
        }
    }
}
