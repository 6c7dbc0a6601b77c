use std::fmt;

// ════════════════════════════════════════════════════════════════
//  Kind
// ════════════════════════════════════════════════════════════════

/// Fieldless discriminant of a [`Type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    Struct,
}

impl Kind {
    pub fn is_signed(self) -> bool {
        matches!(self, Kind::I8 | Kind::I16 | Kind::I32 | Kind::I64 | Kind::Isize)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(self, Kind::U8 | Kind::U16 | Kind::U32 | Kind::U64 | Kind::Usize)
    }

    pub fn is_integer(self) -> bool {
        self.is_signed() || self.is_unsigned()
    }

    pub fn is_float(self) -> bool {
        matches!(self, Kind::F32 | Kind::F64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float()
    }

    /// Kinds a text value can be parsed into.
    pub fn is_parsable(self) -> bool {
        self == Kind::Bool || self.is_numeric()
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Kind::Bool => "bool",
            Kind::I8 => "i8",
            Kind::I16 => "i16",
            Kind::I32 => "i32",
            Kind::I64 => "i64",
            Kind::Isize => "isize",
            Kind::U8 => "u8",
            Kind::U16 => "u16",
            Kind::U32 => "u32",
            Kind::U64 => "u64",
            Kind::Usize => "usize",
            Kind::F32 => "f32",
            Kind::F64 => "f64",
            Kind::String => "String",
            Kind::Struct => "struct",
        })
    }
}

// ════════════════════════════════════════════════════════════════
//  Type
// ════════════════════════════════════════════════════════════════

/// Declared type of a field, or the runtime type of a supplied value.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Bool,
    I8,
    I16,
    I32,
    I64,
    Isize,
    U8,
    U16,
    U32,
    U64,
    Usize,
    F32,
    F64,
    String,
    Struct(StructType),
}

/// Shape of a struct: its name and its fields in declaration order.
///
/// `name == None` is an anonymous struct. Derived types are always named;
/// anonymous shapes only come from dynamic values built at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub name: Option<String>,
    pub fields: Vec<FieldType>,
}

/// One field of a [`StructType`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldType {
    pub name: String,
    pub ty: Type,
    /// `false` for fields that can be found but not written (non-`pub`).
    pub exported: bool,
}

impl FieldType {
    pub fn new(name: impl Into<String>, ty: Type, exported: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            exported,
        }
    }
}

impl StructType {
    pub fn named(name: impl Into<String>, fields: Vec<FieldType>) -> Self {
        Self {
            name: Some(name.into()),
            fields,
        }
    }

    pub fn anonymous(fields: Vec<FieldType>) -> Self {
        Self { name: None, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldType> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Same field names in the same order, pairwise identical field types.
    /// The struct names themselves are not compared.
    fn has_identical_fields(&self, other: &StructType) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(&other.fields)
                .all(|(a, b)| a.name == b.name && a.ty.is_identical(&b.ty))
    }
}

impl Type {
    pub fn kind(&self) -> Kind {
        match self {
            Type::Bool => Kind::Bool,
            Type::I8 => Kind::I8,
            Type::I16 => Kind::I16,
            Type::I32 => Kind::I32,
            Type::I64 => Kind::I64,
            Type::Isize => Kind::Isize,
            Type::U8 => Kind::U8,
            Type::U16 => Kind::U16,
            Type::U32 => Kind::U32,
            Type::U64 => Kind::U64,
            Type::Usize => Kind::Usize,
            Type::F32 => Kind::F32,
            Type::F64 => Kind::F64,
            Type::String => Kind::String,
            Type::Struct(_) => Kind::Struct,
        }
    }

    /// Structural identity.
    ///
    /// Scalars are identical when their kinds match. Structs are identical
    /// when their field lists are, and their names are equal or at least one
    /// of them is anonymous.
    pub fn is_identical(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Struct(a), Type::Struct(b)) => {
                let names_agree = match (&a.name, &b.name) {
                    (Some(x), Some(y)) => x == y,
                    _ => true,
                };
                names_agree && a.has_identical_fields(b)
            }
            (a, b) => a.kind() == b.kind(),
        }
    }

    /// Whether a value of `self` may be cast to `other` without parsing.
    ///
    /// Numeric kinds cast among each other (range checks happen on the
    /// value). Two structs cast when their field lists are identical,
    /// regardless of their own names.
    pub fn is_convertible_to(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Struct(a), Type::Struct(b)) => a.has_identical_fields(b),
            (a, b) if a.kind().is_numeric() && b.kind().is_numeric() => true,
            (a, b) => a.kind() == b.kind(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Struct(s) => write!(f, "{s}"),
            other => write!(f, "{}", other.kind()),
        }
    }
}

impl fmt::Display for StructType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            return f.write_str(name);
        }
        f.write_str("struct {")?;
        for (i, field) in self.fields.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{}: {}", field.name, field.ty)?;
        }
        if self.fields.is_empty() {
            f.write_str("}")
        } else {
            f.write_str(" }")
        }
    }
}
