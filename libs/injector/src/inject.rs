use crate::convert::convert;
use crate::error::{InjectError, Result};
use crate::path::{self, DisplayPath, Path};
use crate::reflect::{Reflect, Slot};
use crate::value::Value;

/// Writes `value` into the field of `target` addressed by `path`.
///
/// The field is located first, then `value` is converted to the field's
/// declared type; `target` is only touched once both have succeeded.
///
/// ```ignore
/// inject(&mut animal, &["Dog", "Husky", "IQ"], "12")?;
/// ```
pub fn inject<T, S>(target: &mut T, path: &[S], value: impl Into<Value>) -> Result<()>
where
    T: Reflect + ?Sized,
    S: AsRef<str>,
{
    let value = value.into();
    let resolved = path::resolve_settable(target, path)?;
    let converted = convert(&resolved.ty, &value)?;
    tracing::debug!(
        path = %DisplayPath(path),
        field_type = %resolved.ty,
        supplied_type = %value.ty(),
        "injecting"
    );
    assign(resolved.slot, converted)
}

/// [`inject`] with a parsed [`Path`].
pub fn inject_path<T>(target: &mut T, path: &Path, value: impl Into<Value>) -> Result<()>
where
    T: Reflect + ?Sized,
{
    inject(target, path.segments(), value)
}

/// Reads the field of `target` addressed by `path`.
pub fn get<T, S>(target: &T, path: &[S]) -> Result<Value>
where
    T: Reflect + ?Sized,
    S: AsRef<str>,
{
    path::lookup(target, path).map(|field| field.to_value())
}

macro_rules! assign_scalars {
    ($slot:expr, $value:expr, $($variant:ident => $value_variant:ident),* $(,)?) => {
        match ($slot, $value) {
            $(
                (Slot::$variant(field), Value::$value_variant(v)) => {
                    *field = v;
                    Ok(())
                }
            )*
            (Slot::Struct(s), Value::Struct(v)) => {
                for (name, field_value) in v.fields {
                    let field = s.field_mut(&name).ok_or(InjectError::FieldNotFound(name))?;
                    assign(field.value.slot(), field_value)?;
                }
                Ok(())
            }
            (slot, value) => Err(InjectError::TypeMismatch {
                field: slot_type(&slot),
                value: value.ty(),
            }),
        }
    };
}

/// Stores an already converted value.
///
/// Struct values are written field by field, including non-`pub` fields: a
/// whole-struct assignment replaces the entire value.
pub fn assign(slot: Slot<'_>, value: Value) -> Result<()> {
    assign_scalars!(
        slot, value,
        Bool => Bool,
        I8 => I8,
        I16 => I16,
        I32 => I32,
        I64 => I64,
        Isize => Isize,
        U8 => U8,
        U16 => U16,
        U32 => U32,
        U64 => U64,
        Usize => Usize,
        F32 => F32,
        F64 => F64,
        String => Str,
    )
}

fn slot_type(slot: &Slot<'_>) -> crate::types::Type {
    use crate::types::Type;
    match slot {
        Slot::Bool(_) => Type::Bool,
        Slot::I8(_) => Type::I8,
        Slot::I16(_) => Type::I16,
        Slot::I32(_) => Type::I32,
        Slot::I64(_) => Type::I64,
        Slot::Isize(_) => Type::Isize,
        Slot::U8(_) => Type::U8,
        Slot::U16(_) => Type::U16,
        Slot::U32(_) => Type::U32,
        Slot::U64(_) => Type::U64,
        Slot::Usize(_) => Type::Usize,
        Slot::F32(_) => Type::F32,
        Slot::F64(_) => Type::F64,
        Slot::String(_) => Type::String,
        Slot::Struct(s) => s.reflect_type(),
    }
}
