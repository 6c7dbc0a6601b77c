//! Value conversion: an ordered chain of strategies, first success wins.
//!
//! 1. [`ParseText`]: text into `bool` or a numeric kind, by parsing.
//! 2. [`RenderText`]: anything into `String`, by its natural text rendering.
//! 3. [`Cast`]: numeric casts and structurally identical structs.

use crate::error::{ConvertError, InjectError, Result};
use crate::types::{Kind, Type};
use crate::value::{StructValue, Value};

/// One conversion strategy.
///
/// Returns `None` when the strategy does not apply to this pair of types,
/// `Some(Err(_))` when it applies but the value is rejected.
pub trait Strategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn attempt(&self, required: &Type, value: &Value) -> Option<Result<Value, ConvertError>>;
}

/// Parses text for `bool` and numeric targets.
pub struct ParseText;

/// Renders any value for `String` targets. Never rejects a value.
pub struct RenderText;

/// Casts between numeric kinds and between structurally identical structs.
pub struct Cast;

static CHAIN: [&dyn Strategy; 3] = [&ParseText, &RenderText, &Cast];

/// Produces a value whose type is exactly `required`.
///
/// When every strategy fails, the cause is the error of the first strategy
/// that applied: `"1000"` into `u8` reports the parse overflow, not
/// "not convertible".
pub fn convert(required: &Type, value: &Value) -> Result<Value> {
    convert_with(&CHAIN, required, value)
}

pub fn convert_with(chain: &[&dyn Strategy], required: &Type, value: &Value) -> Result<Value> {
    let mut first_error = None;
    for strategy in chain {
        match strategy.attempt(required, value) {
            None => {
                tracing::trace!(strategy = strategy.name(), %required, "not applicable");
            }
            Some(Ok(converted)) => {
                tracing::trace!(strategy = strategy.name(), %required, "converted");
                return Ok(converted);
            }
            Some(Err(e)) => {
                tracing::trace!(strategy = strategy.name(), %required, error = %e, "rejected");
                first_error.get_or_insert(e);
            }
        }
    }

    let supplied = value.ty();
    let source = first_error.unwrap_or_else(|| ConvertError::NotConvertible {
        from: supplied.clone(),
        to: required.clone(),
    });
    Err(InjectError::ConversionFailed {
        required: required.clone(),
        supplied,
        source,
    })
}

// ════════════════════════════════════════════════════════════════
//  Strategy 1: text → bool / numbers
// ════════════════════════════════════════════════════════════════

impl Strategy for ParseText {
    fn name(&self) -> &'static str {
        "parse_text"
    }

    fn attempt(&self, required: &Type, value: &Value) -> Option<Result<Value, ConvertError>> {
        let text = value.as_str()?;
        if !required.kind().is_parsable() {
            return None;
        }
        Some(parse(required, text))
    }
}

macro_rules! parse_int {
    ($text:expr, $required:expr, $ty:ty, $variant:ident) => {
        $text
            .parse::<$ty>()
            .map(Value::$variant)
            .map_err(|source| ConvertError::ParseInt {
                text: $text.to_string(),
                ty: $required.clone(),
                source,
            })
    };
}

fn parse(required: &Type, text: &str) -> Result<Value, ConvertError> {
    match required {
        Type::Bool => parse_bool(text).map(Value::Bool),
        Type::I8 => parse_int!(text, required, i8, I8),
        Type::I16 => parse_int!(text, required, i16, I16),
        Type::I32 => parse_int!(text, required, i32, I32),
        Type::I64 => parse_int!(text, required, i64, I64),
        Type::Isize => parse_int!(text, required, isize, Isize),
        Type::U8 => parse_int!(text, required, u8, U8),
        Type::U16 => parse_int!(text, required, u16, U16),
        Type::U32 => parse_int!(text, required, u32, U32),
        Type::U64 => parse_int!(text, required, u64, U64),
        Type::Usize => parse_int!(text, required, usize, Usize),
        Type::F32 => parse_float::<f32>(text, required).map(Value::F32),
        Type::F64 => parse_float::<f64>(text, required).map(Value::F64),
        Type::String | Type::Struct(_) => Err(ConvertError::NotConvertible {
            from: Type::String,
            to: required.clone(),
        }),
    }
}

fn parse_bool(text: &str) -> Result<bool, ConvertError> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ConvertError::ParseBool {
            text: text.to_string(),
        }),
    }
}

trait Float: std::str::FromStr<Err = std::num::ParseFloatError> {
    fn overflowed(&self) -> bool;
}

impl Float for f32 {
    fn overflowed(&self) -> bool {
        self.is_infinite()
    }
}

impl Float for f64 {
    fn overflowed(&self) -> bool {
        self.is_infinite()
    }
}

/// A finite literal that only fits as infinity (e.g. `1e39` for `f32`) is a
/// range error rather than a silent `inf`.
fn parse_float<F: Float>(text: &str, required: &Type) -> Result<F, ConvertError> {
    let parsed = text.parse::<F>().map_err(|source| ConvertError::ParseFloat {
        text: text.to_string(),
        ty: required.clone(),
        source,
    })?;
    if parsed.overflowed() && !names_infinity(text) {
        return Err(ConvertError::FloatRange {
            text: text.to_string(),
            ty: required.clone(),
        });
    }
    Ok(parsed)
}

fn names_infinity(text: &str) -> bool {
    let digits = text.trim_start_matches(['+', '-']);
    digits.eq_ignore_ascii_case("inf") || digits.eq_ignore_ascii_case("infinity")
}

// ════════════════════════════════════════════════════════════════
//  Strategy 2: anything → String
// ════════════════════════════════════════════════════════════════

impl Strategy for RenderText {
    fn name(&self) -> &'static str {
        "render_text"
    }

    fn attempt(&self, required: &Type, value: &Value) -> Option<Result<Value, ConvertError>> {
        if required.kind() != Kind::String {
            return None;
        }
        Some(Ok(Value::Str(value.to_string())))
    }
}

// ════════════════════════════════════════════════════════════════
//  Strategy 3: casts
// ════════════════════════════════════════════════════════════════

impl Strategy for Cast {
    fn name(&self) -> &'static str {
        "cast"
    }

    fn attempt(&self, required: &Type, value: &Value) -> Option<Result<Value, ConvertError>> {
        let supplied = value.ty();
        if !supplied.is_convertible_to(required) {
            return Some(Err(ConvertError::NotConvertible {
                from: supplied,
                to: required.clone(),
            }));
        }
        Some(cast(required, value))
    }
}

fn cast(required: &Type, value: &Value) -> Result<Value, ConvertError> {
    match (required, value) {
        (Type::Struct(target), Value::Struct(supplied)) => Ok(Value::Struct(StructValue {
            name: target.name.clone(),
            fields: supplied.fields.clone(),
        })),
        _ => match Number::of(value) {
            Some(number) => number.cast(required, value),
            None => Ok(value.clone()),
        },
    }
}

/// A numeric value widened to one of three lossless carriers.
#[derive(Debug, Clone, Copy)]
enum Number {
    Signed(i128),
    Unsigned(u128),
    Float(f64),
}

macro_rules! cast_int {
    ($n:expr, $required:expr, $ty:ty, $variant:ident) => {
        match $n {
            Number::Signed(v) => <$ty>::try_from(v).ok(),
            Number::Unsigned(v) => <$ty>::try_from(v).ok(),
            Number::Float(v) => float_to_int(v).and_then(|v| <$ty>::try_from(v).ok()),
        }
        .map(Value::$variant)
        .ok_or_else(|| ConvertError::OutOfRange {
            value: $n.to_string(),
            ty: $required.clone(),
        })
    };
}

impl Number {
    fn of(value: &Value) -> Option<Self> {
        Some(match *value {
            Value::I8(v) => Number::Signed(v.into()),
            Value::I16(v) => Number::Signed(v.into()),
            Value::I32(v) => Number::Signed(v.into()),
            Value::I64(v) => Number::Signed(v.into()),
            Value::Isize(v) => Number::Signed(v as i128),
            Value::U8(v) => Number::Unsigned(v.into()),
            Value::U16(v) => Number::Unsigned(v.into()),
            Value::U32(v) => Number::Unsigned(v.into()),
            Value::U64(v) => Number::Unsigned(v.into()),
            Value::Usize(v) => Number::Unsigned(v as u128),
            Value::F32(v) => Number::Float(v.into()),
            Value::F64(v) => Number::Float(v),
            _ => return None,
        })
    }

    fn as_f64(self) -> f64 {
        match self {
            Number::Signed(v) => v as f64,
            Number::Unsigned(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    /// `supplied` is the value `self` was taken from, for error reporting.
    fn cast(self, required: &Type, supplied: &Value) -> Result<Value, ConvertError> {
        match required {
            Type::I8 => cast_int!(self, required, i8, I8),
            Type::I16 => cast_int!(self, required, i16, I16),
            Type::I32 => cast_int!(self, required, i32, I32),
            Type::I64 => cast_int!(self, required, i64, I64),
            Type::Isize => cast_int!(self, required, isize, Isize),
            Type::U8 => cast_int!(self, required, u8, U8),
            Type::U16 => cast_int!(self, required, u16, U16),
            Type::U32 => cast_int!(self, required, u32, U32),
            Type::U64 => cast_int!(self, required, u64, U64),
            Type::Usize => cast_int!(self, required, usize, Usize),
            Type::F32 => {
                let wide = self.as_f64();
                let narrow = wide as f32;
                // A finite source must stay finite.
                if wide.is_finite() && !narrow.is_finite() {
                    return Err(ConvertError::OutOfRange {
                        value: self.to_string(),
                        ty: required.clone(),
                    });
                }
                Ok(Value::F32(narrow))
            }
            Type::F64 => Ok(Value::F64(self.as_f64())),
            other => Err(ConvertError::NotConvertible {
                from: supplied.ty(),
                to: other.clone(),
            }),
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Signed(v) => write!(f, "{v}"),
            Number::Unsigned(v) => write!(f, "{v}"),
            Number::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Truncates toward zero. `None` for NaN, infinities and magnitudes beyond
/// `i128`.
fn float_to_int(v: f64) -> Option<i128> {
    let truncated = v.trunc();
    if !truncated.is_finite() || truncated < i128::MIN as f64 || truncated >= i128::MAX as f64 {
        return None;
    }
    Some(truncated as i128)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldType, StructType};

    fn cause(result: Result<Value>) -> ConvertError {
        match result {
            Err(InjectError::ConversionFailed { source, .. }) => source,
            other => panic!("expected conversion failure, got {other:?}"),
        }
    }

    #[test]
    fn text_parses_into_numbers_and_bools() {
        assert_eq!(convert(&Type::U8, &"12".into()).unwrap(), Value::U8(12));
        assert_eq!(convert(&Type::I16, &"-300".into()).unwrap(), Value::I16(-300));
        assert_eq!(convert(&Type::F64, &"2.5".into()).unwrap(), Value::F64(2.5));
        assert_eq!(convert(&Type::Bool, &"T".into()).unwrap(), Value::Bool(true));
        assert_eq!(convert(&Type::Bool, &"0".into()).unwrap(), Value::Bool(false));
    }

    #[test]
    fn text_overflow_is_reported_not_wrapped() {
        let err = cause(convert(&Type::I8, &"1000".into()));
        assert!(matches!(err, ConvertError::ParseInt { ref text, .. } if text == "1000"));
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn non_numeric_text_is_a_parse_error() {
        assert!(matches!(
            cause(convert(&Type::I32, &"abc".into())),
            ConvertError::ParseInt { .. }
        ));
        assert!(matches!(
            cause(convert(&Type::U32, &"-1".into())),
            ConvertError::ParseInt { .. }
        ));
        assert!(matches!(
            cause(convert(&Type::Bool, &"yes".into())),
            ConvertError::ParseBool { .. }
        ));
    }

    #[test]
    fn f32_range_is_checked() {
        assert!(matches!(
            cause(convert(&Type::F32, &"1e39".into())),
            ConvertError::FloatRange { .. }
        ));
        assert_eq!(
            convert(&Type::F32, &"-inf".into()).unwrap(),
            Value::F32(f32::NEG_INFINITY)
        );
    }

    #[test]
    fn anything_renders_into_string() {
        assert_eq!(convert(&Type::String, &600i32.into()).unwrap(), Value::Str("600".into()));
        assert_eq!(
            convert(&Type::String, &1000.0f64.into()).unwrap(),
            Value::Str("1000".into())
        );
        assert_eq!(convert(&Type::String, &"as is".into()).unwrap(), Value::Str("as is".into()));
    }

    #[test]
    fn numbers_cast_with_range_checks() {
        assert_eq!(convert(&Type::U32, &666i32.into()).unwrap(), Value::U32(666));
        assert_eq!(convert(&Type::F64, &7u8.into()).unwrap(), Value::F64(7.0));
        assert_eq!(convert(&Type::I64, &(-2.9f64).into()).unwrap(), Value::I64(-2));
        assert!(matches!(
            cause(convert(&Type::U8, &1000i32.into())),
            ConvertError::OutOfRange { .. }
        ));
        assert!(matches!(
            cause(convert(&Type::U8, &(-1i64).into())),
            ConvertError::OutOfRange { .. }
        ));
        assert!(matches!(
            cause(convert(&Type::I32, &f64::NAN.into())),
            ConvertError::OutOfRange { .. }
        ));
    }

    #[test]
    fn f64_narrows_to_f32_only_within_range() {
        assert_eq!(convert(&Type::F32, &0.5f64.into()).unwrap(), Value::F32(0.5));
        assert_eq!(
            convert(&Type::F32, &f64::INFINITY.into()).unwrap(),
            Value::F32(f32::INFINITY)
        );
        let err = cause(convert(&Type::F32, &1e300f64.into()));
        assert!(matches!(err, ConvertError::OutOfRange { ty: Type::F32, .. }));

        // Same rule whether the number arrives as text or as a value.
        assert!(matches!(
            cause(convert(&Type::F32, &"1e300".into())),
            ConvertError::FloatRange { .. }
        ));
    }

    #[test]
    fn numeric_fallback_reports_the_supplied_type() {
        let err = Number::of(&Value::U8(1))
            .map(|n| n.cast(&Type::Bool, &Value::U8(1)))
            .and_then(Result::err);
        assert_eq!(
            err,
            Some(ConvertError::NotConvertible {
                from: Type::U8,
                to: Type::Bool,
            })
        );
    }

    #[test]
    fn unrelated_types_are_not_convertible() {
        let err = cause(convert(&Type::U8, &true.into()));
        assert_eq!(err.to_string(), "type bool is not convertible to u8");
    }

    #[test]
    fn identical_structs_cast_and_take_the_target_name() {
        let required = Type::Struct(StructType::named(
            "Husky",
            vec![FieldType::new("IQ", Type::U8, true)],
        ));
        let supplied = Value::from(StructValue::anonymous().field("IQ", 7u8));
        let Value::Struct(out) = convert(&required, &supplied).unwrap() else {
            panic!("expected struct");
        };
        assert_eq!(out.name.as_deref(), Some("Husky"));
        assert_eq!(out.get("IQ"), Some(&Value::U8(7)));

        let widened = Value::from(StructValue::anonymous().field("IQ", 7u16));
        assert!(matches!(
            cause(convert(&required, &widened)),
            ConvertError::NotConvertible { .. }
        ));
    }

    #[test]
    fn custom_chain_order_is_respected() {
        // Without the parser, text cannot reach a numeric field.
        let chain: [&dyn Strategy; 2] = [&RenderText, &Cast];
        assert!(convert_with(&chain, &Type::U8, &"12".into()).is_err());
    }
}
