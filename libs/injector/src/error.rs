use std::num::{ParseFloatError, ParseIntError};

use crate::path::Path;
use crate::types::Type;

/// Why a supplied value could not be turned into the declared field type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("cannot parse {text:?} as bool")]
    ParseBool { text: String },

    #[error("cannot parse {text:?} as {ty}: {source}")]
    ParseInt {
        text: String,
        ty: Type,
        source: ParseIntError,
    },

    #[error("cannot parse {text:?} as {ty}: {source}")]
    ParseFloat {
        text: String,
        ty: Type,
        source: ParseFloatError,
    },

    #[error("{text:?} is out of range for {ty}")]
    FloatRange { text: String, ty: Type },

    /// A numeric cast whose result would not fit the target kind.
    #[error("value {value} is out of range for {ty}")]
    OutOfRange { value: String, ty: Type },

    #[error("type {from} is not convertible to {to}")]
    NotConvertible { from: Type, to: Type },

    #[error("json {0} has no field value representation")]
    UnsupportedJson(&'static str),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InjectError {
    /// The root object does not expose named fields.
    #[error("target of type {0} is not a struct")]
    InvalidTarget(Type),

    #[error("path is empty")]
    EmptyPath,

    #[error("field {0} is not valid")]
    FieldNotFound(String),

    /// An intermediate segment names a field without fields of its own.
    #[error("field {0} is not a struct")]
    NotStruct(String),

    #[error("fields {0} cannot be set")]
    FieldNotSettable(Path),

    #[error("cannot convert {supplied} to {required}: {source}")]
    ConversionFailed {
        required: Type,
        supplied: Type,
        source: ConvertError,
    },

    /// A field handle and a value disagree on the type. Only reachable with
    /// a `Reflect` implementation whose `reflect_type` does not match its `slot`.
    #[error("field of type {field} cannot hold a value of type {value}")]
    TypeMismatch { field: Type, value: Type },

    #[error("invalid assignment {0:?} (expected `path=value`)")]
    InvalidAssignment(String),

    #[error("override document must be a JSON object")]
    NotAnObject,

    #[error("override {path}: {source}")]
    Override {
        path: Path,
        #[source]
        source: Box<InjectError>,
    },

    #[error(transparent)]
    Json(#[from] ConvertError),
}

pub type Result<T, E = InjectError> = std::result::Result<T, E>;
