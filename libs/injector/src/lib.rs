//! Writes values into nested struct fields addressed by a path of field
//! names, converting the value to the field's declared type on the way.
//!
//! ```ignore
//! use injector::{inject, Reflect};
//!
//! #[derive(Reflect, Default)]
//! pub struct Husky {
//!     #[inject(rename = "IQ")]
//!     pub iq: u8,
//! }
//!
//! #[derive(Reflect, Default)]
//! pub struct Dog {
//!     #[inject(rename = "Husky")]
//!     pub husky: Husky,
//! }
//!
//! let mut dog = Dog::default();
//! inject(&mut dog, &["Husky", "IQ"], "12")?;
//! assert_eq!(dog.husky.iq, 12);
//! ```

// Lets `#[derive(Reflect)]` refer to `::injector` from inside this crate.
extern crate self as injector;

pub mod config;
pub mod convert;
pub mod error;
pub mod inject;
pub mod path;
pub mod reflect;
pub mod types;
pub mod value;

pub use config::Overrides;
pub use error::{ConvertError, InjectError, Result};
pub use inject::{get, inject, inject_path};
pub use injector_derive::Reflect;
pub use path::Path;
pub use reflect::{FieldMut, Reflect, Slot, Struct};
pub use types::{FieldType, Kind, StructType, Type};
pub use value::{StructValue, Value};
