use std::fmt;
use std::str::FromStr;

use crate::error::{InjectError, Result};
use crate::reflect::{Reflect, Slot, Struct};
use crate::types::Type;

/// Ordered field names addressing a nested location, e.g. `Dog.Husky.IQ`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<String>);

impl Path {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.0.push(segment.into());
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Splits on `.`. The empty string is rejected; empty segments are kept and
/// fail later as unknown fields.
impl FromStr for Path {
    type Err = InjectError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(InjectError::EmptyPath);
        }
        Ok(Self::new(s.split('.')))
    }
}

impl<S: Into<String>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Dotted text, without validation. Prefer [`str::parse`] for user input.
impl From<&str> for Path {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            return Self::default();
        }
        Self::new(s.split('.'))
    }
}

impl From<Vec<String>> for Path {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for Path {
    fn from(segments: &[&str]) -> Self {
        Self::new(segments.iter().copied())
    }
}

impl<const N: usize> From<[&str; N]> for Path {
    fn from(segments: [&str; N]) -> Self {
        Self::new(segments)
    }
}

/// Dotted rendering of borrowed segments, for log fields.
pub(crate) struct DisplayPath<'a, S>(pub(crate) &'a [S]);

impl<S: AsRef<str>> fmt::Display for DisplayPath<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.as_ref())?;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════
//  Resolution
// ════════════════════════════════════════════════════════════════

/// A field located by [`resolve`].
pub struct Resolved<'a> {
    pub slot: Slot<'a>,
    /// Declared type of the field.
    pub ty: Type,
    /// Every field along the path is `pub`.
    pub settable: bool,
}

/// Walks `path` from `target`, one exact field-name lookup per segment.
///
/// Fails fast on the first unknown segment. Settability is not checked here;
/// see [`resolve_settable`].
pub fn resolve<'a, T, S>(target: &'a mut T, path: &[S]) -> Result<Resolved<'a>>
where
    T: Reflect + ?Sized,
    S: AsRef<str>,
{
    let Some((last, parents)) = path.split_last() else {
        return Err(InjectError::EmptyPath);
    };

    let root_ty = target.reflect_type();
    let mut current: &'a mut dyn Struct = match target.slot() {
        Slot::Struct(s) => s,
        _ => return Err(InjectError::InvalidTarget(root_ty)),
    };

    let mut settable = true;
    for segment in parents {
        let segment = segment.as_ref();
        let field = current
            .field_mut(segment)
            .ok_or_else(|| InjectError::FieldNotFound(segment.to_string()))?;
        settable &= field.exported;
        current = match field.value.slot() {
            Slot::Struct(inner) => inner,
            _ => return Err(InjectError::NotStruct(segment.to_string())),
        };
    }

    let last = last.as_ref();
    let field = current
        .field_mut(last)
        .ok_or_else(|| InjectError::FieldNotFound(last.to_string()))?;
    settable &= field.exported;
    let ty = field.value.reflect_type();

    tracing::debug!(
        path = %DisplayPath(path),
        field_type = %ty,
        settable,
        "resolved"
    );
    Ok(Resolved {
        slot: field.value.slot(),
        ty,
        settable,
    })
}

/// [`resolve`], then reject fields that cannot be written, reporting the
/// full dotted path.
pub fn resolve_settable<'a, T, S>(target: &'a mut T, path: &[S]) -> Result<Resolved<'a>>
where
    T: Reflect + ?Sized,
    S: AsRef<str>,
{
    let resolved = resolve(target, path)?;
    if !resolved.settable {
        return Err(InjectError::FieldNotSettable(Path::new(
            path.iter().map(|s| s.as_ref().to_string()),
        )));
    }
    Ok(resolved)
}

/// Read-only walk. Same lookup rules as [`resolve`].
pub fn lookup<'a, T, S>(target: &'a T, path: &[S]) -> Result<&'a dyn Reflect>
where
    T: Reflect + ?Sized,
    S: AsRef<str>,
{
    let Some((last, parents)) = path.split_last() else {
        return Err(InjectError::EmptyPath);
    };

    let mut current: &'a dyn Struct = target
        .as_struct()
        .ok_or_else(|| InjectError::InvalidTarget(target.reflect_type()))?;

    for segment in parents {
        let segment = segment.as_ref();
        current = current
            .field(segment)
            .ok_or_else(|| InjectError::FieldNotFound(segment.to_string()))?
            .as_struct()
            .ok_or_else(|| InjectError::NotStruct(segment.to_string()))?;
    }

    let last = last.as_ref();
    current
        .field(last)
        .ok_or_else(|| InjectError::FieldNotFound(last.to_string()))
}
