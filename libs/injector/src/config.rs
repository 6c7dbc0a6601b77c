use crate::error::{InjectError, Result};
use crate::inject::inject_path;
use crate::path::Path;
use crate::reflect::Reflect;
use crate::value::Value;

/// An ordered batch of field assignments, typically collected from a config
/// source (`key=value` arguments, a JSON document, ...).
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct Overrides {
    entries: Vec<(Path, Value)>,
}

impl Overrides {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Adds an entry, replacing the value of an existing entry for `path`.
    pub fn set(&mut self, path: impl Into<Path>, value: impl Into<Value>) {
        let path = path.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| p == &path) {
            entry.1 = value;
        } else {
            self.entries.push((path, value));
        }
    }

    pub fn get(&self, path: &Path) -> Option<&Value> {
        self.entries.iter().find(|(p, _)| p == path).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Value)> {
        self.entries.iter().map(|(p, v)| (p, v))
    }

    /// Parses `Dog.Husky.IQ=12`. The value is kept as text and converted
    /// when applied. Only the first `=` separates path from value; both
    /// sides are trimmed.
    pub fn parse_assignment(&mut self, assignment: &str) -> Result<()> {
        let (path, value) = assignment
            .split_once('=')
            .ok_or_else(|| InjectError::InvalidAssignment(assignment.to_string()))?;
        let path: Path = path.trim().parse()?;
        self.set(path, value.trim());
        Ok(())
    }

    /// Flattens nested objects into dotted paths:
    /// `{"Dog": {"Husky": {"IQ": 12}}}` yields `Dog.Husky.IQ = 12`.
    pub fn from_json(json: &serde_json::Value) -> Result<Self> {
        let mut overrides = Self::new();
        match json {
            serde_json::Value::Object(map) => {
                for (name, value) in map {
                    overrides.collect(Path::new([name.as_str()]), value)?;
                }
            }
            _ => return Err(InjectError::NotAnObject),
        }
        Ok(overrides)
    }

    fn collect(&mut self, path: Path, json: &serde_json::Value) -> Result<()> {
        if let serde_json::Value::Object(map) = json {
            for (name, value) in map {
                let mut nested = path.clone();
                nested.push(name.as_str());
                self.collect(nested, value)?;
            }
            return Ok(());
        }
        let value = Value::try_from(json.clone()).map_err(|e| InjectError::Override {
            path: path.clone(),
            source: Box::new(e.into()),
        })?;
        self.set(path, value);
        Ok(())
    }

    /// Applies every entry in order. All or nothing: the entries are applied
    /// to a copy of `target`, which replaces it only if every entry succeeds.
    pub fn apply<T>(&self, target: &mut T) -> Result<()>
    where
        T: Reflect + Clone,
    {
        let mut scratch = target.clone();
        for (path, value) in &self.entries {
            inject_path(&mut scratch, path, value.clone()).map_err(|e| {
                tracing::debug!(%path, error = %e, "override rejected");
                InjectError::Override {
                    path: path.clone(),
                    source: Box::new(e),
                }
            })?;
        }
        *target = scratch;
        tracing::debug!(count = self.entries.len(), "overrides applied");
        Ok(())
    }
}

impl TryFrom<serde_json::Value> for Overrides {
    type Error = InjectError;

    fn try_from(json: serde_json::Value) -> Result<Self> {
        Self::from_json(&json)
    }
}

impl<P, V> FromIterator<(P, V)> for Overrides
where
    P: Into<Path>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (P, V)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (path, value) in iter {
            overrides.set(path, value);
        }
        overrides
    }
}
