//! Unified error type exposed by **`gptyaml-core`**.
//!
//! Every crate in the workspace converts its failures into one of these
//! variants. Callers only have to tell apart two situations: the *source*
//! could not be read or parsed ([`GptYamlError::SourceUnavailable`]), or the
//! source was read fine but its *content* is wrong
//! ([`GptYamlError::SchemaViolation`]).

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, GptYamlError>;

#[derive(Debug, Error)]
pub enum GptYamlError {
    /// The raw configuration failed structural or semantic validation.
    ///
    /// All problems found during the validation pass are reported together.
    #[error("invalid prompt configuration: {0}")]
    SchemaViolation(Violations),

    /// The configuration source could not be read or parsed into a nested
    /// mapping. `origin` is the file path, or `<inline>` for in-memory text.
    #[error("configuration source `{origin}` is unavailable: {source}")]
    SourceUnavailable {
        origin: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Failure while rendering a payload into a JSON value.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GptYamlError {
    pub fn source_unavailable(
        origin: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        Self::SourceUnavailable {
            origin: origin.into(),
            source: source.into(),
        }
    }

    /// The individual violations, if this is a [`GptYamlError::SchemaViolation`].
    pub fn violations(&self) -> Option<&Violations> {
        match self {
            Self::SchemaViolation(violations) => Some(violations),
            _ => None,
        }
    }
}

impl From<Violations> for GptYamlError {
    fn from(value: Violations) -> Self {
        Self::SchemaViolation(value)
    }
}

/// A single failed check.
///
/// * `field` – dotted path of the offending key (`settings.top_p`,
///   `prompt.context[1]`).
/// * `found` – the value that was supplied, `None` when the key is missing.
/// * `expected` – human readable constraint, e.g. `a number in [0, 2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub field: String,
    pub found: Option<Value>,
    pub expected: String,
}

impl Violation {
    pub fn missing(field: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            found: None,
            expected: expected.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, found: Value, expected: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            found: Some(found),
            expected: expected.into(),
        }
    }

    pub fn is_missing(&self) -> bool {
        self.found.is_none()
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.found {
            None => write!(f, "`{}` is required ({})", self.field, self.expected),
            Some(found) => write!(
                f,
                "`{}` must be {}, got {}",
                self.field, self.expected, found
            ),
        }
    }
}

/// Non-empty list of [`Violation`]s collected by one validation pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }

    /// Look up the violation reported for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&Violation> {
        self.0.iter().find(|v| v.field == field)
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
