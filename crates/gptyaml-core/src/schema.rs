//! Declarative field validation over untyped nested mappings.
//!
//! A configuration format is described as data: every key is a [`Field`]
//! holding a name, a [`Presence`] and a [`FieldRule`] that coerces and checks
//! the raw value. Nested mappings are [`Section`]s. One [`Validation`] pass
//! walks all declarations, collects **every** violation instead of stopping
//! at the first, and finally yields either the typed record or
//! [`GptYamlError::SchemaViolation`].
//!
//! ```rust
//! use gptyaml_core::schema::{Between, Field, Float, Presence, Validation};
//! use serde_json::json;
//!
//! const TEMPERATURE: Field<Between<Float>> = Field {
//!     name: "temperature",
//!     rule: Between { rule: Float, min: 0.0, max: 2.0 },
//!     presence: Presence::Default(1.0),
//!     description: "Sampling temperature.",
//! };
//!
//! let raw = json!({ "temperature": "0.7" });
//! let mut pass = Validation::new();
//! let root = pass.root(&raw);
//! let temperature = root.as_ref().and_then(|scope| pass.field(scope, &TEMPERATURE));
//! assert_eq!(pass.finish(temperature).unwrap(), 0.7);
//! ```
//!
//! Rules also describe themselves as JSON Schema fragments, so the schema
//! export is generated from the very declarations that drive validation.

use std::{borrow::Cow, fmt::Display};

use schemars::schema::{InstanceType, Schema, SchemaObject, SingleOrVec};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{GptYamlError, Result, Violation, Violations};

/// Path used in violations that concern the document as a whole.
pub const ROOT: &str = "<root>";

/// A present value failed a [`FieldRule`].
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    /// Suffix appended to the field path, e.g. `[2]` for a list element.
    pub at: Option<String>,
    pub found: Value,
    pub expected: Cow<'static, str>,
}

impl Mismatch {
    pub fn new(found: &Value, expected: impl Into<Cow<'static, str>>) -> Self {
        Self {
            at: None,
            found: found.clone(),
            expected: expected.into(),
        }
    }

    pub fn at(mut self, suffix: impl Into<String>) -> Self {
        self.at = Some(suffix.into());
        self
    }

    fn expecting(mut self, expected: Cow<'static, str>) -> Self {
        self.expected = expected;
        self
    }

    fn into_violation(self, path: String) -> Violation {
        let field = match self.at {
            Some(suffix) => path + &suffix,
            None => path,
        };
        Violation::invalid(field, self.found, self.expected)
    }
}

/// Coercion plus check for one raw value.
pub trait FieldRule {
    /// Typed value produced on success.
    type Output;

    fn apply(&self, value: &Value) -> std::result::Result<Self::Output, Mismatch>;

    /// Human readable constraint, used in violation messages.
    fn expected(&self) -> Cow<'static, str>;

    /// JSON Schema fragment accepted by this rule.
    fn describe(&self) -> SchemaObject;
}

/// Finite number, or a string holding one. Booleans, `"inf"` and `"NaN"`
/// are rejected.
#[derive(Debug, Clone, Copy)]
pub struct Float;

impl FieldRule for Float {
    type Output = f64;

    fn apply(&self, value: &Value) -> std::result::Result<f64, Mismatch> {
        let coerced = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        coerced
            .filter(|f| f.is_finite())
            .ok_or_else(|| Mismatch::new(value, self.expected()))
    }

    fn expected(&self) -> Cow<'static, str> {
        "a number".into()
    }

    fn describe(&self) -> SchemaObject {
        typed(InstanceType::Number)
    }
}

/// Whole number. Floats without fractional part and integer strings are
/// accepted; `2.5` is not truncated.
#[derive(Debug, Clone, Copy)]
pub struct Integer;

impl FieldRule for Integer {
    type Output = i64;

    fn apply(&self, value: &Value) -> std::result::Result<i64, Mismatch> {
        let coerced = match value {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        coerced.ok_or_else(|| Mismatch::new(value, self.expected()))
    }

    fn expected(&self) -> Cow<'static, str> {
        "an integer".into()
    }

    fn describe(&self) -> SchemaObject {
        typed(InstanceType::Integer)
    }
}

/// String, taken verbatim.
#[derive(Debug, Clone, Copy)]
pub struct Text;

impl FieldRule for Text {
    type Output = String;

    fn apply(&self, value: &Value) -> std::result::Result<String, Mismatch> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(Mismatch::new(other, self.expected())),
        }
    }

    fn expected(&self) -> Cow<'static, str> {
        "a string".into()
    }

    fn describe(&self) -> SchemaObject {
        typed(InstanceType::String)
    }
}

/// Ordered sequence of strings. The first non-string element is reported
/// with its index.
#[derive(Debug, Clone, Copy)]
pub struct TextList;

impl FieldRule for TextList {
    type Output = Vec<String>;

    fn apply(&self, value: &Value) -> std::result::Result<Vec<String>, Mismatch> {
        let Value::Array(items) = value else {
            return Err(Mismatch::new(value, self.expected()));
        };

        items
            .iter()
            .enumerate()
            .map(|(i, item)| Text.apply(item).map_err(|m| m.at(format!("[{i}]"))))
            .collect()
    }

    fn expected(&self) -> Cow<'static, str> {
        "a list of strings".into()
    }

    fn describe(&self) -> SchemaObject {
        let mut schema = typed(InstanceType::Array);
        schema.array().items = Some(SingleOrVec::Single(Box::new(Text.describe().into())));
        schema
    }
}

/// Numeric types usable as bounds.
pub trait Bound: Copy + PartialOrd + Display {
    fn to_f64(self) -> f64;
}

impl Bound for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

impl Bound for i64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

/// Inclusive range `[min, max]` on top of a numeric rule. NaN never passes.
///
/// Mismatches of the inner rule are reported with the full range.
pub struct Between<R: FieldRule> {
    pub rule: R,
    pub min: R::Output,
    pub max: R::Output,
}

impl<R> FieldRule for Between<R>
where
    R: FieldRule,
    R::Output: Bound,
{
    type Output = R::Output;

    fn apply(&self, value: &Value) -> std::result::Result<R::Output, Mismatch> {
        let v = self.rule.apply(value).map_err(|m| m.expecting(self.expected()))?;
        if self.min <= v && v <= self.max {
            Ok(v)
        } else {
            Err(Mismatch::new(value, self.expected()))
        }
    }

    fn expected(&self) -> Cow<'static, str> {
        format!("{} in [{}, {}]", self.rule.expected(), self.min, self.max).into()
    }

    fn describe(&self) -> SchemaObject {
        let mut schema = self.rule.describe();
        let number = schema.number();
        number.minimum = Some(self.min.to_f64());
        number.maximum = Some(self.max.to_f64());
        schema
    }
}

/// Lower bound (inclusive) on top of a numeric rule.
pub struct AtLeast<R: FieldRule> {
    pub rule: R,
    pub min: R::Output,
}

impl<R> FieldRule for AtLeast<R>
where
    R: FieldRule,
    R::Output: Bound,
{
    type Output = R::Output;

    fn apply(&self, value: &Value) -> std::result::Result<R::Output, Mismatch> {
        let v = self.rule.apply(value).map_err(|m| m.expecting(self.expected()))?;
        if v >= self.min {
            Ok(v)
        } else {
            Err(Mismatch::new(value, self.expected()))
        }
    }

    fn expected(&self) -> Cow<'static, str> {
        format!("{} >= {}", self.rule.expected(), self.min).into()
    }

    fn describe(&self) -> SchemaObject {
        let mut schema = self.rule.describe();
        schema.number().minimum = Some(self.min.to_f64());
        schema
    }
}

/// Case-insensitive lookup of a string in a constant table.
#[derive(Debug, Clone, Copy)]
pub struct OneOf<T: 'static> {
    pub choices: &'static [T],
    pub key: fn(T) -> &'static str,
}

impl<T: Copy + 'static> OneOf<T> {
    fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.choices.iter().map(|choice| (self.key)(*choice))
    }
}

impl<T: Copy + 'static> FieldRule for OneOf<T> {
    type Output = T;

    fn apply(&self, value: &Value) -> std::result::Result<T, Mismatch> {
        let Value::String(s) = value else {
            return Err(Mismatch::new(value, self.expected()));
        };

        self.choices
            .iter()
            .copied()
            .find(|choice| (self.key)(*choice).eq_ignore_ascii_case(s))
            .ok_or_else(|| Mismatch::new(value, self.expected()))
    }

    fn expected(&self) -> Cow<'static, str> {
        let keys: Vec<_> = self.keys().map(|key| format!("`{key}`")).collect();
        format!("one of {}", keys.join(", ")).into()
    }

    fn describe(&self) -> SchemaObject {
        let mut schema = typed(InstanceType::String);
        schema.enum_values = Some(self.keys().map(Value::from).collect());
        schema
    }
}

/// Whether a key must be supplied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence<T> {
    Required,
    Optional,
    /// Optional; the value is used when the key is absent.
    Default(T),
}

/// Declaration of a single key.
pub struct Field<R: FieldRule> {
    pub name: &'static str,
    pub rule: R,
    pub presence: Presence<R::Output>,
    pub description: &'static str,
}

impl<R: FieldRule> Field<R> {
    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }

    /// JSON Schema of this key, including its default and description.
    pub fn schema(&self) -> Schema
    where
        R::Output: Serialize,
    {
        let mut schema = self.rule.describe();
        let metadata = schema.metadata();
        if !self.description.is_empty() {
            metadata.description = Some(self.description.to_owned());
        }
        if let Presence::Default(default) = &self.presence {
            metadata.default = serde_json::to_value(default).ok();
        }
        schema.into()
    }
}

/// Declaration of a nested mapping. `fields` lists every key the section
/// accepts; anything else is reported as unexpected.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub name: &'static str,
    pub required: bool,
    pub fields: &'static [&'static str],
    pub description: &'static str,
}

/// View on one mapping of the raw document.
///
/// A scope without a mapping behaves like an empty one, which is how an
/// absent (or `null`) optional section gets its defaults. On leaf keys an
/// explicit `null` is a value like any other and goes through the rule.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    path: String,
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Scope<'a> {
    pub fn path(&self) -> &str {
        if self.path.is_empty() { ROOT } else { &self.path }
    }

    fn path_of(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_owned()
        } else {
            format!("{}.{}", self.path, name)
        }
    }

    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map?.get(name)
    }
}

/// A single validation pass that accumulates violations.
#[derive(Debug, Default)]
pub struct Validation {
    violations: Violations,
}

impl Validation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the document. It must be a mapping.
    pub fn root<'a>(&mut self, raw: &'a Value) -> Option<Scope<'a>> {
        match raw {
            Value::Object(map) => Some(Scope {
                path: String::new(),
                map: Some(map),
            }),
            other => {
                self.violations
                    .push(Violation::invalid(ROOT, other.clone(), "a mapping"));
                None
            }
        }
    }

    /// Enter a nested mapping. An absent optional section yields an empty
    /// scope; a present non-mapping value is a violation.
    pub fn section<'a>(&mut self, parent: &Scope<'a>, section: &Section) -> Option<Scope<'a>> {
        let path = parent.path_of(section.name);
        match parent.get(section.name).filter(|value| !value.is_null()) {
            Some(Value::Object(map)) => Some(Scope {
                path,
                map: Some(map),
            }),
            Some(other) => {
                self.violations
                    .push(Violation::invalid(path, other.clone(), "a mapping"));
                None
            }
            None if section.required => {
                self.violations.push(Violation::missing(path, "a mapping"));
                None
            }
            None => Some(Scope { path, map: None }),
        }
    }

    /// Resolve one key. Returns `None` when the key is optional and absent,
    /// or when a violation was recorded.
    pub fn field<R>(&mut self, scope: &Scope<'_>, field: &Field<R>) -> Option<R::Output>
    where
        R: FieldRule,
        R::Output: Clone,
    {
        let path = scope.path_of(field.name);
        let Some(value) = scope.get(field.name) else {
            return match &field.presence {
                Presence::Required => {
                    self.violations
                        .push(Violation::missing(path, field.rule.expected()));
                    None
                }
                Presence::Optional => None,
                Presence::Default(default) => Some(default.clone()),
            };
        };

        match field.rule.apply(value) {
            Ok(output) => Some(output),
            Err(mismatch) => {
                self.violations.push(mismatch.into_violation(path));
                None
            }
        }
    }

    /// Report every key of `scope` that is not listed in `known`.
    pub fn deny_unknown(&mut self, scope: &Scope<'_>, known: &[&str]) {
        let Some(map) = scope.map else {
            return;
        };

        for (key, value) in map {
            if !known.contains(&key.as_str()) {
                let listed: Vec<_> = known.iter().map(|k| format!("`{k}`")).collect();
                self.violations.push(Violation::invalid(
                    scope.path_of(key),
                    value.clone(),
                    format!("absent (unknown field; expected one of {})", listed.join(", ")),
                ));
            }
        }
    }

    pub fn violations(&self) -> &Violations {
        &self.violations
    }

    /// Close the pass. Any recorded violation wins over `value`.
    pub fn finish<T>(self, value: Option<T>) -> Result<T> {
        if !self.violations.is_empty() {
            return Err(GptYamlError::SchemaViolation(self.violations));
        }

        value.ok_or_else(|| {
            let mut violations = Violations::new();
            violations.push(Violation::missing(ROOT, "a complete configuration"));
            GptYamlError::SchemaViolation(violations)
        })
    }
}

fn typed(instance_type: InstanceType) -> SchemaObject {
    SchemaObject {
        instance_type: Some(instance_type.into()),
        ..Default::default()
    }
}
