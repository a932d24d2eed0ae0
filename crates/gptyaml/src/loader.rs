//! Loading prompt configurations from YAML or JSON.
//!
//! Parsing and validation are two separate steps: [`read_source`] and
//! [`parse_source`] only turn text into a nested mapping, while
//! [`PromptConfig::validate`] checks it. Failures of the first step surface
//! as [`GptYamlError::SourceUnavailable`], failures of the second as
//! [`GptYamlError::SchemaViolation`].
//!
//! YAML can spell numbers JSON cannot hold (`.inf`, `-.inf`, `.nan`). They
//! are never accepted: each one is reported as a violation at its dotted
//! path instead of turning into `null`.

use std::{fs, path::Path};

use gptyaml_core::{
    error::{GptYamlError, Result, Violation, Violations},
    schema::ROOT,
};
use gptyaml_prompt::PromptConfig;
use serde_json::{Map, Value};
use serde_yaml::Value as YamlValue;

/// Origin reported for text that did not come from a file.
pub const INLINE_ORIGIN: &str = "<inline>";

/// Text format of a configuration source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    /// YAML 1.2; also accepts JSON documents.
    #[default]
    Yaml,
    Json,
}

impl SourceFormat {
    /// `.json` files are JSON, everything else is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SourceFormat::Json,
            _ => SourceFormat::Yaml,
        }
    }
}

/// Read and validate the configuration file at `path`.
///
/// ```rust,no_run
/// let config = gptyaml::load_prompt_config("prompts/chat_completion.yaml")?;
/// println!("{} messages", config.build_messages().len());
/// # Ok::<(), gptyaml::GptYamlError>(())
/// ```
pub fn load_prompt_config(path: impl AsRef<Path>) -> Result<PromptConfig> {
    let source = Decoded::read(path.as_ref())?;
    source.validate()
}

/// Validate configuration text that is already in memory.
///
/// ```rust
/// use gptyaml::{parse_prompt_config, SourceFormat};
///
/// let config = parse_prompt_config(
///     "model: gpt-4\nprompt:\n  message: bye\n",
///     SourceFormat::Yaml,
/// )?;
/// assert_eq!(config.prompt().message(), "bye");
/// # Ok::<(), gptyaml::GptYamlError>(())
/// ```
pub fn parse_prompt_config(text: &str, format: SourceFormat) -> Result<PromptConfig> {
    Decoded::parse(text, format, INLINE_ORIGIN)?.validate()
}

/// Read the file at `path` into a nested mapping without validating it.
pub fn read_source(path: impl AsRef<Path>) -> Result<Value> {
    Decoded::read(path.as_ref())?.into_value()
}

/// Parse `text` into a nested mapping without validating it. `origin` is
/// only used in error reports.
pub fn parse_source(text: &str, format: SourceFormat, origin: &str) -> Result<Value> {
    Decoded::parse(text, format, origin)?.into_value()
}

/// A parsed source plus the values that had no JSON counterpart.
///
/// Rejected values stay in `raw` as their YAML spelling, so the schema pass
/// still sees the key as present and reports it with the field's own
/// constraint.
#[derive(Debug)]
struct Decoded {
    raw: Value,
    rejected: Violations,
}

impl Decoded {
    fn read(path: &Path) -> Result<Self> {
        let origin = path.display().to_string();

        let text = fs::read_to_string(path)
            .map_err(|err| GptYamlError::source_unavailable(origin.as_str(), err))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %origin, bytes = text.len(), "read prompt configuration");

        Self::parse(&text, SourceFormat::from_path(path), &origin)
    }

    fn parse(text: &str, format: SourceFormat, origin: &str) -> Result<Self> {
        match format {
            SourceFormat::Yaml => {
                let yaml: YamlValue = serde_yaml::from_str(text)
                    .map_err(|err| GptYamlError::source_unavailable(origin, err))?;
                let mut rejected = Violations::new();
                let raw = yaml_to_json(yaml, "", &mut rejected)
                    .map_err(|msg| GptYamlError::source_unavailable(origin, msg))?;

                #[cfg(feature = "tracing")]
                {
                    if !rejected.is_empty() {
                        tracing::warn!(origin, count = rejected.len(), "non-finite numbers");
                    }
                }

                Ok(Self { raw, rejected })
            }
            SourceFormat::Json => {
                let raw = serde_json::from_str(text)
                    .map_err(|err| GptYamlError::source_unavailable(origin, err))?;
                Ok(Self {
                    raw,
                    rejected: Violations::new(),
                })
            }
        }
    }

    fn into_value(self) -> Result<Value> {
        if self.rejected.is_empty() {
            Ok(self.raw)
        } else {
            Err(self.rejected.into())
        }
    }

    /// Schema pass over `raw`. A rejected value is reported once: by its
    /// field rule when that rule fails on it, otherwise as non-finite.
    fn validate(self) -> Result<PromptConfig> {
        let mut violations = match PromptConfig::validate(&self.raw) {
            Ok(config) if self.rejected.is_empty() => return Ok(config),
            Ok(_) => Violations::new(),
            Err(GptYamlError::SchemaViolation(violations)) => violations,
            Err(err) => return Err(err),
        };

        for violation in self.rejected {
            if violations.get(&violation.field).is_none() {
                violations.push(violation);
            }
        }
        Err(violations.into())
    }
}

fn yaml_to_json(
    value: YamlValue,
    path: &str,
    rejected: &mut Violations,
) -> std::result::Result<Value, String> {
    let json = match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(b),
        YamlValue::Number(n) => number_to_json(&n, path, rejected),
        YamlValue::String(s) => Value::String(s),
        YamlValue::Sequence(items) => Value::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| yaml_to_json(item, &format!("{path}[{i}]"), rejected))
                .collect::<std::result::Result<_, _>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, item) in mapping {
                let key = mapping_key(key)?;
                let path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                object.insert(key, yaml_to_json(item, &path, rejected)?);
            }
            Value::Object(object)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value, path, rejected)?,
    };
    Ok(json)
}

fn number_to_json(n: &serde_yaml::Number, path: &str, rejected: &mut Violations) -> Value {
    if let Some(i) = n.as_i64() {
        return Value::from(i);
    }
    if let Some(u) = n.as_u64() {
        return Value::from(u);
    }
    if let Some(finite) = n.as_f64().and_then(serde_json::Number::from_f64) {
        return Value::Number(finite);
    }

    // `.inf`, `-.inf` or `.nan`
    let spelled = Value::String(n.to_string());
    let field = if path.is_empty() { ROOT } else { path };
    rejected.push(Violation::invalid(field, spelled.clone(), "a finite number"));
    spelled
}

fn mapping_key(key: YamlValue) -> std::result::Result<String, String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_owned()),
        other => Err(format!("mapping keys must be scalars, got {other:?}")),
    }
}
