//! The validated prompt configuration.
//!
//! The accepted file format is declared once, as data, by the `Field` and
//! `Section` constants below. [`PromptConfig::validate`] walks those
//! declarations in a single pass, and [`PromptConfig::json_schema`] renders
//! them as a JSON Schema document.
//!
//! ```yaml
//! model: gpt-3.5-turbo
//! settings:
//!   temperature: 0.7
//! prompt:
//!   system: You are helpful.
//!   context: [hi, hello]
//!   message: bye
//! ```

use gptyaml_core::{
    error::Result,
    generic::GenericMessage,
    model::{Model, OpenAiModel},
    schema::{
        AtLeast, Between, Field, FieldRule, Float, Integer, OneOf, Presence, Section, Text,
        TextList, Validation,
    },
    schema_util::{Property, object_schema, root_schema},
    template::IntoPrompt,
};
use schemars::schema::RootSchema;
use serde::Serialize;
use serde_json::Value;

use crate::transcript::Transcript;

const MODEL: Field<OneOf<OpenAiModel>> = Field {
    name: "model",
    rule: OneOf {
        choices: OpenAiModel::ALL,
        key: OpenAiModel::id,
    },
    presence: Presence::Required,
    description: "Chat model identifier, matched case-insensitively.",
};

const SETTINGS: Section = Section {
    name: "settings",
    required: false,
    fields: &[TEMPERATURE.name, TOP_P.name, CHOICES.name],
    description: "Sampling parameters. Every key falls back to its default.",
};

const TEMPERATURE: Field<Between<Float>> = Field {
    name: "temperature",
    rule: Between {
        rule: Float,
        min: 0.0,
        max: 2.0,
    },
    presence: Presence::Default(1.0),
    description: "Sampling temperature.",
};

const TOP_P: Field<Between<Float>> = Field {
    name: "top_p",
    rule: Between {
        rule: Float,
        min: 0.0,
        max: 1.0,
    },
    presence: Presence::Default(1.0),
    description: "Nucleus sampling probability mass.",
};

const CHOICES: Field<AtLeast<Integer>> = Field {
    name: "choices",
    rule: AtLeast {
        rule: Integer,
        min: 1,
    },
    presence: Presence::Default(1),
    description: "Number of completions to generate.",
};

const PROMPT: Section = Section {
    name: "prompt",
    required: true,
    fields: &[SYSTEM.name, CONTEXT.name, MESSAGE.name],
    description: "Text of the conversation.",
};

const SYSTEM: Field<Text> = Field {
    name: "system",
    rule: Text,
    presence: Presence::Optional,
    description: "System instruction placed before everything else.",
};

const CONTEXT: Field<TextList> = Field {
    name: "context",
    rule: TextList,
    presence: Presence::Optional,
    description: "Prior turns, alternating user and assistant, starting with the user.",
};

const MESSAGE: Field<Text> = Field {
    name: "message",
    rule: Text,
    presence: Presence::Required,
    description: "Final user message.",
};

const ROOT_FIELDS: &[&str] = &[MODEL.name, SETTINGS.name, PROMPT.name];

/// A chat prompt that passed validation.
///
/// Immutable once built; every invariant of the file format holds for the
/// lifetime of the value.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptConfig {
    model: OpenAiModel,
    settings: Settings,
    prompt: PromptSpec,
}

/// Sampling parameters with their defaults applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    temperature: f64,
    top_p: f64,
    choices: u64,
}

/// Conversation text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSpec {
    system: Option<String>,
    context: Vec<String>,
    message: String,
}

impl PromptConfig {
    /// Validate a raw nested mapping, as produced by a YAML or JSON parser.
    ///
    /// Every problem in the input is reported at once through
    /// [`GptYamlError::SchemaViolation`](gptyaml_core::GptYamlError::SchemaViolation).
    ///
    /// ```rust
    /// use gptyaml_prompt::PromptConfig;
    /// use serde_json::json;
    ///
    /// let config = PromptConfig::validate(&json!({
    ///     "model": "GPT-4",
    ///     "prompt": { "message": "bye" }
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(config.model().id(), "gpt-4");
    /// assert_eq!(config.settings().temperature(), 1.0);
    /// assert_eq!(config.build_messages().len(), 1);
    /// ```
    pub fn validate(raw: &Value) -> Result<Self> {
        let mut pass = Validation::new();

        let config = pass.root(raw).and_then(|root| {
            pass.deny_unknown(&root, ROOT_FIELDS);
            let model = pass.field(&root, &MODEL);

            let settings = pass.section(&root, &SETTINGS).and_then(|scope| {
                pass.deny_unknown(&scope, SETTINGS.fields);
                let temperature = pass.field(&scope, &TEMPERATURE);
                let top_p = pass.field(&scope, &TOP_P);
                let choices = pass.field(&scope, &CHOICES);
                Some(Settings {
                    temperature: temperature?,
                    top_p: top_p?,
                    choices: u64::try_from(choices?).ok()?,
                })
            });

            let prompt = pass.section(&root, &PROMPT).and_then(|scope| {
                pass.deny_unknown(&scope, PROMPT.fields);
                let system = pass.field(&scope, &SYSTEM);
                let context = pass.field(&scope, &CONTEXT);
                let message = pass.field(&scope, &MESSAGE);
                Some(PromptSpec {
                    system,
                    context: context.unwrap_or_default(),
                    message: message?,
                })
            });

            Some(PromptConfig {
                model: model?,
                settings: settings?,
                prompt: prompt?,
            })
        });

        #[cfg(feature = "tracing")]
        {
            if !pass.violations().is_empty() {
                tracing::warn!(
                    violations = pass.violations().len(),
                    "prompt configuration failed validation"
                );
            }
        }

        pass.finish(config)
    }

    /// Draft-07 JSON Schema describing the accepted file format.
    pub fn json_schema() -> RootSchema {
        let settings = object_schema(
            SETTINGS.description,
            [
                property(&TEMPERATURE),
                property(&TOP_P),
                property(&CHOICES),
            ],
        );
        let prompt = object_schema(
            PROMPT.description,
            [
                property(&SYSTEM),
                property(&CONTEXT),
                property(&MESSAGE),
            ],
        );
        let root = object_schema(
            "",
            [
                property(&MODEL),
                Property {
                    name: SETTINGS.name,
                    required: SETTINGS.required,
                    schema: settings.into(),
                },
                Property {
                    name: PROMPT.name,
                    required: PROMPT.required,
                    schema: prompt.into(),
                },
            ],
        );

        root_schema("Chat completion prompt", root)
    }

    pub fn model(&self) -> OpenAiModel {
        self.model
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn prompt(&self) -> &PromptSpec {
        &self.prompt
    }

    /// The prompt as an ordered transcript, keeping its segments apart.
    pub fn transcript(&self) -> Transcript {
        Transcript::from_prompt(&self.prompt)
    }

    /// The prompt as an ordered list of `{role, content}` messages. Never
    /// empty; the last entry is always the user's `message`.
    pub fn build_messages(&self) -> Vec<GenericMessage> {
        self.transcript().into_prompt()
    }
}

impl Settings {
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn top_p(&self) -> f64 {
        self.top_p
    }

    pub fn choices(&self) -> u64 {
        self.choices
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 1.0,
            choices: 1,
        }
    }
}

impl PromptSpec {
    pub fn system(&self) -> Option<&str> {
        self.system.as_deref()
    }

    /// Prior turns; empty when the file has none.
    pub fn context(&self) -> &[String] {
        &self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&PromptConfig> for Model {
    fn from(config: &PromptConfig) -> Self {
        Model::OpenAi(config.model)
    }
}

fn property<R>(field: &Field<R>) -> Property
where
    R: FieldRule,
    R::Output: Serialize,
{
    Property {
        name: field.name,
        required: field.is_required(),
        schema: field.schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gptyaml_core::generic::GenericRole;
    use serde_json::json;

    fn minimal(model: &str) -> Value {
        json!({ "model": model, "prompt": { "message": "bye" } })
    }

    fn minimal_with_model(model: Value) -> Value {
        json!({ "model": model, "prompt": { "message": "bye" } })
    }

    fn with_settings(settings: Value) -> Value {
        json!({ "model": "gpt-4", "settings": settings, "prompt": { "message": "bye" } })
    }

    #[test]
    fn omitted_settings_use_defaults() {
        let config = PromptConfig::validate(&minimal("gpt-4")).unwrap();
        assert_eq!(config.settings(), &Settings::default());
        assert_eq!(config.settings().temperature(), 1.0);
        assert_eq!(config.settings().top_p(), 1.0);
        assert_eq!(config.settings().choices(), 1);
    }

    #[test]
    fn empty_settings_block_uses_defaults() {
        let from_empty = PromptConfig::validate(&with_settings(json!({}))).unwrap();
        let from_null = PromptConfig::validate(&with_settings(Value::Null)).unwrap();
        assert_eq!(from_empty.settings(), &Settings::default());
        assert_eq!(from_null.settings(), &Settings::default());
    }

    #[test]
    fn settings_are_coerced_and_kept() {
        let config = PromptConfig::validate(&with_settings(json!({
            "temperature": "0.5",
            "top_p": 0,
            "choices": 3.0
        })))
        .unwrap();
        assert_eq!(config.settings().temperature(), 0.5);
        assert_eq!(config.settings().top_p(), 0.0);
        assert_eq!(config.settings().choices(), 3);
    }

    #[test]
    fn model_names_match_case_insensitively() {
        let lower = PromptConfig::validate(&minimal("gpt-4")).unwrap();
        let upper = PromptConfig::validate(&minimal("GPT-4")).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.model(), OpenAiModel::Gpt4);
        assert_eq!(Model::from(&upper), Model::OpenAi(OpenAiModel::Gpt4));
    }

    #[test]
    fn unsupported_models_fail_in_any_case() {
        for name in ["gpt-5", "GPT-5", "Gpt-5"] {
            let err = PromptConfig::validate(&minimal(name)).unwrap_err();
            let violation = err.violations().unwrap().get("model").unwrap();
            assert_eq!(violation.found, Some(json!(name)));
        }

        let err = PromptConfig::validate(&minimal_with_model(json!(4))).unwrap_err();
        assert!(err.violations().unwrap().get("model").is_some());
    }

    #[test]
    fn temperature_bounds_are_inclusive() {
        for ok in [0.0, 2.0] {
            let raw = with_settings(json!({ "temperature": ok }));
            let config = PromptConfig::validate(&raw).unwrap();
            assert_eq!(config.settings().temperature(), ok);
        }

        for bad in [2.5, -0.1] {
            let raw = with_settings(json!({ "temperature": bad }));
            let err = PromptConfig::validate(&raw).unwrap_err();
            let violations = err.violations().unwrap();
            let violation = violations.get("settings.temperature").unwrap();
            assert_eq!(violation.found, Some(json!(bad)));
            assert_eq!(violation.expected, "a number in [0, 2]");
        }
    }

    #[test]
    fn top_p_and_choices_are_range_checked() {
        let err = PromptConfig::validate(&with_settings(json!({ "top_p": 1.5, "choices": 0 })))
            .unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations.get("settings.top_p").unwrap().expected,
            "a number in [0, 1]"
        );
        assert_eq!(
            violations.get("settings.choices").unwrap().expected,
            "an integer >= 1"
        );
    }

    #[test]
    fn uncoercible_settings_fail() {
        let err = PromptConfig::validate(&with_settings(json!({ "temperature": "warm" })))
            .unwrap_err();
        assert_eq!(
            err.violations().unwrap().get("settings.temperature").unwrap().expected,
            "a number in [0, 2]"
        );

        let err = PromptConfig::validate(&with_settings(json!({
            "temperature": "inf",
            "top_p": "NaN",
            "choices": "-inf"
        })))
        .unwrap_err();
        assert_eq!(err.violations().unwrap().len(), 3);
    }

    #[test]
    fn null_leaves_are_rejected_instead_of_defaulted() {
        let err = PromptConfig::validate(&with_settings(json!({
            "temperature": null,
            "top_p": null,
            "choices": null
        })))
        .unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 3);
        for field in ["settings.temperature", "settings.top_p", "settings.choices"] {
            assert_eq!(violations.get(field).unwrap().found, Some(Value::Null));
        }

        let err = PromptConfig::validate(&json!({
            "model": "gpt-4",
            "prompt": { "system": null, "context": null, "message": null }
        }))
        .unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 3);
        assert!(!violations.get("prompt.message").unwrap().is_missing());
    }

    #[test]
    fn missing_message_fails() {
        let err = PromptConfig::validate(&json!({
            "model": "gpt-4",
            "prompt": { "system": "You are helpful." }
        }))
        .unwrap_err();
        assert!(err.violations().unwrap().get("prompt.message").unwrap().is_missing());
    }

    #[test]
    fn malformed_prompt_blocks_fail() {
        let no_prompt = PromptConfig::validate(&json!({ "model": "gpt-4" })).unwrap_err();
        assert!(no_prompt.violations().unwrap().get("prompt").unwrap().is_missing());

        let scalar = PromptConfig::validate(&json!({ "model": "gpt-4", "prompt": "bye" }))
            .unwrap_err();
        assert!(scalar.violations().unwrap().get("prompt").is_some());

        let context = PromptConfig::validate(&json!({
            "model": "gpt-4",
            "prompt": { "context": "hi", "message": "bye" }
        }))
        .unwrap_err();
        assert!(context.violations().unwrap().get("prompt.context").is_some());

        let element = PromptConfig::validate(&json!({
            "model": "gpt-4",
            "prompt": { "context": ["hi", { "nested": true }], "message": "bye" }
        }))
        .unwrap_err();
        assert!(element.violations().unwrap().get("prompt.context[1]").is_some());
    }

    #[test]
    fn unknown_keys_are_reported() {
        let err = PromptConfig::validate(&json!({
            "model": "gpt-4",
            "temperature": 1,
            "settings": { "top-p": 0.5 },
            "prompt": { "message": "bye", "user": "x" }
        }))
        .unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 3);
        assert!(violations.get("temperature").is_some());
        assert!(violations.get("settings.top-p").is_some());
        assert!(violations.get("prompt.user").is_some());
    }

    #[test]
    fn every_violation_is_reported_in_one_pass() {
        let err = PromptConfig::validate(&json!({
            "model": "gpt-5",
            "settings": { "temperature": 3, "choices": -1 },
            "prompt": {}
        }))
        .unwrap_err();
        assert_eq!(err.violations().unwrap().len(), 4);
    }

    #[test]
    fn non_mapping_document_fails() {
        assert!(PromptConfig::validate(&Value::Null).is_err());
        assert!(PromptConfig::validate(&json!("gpt-4")).is_err());
    }

    #[test]
    fn messages_end_with_the_user_message() {
        let config = PromptConfig::validate(&json!({
            "model": "gpt-3.5-turbo",
            "prompt": {
                "system": "You are helpful.",
                "context": ["hi", "hello"],
                "message": "bye"
            }
        }))
        .unwrap();

        assert_eq!(
            config.build_messages(),
            vec![
                GenericMessage::system("You are helpful."),
                GenericMessage::user("hi"),
                GenericMessage::assistant("hello"),
                GenericMessage::user("bye"),
            ]
        );
        assert_eq!(config.prompt().context(), ["hi", "hello"]);
        assert_eq!(config.prompt().system(), Some("You are helpful."));
    }

    #[test]
    fn message_only_prompt_yields_a_single_entry() {
        let config = PromptConfig::validate(&minimal("gpt-4")).unwrap();
        let messages = config.build_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, GenericRole::User);
        assert_eq!(messages[0].content, "bye");
    }

    #[test]
    fn json_schema_mirrors_the_declarations() {
        let schema = serde_json::to_value(PromptConfig::json_schema()).unwrap();

        assert_eq!(schema["required"], json!(["model", "prompt"]));
        assert_eq!(schema["properties"]["model"]["enum"][0], json!("gpt-4"));

        let temperature = &schema["properties"]["settings"]["properties"]["temperature"];
        assert_eq!(temperature["minimum"], json!(0.0));
        assert_eq!(temperature["maximum"], json!(2.0));
        assert_eq!(temperature["default"], json!(1.0));

        let prompt = &schema["properties"]["prompt"];
        assert_eq!(prompt["required"], json!(["message"]));
        assert_eq!(prompt["properties"]["context"]["items"]["type"], json!("string"));
    }
}
