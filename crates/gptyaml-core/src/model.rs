//! Model identifiers accepted in a prompt configuration.
//!
//! The set of supported models is a single constant table,
//! [`OpenAiModel::ALL`], together with the wire id returned by
//! [`OpenAiModel::id`]. Validation (a case-insensitive
//! [`OneOf`](crate::schema::OneOf) over that table), JSON Schema export and
//! the payload assembler all read from it.
//!
//! # Adding more models
//!
//! 1. Add the variant to [`OpenAiModel`].
//! 2. Return its wire id from [`OpenAiModel::id`].
//! 3. Append it to [`OpenAiModel::ALL`].
//!
//! The compiler flags step 2 if you forget it; step 3 is covered by the
//! `table_lists_every_variant_once` test.
//!
//! # Example
//!
//! ```rust
//! use gptyaml_core::model::{Model, OpenAiModel};
//! use gptyaml_core::schema::{FieldRule, OneOf};
//!
//! let models = OneOf { choices: OpenAiModel::ALL, key: OpenAiModel::id };
//! let model = models.apply(&"GPT-3.5-Turbo".into()).unwrap();
//! assert_eq!(model, OpenAiModel::Gpt35Turbo);
//! assert_eq!(Model::from(model).to_string(), "gpt-3.5-turbo");
//! ```

use std::fmt;

use serde::{Serialize, Serializer};

/// Universal identifier for the model a prompt targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Model {
    /// Models served by the OpenAI chat completions endpoint.
    OpenAi(OpenAiModel),
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::OpenAi(model) => model.fmt(f),
        }
    }
}

/// Chat models a configuration file may name.
///
/// See <https://platform.openai.com/docs/models/model-endpoint-compatibility>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenAiModel {
    Gpt4,
    Gpt4_0314,
    Gpt4_32k,
    Gpt4_32k0314,
    Gpt35Turbo,
    Gpt35Turbo0301,
}

impl OpenAiModel {
    /// Every supported model, in documentation order.
    pub const ALL: &'static [OpenAiModel] = &[
        OpenAiModel::Gpt4,
        OpenAiModel::Gpt4_0314,
        OpenAiModel::Gpt4_32k,
        OpenAiModel::Gpt4_32k0314,
        OpenAiModel::Gpt35Turbo,
        OpenAiModel::Gpt35Turbo0301,
    ];

    /// Canonical lowercase identifier.
    pub const fn id(self) -> &'static str {
        match self {
            OpenAiModel::Gpt4 => "gpt-4",
            OpenAiModel::Gpt4_0314 => "gpt-4-0314",
            OpenAiModel::Gpt4_32k => "gpt-4-32k",
            OpenAiModel::Gpt4_32k0314 => "gpt-4-32k-0314",
            OpenAiModel::Gpt35Turbo => "gpt-3.5-turbo",
            OpenAiModel::Gpt35Turbo0301 => "gpt-3.5-turbo-0301",
        }
    }
}

impl fmt::Display for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Serializes as the wire id, e.g. `"gpt-4"`.
impl Serialize for OpenAiModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl From<OpenAiModel> for Model {
    fn from(val: OpenAiModel) -> Self {
        Model::OpenAi(val)
    }
}
