//! Projection of a [`PromptConfig`] into a chat completions request.
//!
//! ```rust
//! use gptyaml_openai::PayloadAssembler;
//! use gptyaml_prompt::PromptConfig;
//! use serde_json::json;
//!
//! let config = PromptConfig::validate(&json!({
//!     "model": "gpt-4",
//!     "prompt": { "message": "bye" }
//! }))
//! .unwrap();
//!
//! let payload = PayloadAssembler::new().assemble_value(&config).unwrap();
//! assert_eq!(payload["messages"], json!([{ "role": "user", "content": "bye" }]));
//! assert_eq!(payload["choices"], json!(1));
//! ```

use gptyaml_core::{error::Result, model::Model};
use gptyaml_prompt::PromptConfig;
use serde_json::Value;

use crate::{
    api_v1::{ChatCompletionMessage, ChatCompletionRequest, MessageShape},
    model_map::map_model,
};

/// Builds request payloads. Pure and deterministic: the same config always
/// yields the same payload.
#[derive(Debug, Clone, Copy, Default)]
pub struct PayloadAssembler {
    context_shape: MessageShape,
}

impl PayloadAssembler {
    /// Every message rendered as `{role, content}`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how context turns are laid out. The system and final messages
    /// are always [`MessageShape::Tagged`].
    pub fn with_context_shape(mut self, shape: MessageShape) -> Self {
        self.context_shape = shape;
        self
    }

    pub fn assemble(&self, config: &PromptConfig) -> ChatCompletionRequest {
        let transcript = config.transcript();
        let context_shape = self.context_shape;

        let mut messages: Vec<ChatCompletionMessage> = Vec::with_capacity(transcript.len());
        messages.extend(transcript.system().cloned().map(ChatCompletionMessage::from));
        messages.extend(
            transcript
                .context()
                .iter()
                .cloned()
                .map(|message| ChatCompletionMessage::from(message).with_shape(context_shape)),
        );
        messages.push(transcript.message().clone().into());

        let settings = config.settings();
        ChatCompletionRequest::new(map_model(&Model::from(config)).into_owned(), messages)
            .top_p(settings.top_p())
            .temperature(settings.temperature())
            .choices(settings.choices())
    }

    /// [`Self::assemble`] rendered as a JSON value.
    pub fn assemble_value(&self, config: &PromptConfig) -> Result<Value> {
        Ok(serde_json::to_value(self.assemble(config))?)
    }
}

impl From<&PromptConfig> for ChatCompletionRequest {
    fn from(config: &PromptConfig) -> Self {
        PayloadAssembler::new().assemble(config)
    }
}
