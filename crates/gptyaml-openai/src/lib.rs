//! Chat completions request payloads for **gptyaml**.
//!
//! [`PayloadAssembler`] projects a validated
//! [`PromptConfig`](gptyaml_prompt::PromptConfig) into a
//! [`api_v1::ChatCompletionRequest`]. Sending it is left to the caller's
//! HTTP client.
mod model_map;
mod payload;

pub mod api_v1;

pub use api_v1::{ChatCompletionMessage, ChatCompletionRequest, MessageRole, MessageShape};
pub use payload::PayloadAssembler;
