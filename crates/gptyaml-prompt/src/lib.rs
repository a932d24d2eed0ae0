//! Validated chat prompts and their transcripts.
//!
//! [`PromptConfig::validate`] turns a raw nested mapping into an immutable,
//! typed configuration; [`PromptConfig::build_messages`] derives the ordered
//! message list a chat completions API expects. The transcript itself is
//! assembled from [`fragments`].

pub mod config;
pub mod fragments;
pub mod transcript;

pub use config::{PromptConfig, PromptSpec, Settings};
pub use transcript::Transcript;
