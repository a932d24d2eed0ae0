//! Generic message and role types used across the workspace.
//!
//! They mirror the chat concepts every completions API shares: “system”,
//! “user” and “assistant”. Provider crates convert them into their wire
//! structs with a plain `From`/`Into`.
use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A single role-tagged entry of a transcript.
///
/// Serializes as `{"role": "...", "content": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericMessage {
    pub role: GenericRole,
    pub content: String,
}

impl GenericMessage {
    /// Convenience constructor mirroring the field order used by common HTTP
    /// APIs (`role`, then `content`).
    ///
    /// ```rust
    /// use gptyaml_core::generic::{GenericMessage, GenericRole};
    ///
    /// let sys = GenericMessage::new(GenericRole::System, "You are a helpful bot.");
    /// assert_eq!(sys.role.to_string(), "system");
    /// ```
    pub fn new(role: GenericRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(GenericRole::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(GenericRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(GenericRole::Assistant, content)
    }
}

/// Chat roles recognised by completions APIs.
///
/// The `Display` implementation renders the canonical lowercase name.
#[derive(Debug, Clone, Serialize, Deserialize, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GenericRole {
    /// “System” messages define global behaviour and style guidelines.
    System,
    /// Messages produced by the assistant / model.
    Assistant,
    /// Messages originating from the human user.
    User,
}

impl GenericRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            GenericRole::System => "system",
            GenericRole::Assistant => "assistant",
            GenericRole::User => "user",
        }
    }

    /// Role of the context turn at zero-based `index`: even turns are the
    /// user's, odd turns the assistant's.
    pub const fn for_turn(index: usize) -> Self {
        if index % 2 == 0 {
            GenericRole::User
        } else {
            GenericRole::Assistant
        }
    }
}

impl Display for GenericRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
