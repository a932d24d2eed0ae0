//! Conversion of prompt pieces into chat messages.
//!
//! [`IntoPrompt`] is the only abstraction the transcript builder relies on:
//! every fragment (a system instruction, a block of prior turns, the final
//! user message) turns itself into zero or more messages, and the chain
//! concatenates them in order.
//!
//! ```rust
//! use gptyaml_core::generic::GenericMessage;
//! use gptyaml_core::template::IntoPrompt;
//!
//! let missing: Option<GenericMessage> = None;
//! assert!(missing.into_prompt().is_empty());
//!
//! let turns = vec![GenericMessage::user("hi"), GenericMessage::assistant("hello")];
//! assert_eq!(turns.into_prompt().len(), 2);
//! ```

use crate::generic::GenericMessage;

/// Converts a value into a series of chat messages.
///
/// The `Message` type is associated so a renderer can require its own
/// richer struct without resorting to dynamic dispatch.
pub trait IntoPrompt {
    /// Chat message representation emitted by the prompt.
    type Message: Send + Sync + 'static;

    /// Consume `self` and return **all** messages in the desired order.
    fn into_prompt(self) -> Vec<Self::Message>;
}

/// A single [`GenericMessage`] is a prompt of length one.
impl IntoPrompt for GenericMessage {
    type Message = GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        vec![self]
    }
}

/// Already assembled messages pass through unchanged.
impl IntoPrompt for Vec<GenericMessage> {
    type Message = GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        self
    }
}

/// Optional pieces contribute nothing when absent.
impl<P: IntoPrompt> IntoPrompt for Option<P> {
    type Message = P::Message;

    fn into_prompt(self) -> Vec<Self::Message> {
        self.map(IntoPrompt::into_prompt).unwrap_or_default()
    }
}
