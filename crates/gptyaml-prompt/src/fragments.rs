//! Prompt fragments: small values that turn themselves into messages.
//!
//! * [`StaticFragment`] – one borrowed string bundled with a role. Used for
//!   the system instruction and the final user message.
//! * [`ContextFragment`] – prior turns whose role alternates by position,
//!   starting with the user.
//!
//! ```rust
//! use gptyaml_core::{generic::GenericRole, template::IntoPrompt};
//! use gptyaml_prompt::fragments::ContextFragment;
//!
//! let turns = ["hi".to_owned(), "hello".to_owned(), "how are you?".to_owned()];
//! let roles: Vec<_> = ContextFragment::new(&turns)
//!     .into_prompt()
//!     .into_iter()
//!     .map(|m| m.role)
//!     .collect();
//!
//! assert_eq!(roles, [GenericRole::User, GenericRole::Assistant, GenericRole::User]);
//! ```

use gptyaml_core::{
    generic::{GenericMessage, GenericRole},
    template::IntoPrompt,
};

/// A borrowed string bundled with a chat role.
#[derive(Debug, Clone, Copy)]
pub struct StaticFragment<'a>((&'a str, GenericRole));

/// Defaults to **system**, the most common static fragment.
impl<'a> From<&'a str> for StaticFragment<'a> {
    fn from(value: &'a str) -> Self {
        Self((value, GenericRole::System))
    }
}

impl<'a> StaticFragment<'a> {
    /// Create a new fragment with explicit role.
    pub fn new(value: &'a str, role: GenericRole) -> Self {
        Self((value, role))
    }

    pub fn into_message(self) -> GenericMessage {
        GenericMessage::new(self.0.1, self.0.0)
    }
}

impl IntoPrompt for StaticFragment<'_> {
    type Message = GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        vec![self.into_message()]
    }
}

/// Prior conversation turns. Turn `i` is the user's when `i` is even and the
/// assistant's when `i` is odd.
#[derive(Debug, Clone, Copy)]
pub struct ContextFragment<'a>(&'a [String]);

impl<'a> ContextFragment<'a> {
    pub fn new(turns: &'a [String]) -> Self {
        Self(turns)
    }
}

impl IntoPrompt for ContextFragment<'_> {
    type Message = GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, turn)| GenericMessage::new(GenericRole::for_turn(i), turn.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_fragment_defaults_to_system() {
        let message = StaticFragment::from("Be brief.").into_message();
        assert_eq!(message, GenericMessage::system("Be brief."));
    }

    #[test]
    fn empty_context_contributes_nothing() {
        assert!(ContextFragment::new(&[]).into_prompt().is_empty());
    }
}
