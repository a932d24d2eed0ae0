//! Ordered, role-tagged view of a validated prompt.
//!
//! The transcript is always:
//!
//! 1. the system instruction, if any,
//! 2. the context turns in file order, alternating user / assistant,
//! 3. exactly one final user message.
//!
//! The three segments stay separate so renderers can treat context turns
//! differently (see `MessageShape` in `gptyaml-openai`). Flattening through
//! [`IntoPrompt`] yields uniform `{role, content}` messages.

use gptyaml_core::{
    generic::{GenericMessage, GenericRole},
    template::IntoPrompt,
};

use crate::{
    config::PromptSpec,
    fragments::{ContextFragment, StaticFragment},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    system: Option<GenericMessage>,
    context: Vec<GenericMessage>,
    message: GenericMessage,
}

impl Transcript {
    pub fn from_prompt(prompt: &PromptSpec) -> Self {
        let transcript = Self {
            system: prompt
                .system()
                .map(|system| StaticFragment::new(system, GenericRole::System).into_message()),
            context: ContextFragment::new(prompt.context()).into_prompt(),
            message: StaticFragment::new(prompt.message(), GenericRole::User).into_message(),
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(messages = transcript.len(), "built transcript");

        transcript
    }

    pub fn system(&self) -> Option<&GenericMessage> {
        self.system.as_ref()
    }

    pub fn context(&self) -> &[GenericMessage] {
        &self.context
    }

    /// The final user message.
    pub fn message(&self) -> &GenericMessage {
        &self.message
    }

    /// Number of messages; at least one.
    pub fn len(&self) -> usize {
        usize::from(self.system.is_some()) + self.context.len() + 1
    }

    /// Always `false`: the final message is mandatory.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl IntoPrompt for Transcript {
    type Message = GenericMessage;

    fn into_prompt(self) -> Vec<Self::Message> {
        let mut messages = self.system.into_prompt();
        messages.extend(self.context);
        messages.push(self.message);
        messages
    }
}
