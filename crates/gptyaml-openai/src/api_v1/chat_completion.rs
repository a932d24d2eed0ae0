use gptyaml_core::generic::{GenericMessage, GenericRole};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Body of a chat completions request.
///
/// Key names are part of the wire contract: `model`, `messages`, `top_p`,
/// `temperature`, `choices`.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
    pub top_p: f64,
    pub temperature: f64,
    pub choices: u64,
}

impl ChatCompletionRequest {
    pub fn new(model: String, messages: Vec<ChatCompletionMessage>) -> Self {
        Self {
            model,
            messages,
            top_p: 1.0,
            temperature: 1.0,
            choices: 1,
        }
    }

    pub fn top_p(mut self, top_p: f64) -> Self {
        self.top_p = top_p;
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn choices(mut self, choices: u64) -> Self {
        self.choices = choices;
        self
    }
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    System,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::System => "system",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// How a single message is laid out on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageShape {
    /// `{"role": "user", "content": "hi"}`
    #[default]
    Tagged,
    /// `{"user": "hi"}`. Older gptyaml releases rendered context turns
    /// this way; the chat completions API does not accept it.
    RoleKeyed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatCompletionMessage {
    pub role: MessageRole,
    pub content: String,
    pub shape: MessageShape,
}

impl ChatCompletionMessage {
    pub fn with_shape(mut self, shape: MessageShape) -> Self {
        self.shape = shape;
        self
    }
}

impl Serialize for ChatCompletionMessage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.shape {
            MessageShape::Tagged => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("role", &self.role)?;
                map.serialize_entry("content", &self.content)?;
                map.end()
            }
            MessageShape::RoleKeyed => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(self.role.as_str(), &self.content)?;
                map.end()
            }
        }
    }
}

impl From<GenericRole> for MessageRole {
    fn from(value: GenericRole) -> Self {
        match value {
            GenericRole::System => MessageRole::System,
            GenericRole::Assistant => MessageRole::Assistant,
            GenericRole::User => MessageRole::User,
        }
    }
}

impl From<GenericMessage> for ChatCompletionMessage {
    fn from(value: GenericMessage) -> Self {
        Self {
            role: value.role.into(),
            content: value.content,
            shape: MessageShape::Tagged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tagged_and_role_keyed_layouts() {
        let hello: ChatCompletionMessage = GenericMessage::assistant("hello").into();
        assert_eq!(
            serde_json::to_value(&hello).unwrap(),
            json!({"role": "assistant", "content": "hello"})
        );

        let legacy = hello.with_shape(MessageShape::RoleKeyed);
        assert_eq!(
            serde_json::to_value(&legacy).unwrap(),
            json!({"assistant": "hello"})
        );
    }

    #[test]
    fn request_uses_wire_key_names() {
        let request = ChatCompletionRequest::new(
            "gpt-4".into(),
            vec![GenericMessage::user("bye").into()],
        )
        .temperature(0.5)
        .top_p(0.9)
        .choices(2);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4",
                "messages": [{"role": "user", "content": "bye"}],
                "top_p": 0.9,
                "temperature": 0.5,
                "choices": 2
            })
        );
    }
}
