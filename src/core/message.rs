use serde::{Deserialize, Serialize};

use crate::api::ChatMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == Role::User
    }

    pub fn is_assistant(self) -> bool {
        self == Role::Assistant
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Role {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            _ => Err(format!("invalid message role: {value}")),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn to_api(&self) -> ChatMessage {
        ChatMessage {
            role: self.role.as_str().to_string(),
            content: self.content.clone(),
        }
    }
}

/// Ordered, memory-resident chat transcript.
///
/// Messages are appended in conversation order and replayed verbatim on
/// every exchange. At most one assistant message is open for streaming
/// updates; [`Conversation::seal`] closes it.
#[derive(Debug, Default, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    open_assistant: Option<usize>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a user message and return its position for a later
    /// compensating [`Conversation::remove_at`].
    pub fn push_user(&mut self, content: impl Into<String>) -> usize {
        self.seal();
        self.messages.push(Message::user(content));
        self.messages.len() - 1
    }

    /// Remove the message at `index`, returning it when it exists.
    pub fn remove_at(&mut self, index: usize) -> Option<Message> {
        if index >= self.messages.len() {
            return None;
        }
        match self.open_assistant {
            Some(open) if open == index => self.open_assistant = None,
            Some(open) if open > index => self.open_assistant = Some(open - 1),
            _ => {}
        }
        Some(self.messages.remove(index))
    }

    /// Replace the content of the in-progress assistant message, opening
    /// one at the end of the transcript if none is open.
    pub fn upsert_assistant(&mut self, content: &str) {
        match self.open_assistant {
            Some(index) => {
                if let Some(message) = self.messages.get_mut(index) {
                    message.content.clear();
                    message.content.push_str(content);
                }
            }
            None => {
                self.messages.push(Message::assistant(content));
                self.open_assistant = Some(self.messages.len() - 1);
            }
        }
    }

    pub fn has_open_assistant(&self) -> bool {
        self.open_assistant.is_some()
    }

    pub fn seal(&mut self) {
        self.open_assistant = None;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.open_assistant = None;
    }

    pub fn to_api_messages(&self) -> Vec<ChatMessage> {
        self.messages.iter().map(Message::to_api).collect()
    }
}
