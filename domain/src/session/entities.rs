//! Session domain entities

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A message in a conversation (Entity)
///
/// Assistant messages may carry the tool calls the model requested; tool
/// messages carry the id of the call they answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    /// Assistant message recording the tool calls the model asked for.
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::with_role(Role::Assistant, "")
        }
    }

    /// Tool message answering `call`.
    pub fn tool(call: &ToolCall, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(call.id.clone()),
            ..Self::with_role(Role::Tool, content)
        }
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Ordered list of messages sent to the model (Entity)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(mut self, message: Message) -> Self {
        self.push(message);
        self
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn system_message(&self) -> Option<&Message> {
        self.messages.iter().find(|m| m.is_system())
    }

    /// Replace the system message, or insert one at the front.
    pub fn set_system_prompt(&mut self, content: impl Into<String>) {
        let content = content.into();
        match self.messages.iter_mut().find(|m| m.is_system()) {
            Some(message) => message.content = content,
            None => self.messages.insert(0, Message::system(content)),
        }
    }
}

impl From<Vec<Message>> for Conversation {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

impl FromIterator<Message> for Conversation {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_message_links_call() {
        let call = ToolCall::new("call_9", "clock");
        let message = Message::tool(&call, "12:00");

        assert_eq!(message.role, Role::Tool);
        assert_eq!(message.tool_call_id.as_deref(), Some("call_9"));
        assert_eq!(message.content, "12:00");
    }

    #[test]
    fn test_assistant_tool_calls_message() {
        let message = Message::assistant_tool_calls(vec![ToolCall::new("a", "clock")]);
        assert_eq!(message.role, Role::Assistant);
        assert!(message.has_tool_calls());
        assert!(message.content.is_empty());
    }

    #[test]
    fn test_set_system_prompt_replaces_existing() {
        let mut conversation = Conversation::from(vec![
            Message::user("hi"),
            Message::system("old"),
        ]);
        conversation.set_system_prompt("new");

        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.system_message().unwrap().content, "new");
        assert_eq!(conversation.messages()[0].role, Role::User);
    }

    #[test]
    fn test_set_system_prompt_inserts_at_front() {
        let mut conversation = Conversation::new().with_message(Message::user("hi"));
        conversation.set_system_prompt("be brief");

        assert_eq!(conversation.messages()[0].content, "be brief");
        assert!(conversation.messages()[0].is_system());
        assert_eq!(conversation.last().unwrap().content, "hi");
    }

    #[test]
    fn test_serialization_skips_empty_tool_fields() {
        let value = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(value, serde_json::json!({"role": "user", "content": "hi"}));
    }
}
