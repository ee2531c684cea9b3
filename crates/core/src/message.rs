//! Message and Conversation domain types.
//!
//! These are the core value objects that flow through the entire system:
//! the user submits a message → the turn controller gathers context →
//! the generator produces a reply → both land in the conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The role of a message sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
}

/// A single message in a conversation.
///
/// Immutable once created; the only transcript mutation the controller
/// performs is removing an in-progress status message via
/// [`Conversation::retract_last_if`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: Role,

    /// The text content (caption, for image messages)
    pub text: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,

    /// Attached image bytes, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
}

impl Message {
    /// Create a new user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            text: text.into(),
            timestamp: Utc::now(),
            image: None,
        }
    }

    /// Create a new assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role: Role::Assistant,
            text: text.into(),
            timestamp: Utc::now(),
            image: None,
        }
    }

    /// Create a user message carrying an image and an optional caption.
    pub fn user_image(image: Vec<u8>, caption: impl Into<String>) -> Self {
        Self {
            image: Some(image),
            ..Self::user(caption)
        }
    }

    /// Create an assistant message carrying an image and an optional caption.
    pub fn assistant_image(image: Vec<u8>, caption: impl Into<String>) -> Self {
        Self {
            image: Some(image),
            ..Self::assistant(caption)
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// The live transcript: an ordered sequence of messages.
///
/// Exactly one conversation is current at a time; archiving moves its
/// messages into a read-only [`crate::Thread`] and resets it to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conversation {
    /// Ordered messages
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Create a new empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message to the transcript.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Clear the transcript (archive-and-reset path).
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Remove the last message only if its text matches `text`.
    ///
    /// Used to retract an interim status message once the operation it
    /// announced has completed. Returns whether a message was removed.
    pub fn retract_last_if(&mut self, text: &str) -> bool {
        if self.messages.last().is_some_and(|m| m.text == text) {
            self.messages.pop();
            true
        } else {
            false
        }
    }

    /// The last `n` messages, oldest first.
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_user_message() {
        let msg = Message::user("Hello!");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text, "Hello!");
        assert!(!msg.has_image());
    }

    #[test]
    fn image_message_carries_caption() {
        let msg = Message::user_image(vec![1, 2, 3], "holiday photo");
        assert!(msg.has_image());
        assert_eq!(msg.text, "holiday photo");
        assert!(msg.is_user());
    }

    #[test]
    fn message_serialization_roundtrip() {
        let msg = Message::assistant("Test message");
        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.text, "Test message");
        assert_eq!(deserialized.role, Role::Assistant);
    }

    #[test]
    fn retract_only_matching_tail() {
        let mut conv = Conversation::new();
        conv.push(Message::user("question"));
        conv.push(Message::assistant("searching..."));

        assert!(!conv.retract_last_if("something else"));
        assert_eq!(conv.len(), 2);

        assert!(conv.retract_last_if("searching..."));
        assert_eq!(conv.len(), 1);
    }

    #[test]
    fn recent_window_is_bounded() {
        let mut conv = Conversation::new();
        for i in 0..10 {
            conv.push(Message::user(format!("msg {i}")));
        }
        let recent = conv.recent(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].text, "msg 7");
        assert_eq!(recent[2].text, "msg 9");

        assert_eq!(conv.recent(50).len(), 10);
    }
}
