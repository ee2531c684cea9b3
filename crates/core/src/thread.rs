//! Archived conversation threads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::message::Message;

/// A read-only record of a past conversation.
///
/// Created by the turn controller's archive-and-reset operation; never
/// mutated afterwards. History is append-only from the controller's
/// perspective (only archive and explicit deletion touch it).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    /// Unique thread ID
    pub id: String,

    /// Short synthesized title (single line, at most 60 characters)
    pub title: String,

    /// When this thread was archived
    pub created_at: DateTime<Utc>,

    /// The archived transcript
    pub messages: Vec<Message>,
}

impl Thread {
    /// Create a thread from an archived transcript.
    pub fn new(title: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            created_at: Utc::now(),
            messages,
        }
    }
}
