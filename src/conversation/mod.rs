//! In-memory conversation store for a single chat session.
//!
//! Messages are append-only; the only bulk mutation is a personality switch,
//! which clears the log and reseeds it with the new personality's welcome
//! message. The store never observes an empty log after construction.

use crate::personality::Personality;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One transcript entry. Immutable once created; the id exists for UI
/// correlation only.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub id: Uuid,
    pub content: String,
    pub is_user: bool,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(content: impl Into<String>, is_user: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            is_user,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug)]
pub struct ConversationState {
    messages: Vec<Message>,
    personality: Personality,
    /// Soft cross-turn context; not reset on personality switch.
    last_user_query: Option<String>,
    last_ai_response: Option<String>,
    location_provided: bool,
}

impl ConversationState {
    pub fn new(personality: Personality) -> Self {
        Self {
            messages: vec![Message::new(personality.welcome_message(), false)],
            personality,
            last_user_query: None,
            last_ai_response: None,
            location_provided: false,
        }
    }

    /// Append a user message. Empty text is the caller's error; callers must
    /// reject empty input before reaching the store.
    pub fn append_user(&mut self, text: impl Into<String>) -> &Message {
        let text = text.into();
        debug_assert!(!text.trim().is_empty());
        self.last_user_query = Some(text.clone());
        self.messages.push(Message::new(text, true));
        self.messages.last().expect("just pushed")
    }

    /// Append an assistant message. Emitting an assistant message is the
    /// trigger point for speech playback, which the orchestrator owns.
    pub fn append_assistant(&mut self, text: impl Into<String>) -> &Message {
        let text = text.into();
        self.last_ai_response = Some(text.clone());
        self.messages.push(Message::new(text, false));
        self.messages.last().expect("just pushed")
    }

    /// Clear the transcript and reseed with the new personality's welcome
    /// message. The caller must signal the speech collaborator to stop any
    /// in-flight utterance.
    pub fn switch_personality(&mut self, personality: Personality) {
        self.personality = personality;
        self.messages.clear();
        self.messages
            .push(Message::new(personality.welcome_message(), false));
    }

    pub fn personality(&self) -> Personality {
        self.personality
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_user_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_user)
    }

    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| !m.is_user)
    }

    pub fn last_user_query(&self) -> Option<&str> {
        self.last_user_query.as_deref()
    }

    pub fn last_ai_response(&self) -> Option<&str> {
        self.last_ai_response.as_deref()
    }

    pub fn location_provided(&self) -> bool {
        self.location_provided
    }

    pub fn set_location_provided(&mut self, provided: bool) {
        self.location_provided = provided;
    }
}
