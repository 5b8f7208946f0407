//! Per-conversation state and the keyed session store

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One chat turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Mutable per-session record, owned by the orchestration engine for the
/// lifetime of one conversation
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    /// Name of the currently matched endpoint (a lookup key, not ownership)
    pub current_endpoint: Option<String>,
    /// Accumulated slot values; keys are restricted to the current endpoint's
    /// declared parameter names
    pub params: HashMap<String, String>,
    /// Conversation transcript, append-only until reset
    pub history: Vec<Message>,
}

/// Keyed store of conversation states.
///
/// Every session is held behind its own mutex so turns for one session id are
/// strictly serialized while distinct sessions proceed concurrently. Completed
/// sessions are removed and are not resumable; idle sessions have no expiry.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<String, Arc<Mutex<ConversationState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the state for a session id, creating it on first use
    pub fn get_or_create(&self, session_id: &str) -> Arc<Mutex<ConversationState>> {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(ConversationState::default())))
            .clone()
    }

    /// Discard a session after a completed endpoint call
    pub fn remove(&self, session_id: &str) {
        self.sessions.remove(session_id);
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
