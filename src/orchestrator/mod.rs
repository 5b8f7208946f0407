//! Slot-filling orchestration core
//!
//! This module owns the per-conversation state machine: endpoint matching,
//! parameter extraction, correction merging, validation, entity-name
//! resolution, missing-parameter detection, and the turn engine tying them
//! together.

pub mod corrections;
pub mod engine;
pub mod extractor;
pub mod matcher;
pub mod missing;
pub mod resolver;
pub mod session;
pub mod validator;

pub use engine::{OrchestrationEngine, TurnOutcome};
pub use matcher::match_endpoint;
pub use missing::find_missing_params;
pub use resolver::EntityResolution;
pub use session::{ConversationState, Message, SessionStore};
