//! crates/mentormind_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{DiagramKind, Language, Quiz, QuizSpec, UserProfile};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Backing store unavailable: {0}")]
    Unavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Persistent Store Port
//=========================================================================================

/// The four fixed record kinds held by the persistent store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Profile,
    ChatHistory,
    Analytics,
    PendingSession,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Profile,
        RecordKind::ChatHistory,
        RecordKind::Analytics,
        RecordKind::PendingSession,
    ];

    /// The stable storage key for this record kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Profile => "profile",
            RecordKind::ChatHistory => "chat_history",
            RecordKind::Analytics => "analytics",
            RecordKind::PendingSession => "pending_session",
        }
    }
}

/// Durable key-value storage for the four per-learner records.
///
/// Reads and writes are whole-record: callers read the entire record, mutate
/// a copy, and write the entire record back; there are no partial-field
/// patches. Every operation is scoped by the learner's id; one id corresponds
/// to one browser profile of the original client-side store.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Returns the stored record, or `None` if absent. Absence is not a failure.
    async fn get(&self, user_id: Uuid, kind: RecordKind) -> PortResult<Option<serde_json::Value>>;

    /// Replaces the stored record wholesale.
    async fn set(&self, user_id: Uuid, kind: RecordKind, record: serde_json::Value)
        -> PortResult<()>;

    /// Removes one record. Clearing an absent record is a no-op.
    async fn clear(&self, user_id: Uuid, kind: RecordKind) -> PortResult<()>;

    /// Removes all four records for the learner, atomically from the
    /// caller's perspective.
    async fn clear_all(&self, user_id: Uuid) -> PortResult<()>;
}

//=========================================================================================
// Generative-AI Collaborator Ports
//=========================================================================================

#[async_trait]
pub trait TutoringService: Send + Sync {
    /// Produces a tutoring reply to one learner message, personalized by the
    /// learner profile and rendered in the requested language.
    async fn tutor_reply(
        &self,
        message: &str,
        profile: &UserProfile,
        language: Language,
    ) -> PortResult<String>;
}

#[async_trait]
pub trait QuizGenerationService: Send + Sync {
    /// Generates a multiple-choice quiz for the given topic and difficulty.
    async fn generate_quiz(&self, spec: &QuizSpec) -> PortResult<Quiz>;
}

#[async_trait]
pub trait DiagramService: Send + Sync {
    /// Generates an educational diagram for a concept and returns it as a
    /// self-contained image data URL.
    async fn generate_diagram(
        &self,
        topic: &str,
        concept: &str,
        kind: DiagramKind,
    ) -> PortResult<String>;
}
