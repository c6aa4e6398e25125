pub mod analytics;
pub mod domain;
pub mod memory;
pub mod ports;
pub mod session;
pub mod store;

pub use analytics::{compute_analytics, AnalyticsReport, LearningPace, TimeWindow};
pub use domain::{
    AnalyticsBundle, ChatMessage, ConfidenceSample, DiagramKind, Difficulty, Language,
    LearningSession, PendingSession, Quiz, QuizQuestion, QuizResult, QuizSpec, Sender, UserProfile,
};
pub use memory::MemoryStore;
pub use ports::{
    DiagramService, PortError, PortResult, QuizGenerationService, RecordKind, StateStore,
    TutoringService,
};
pub use session::SessionTracker;
pub use store::UserStore;
