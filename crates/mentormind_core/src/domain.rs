//! crates/mentormind_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs mirror the four persisted record shapes (learner profile,
//! chat transcript, analytics bundle, pending-session marker) plus the
//! payloads exchanged with the generative-AI collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

//=========================================================================================
// Learner Profile
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Motivation {
    Career,
    Hobby,
    Exam,
    Curiosity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeLevel {
    None,
    Beginner,
    Intermediate,
    Advanced,
}

impl KnowledgeLevel {
    /// Maps a stated prior-knowledge level onto a quiz difficulty tier.
    pub fn to_difficulty(self) -> Difficulty {
        match self {
            KnowledgeLevel::None | KnowledgeLevel::Beginner => Difficulty::Beginner,
            KnowledgeLevel::Intermediate => Difficulty::Intermediate,
            KnowledgeLevel::Advanced => Difficulty::Advanced,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FormatPreference {
    Images,
    Videos,
    Audio,
    Text,
    Interactive,
    HandsOn,
}

/// Preferred length of a single study session, as collected by onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SessionLength {
    #[serde(rename = "<5min")]
    UnderFive,
    #[serde(rename = "5-15min")]
    FiveToFifteen,
    #[serde(rename = "15-30min")]
    FifteenToThirty,
    #[serde(rename = "30+min")]
    ThirtyPlus,
}

impl fmt::Display for SessionLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionLength::UnderFive => "<5min",
            SessionLength::FiveToFifteen => "5-15min",
            SessionLength::FifteenToThirty => "15-30min",
            SessionLength::ThirtyPlus => "30+min",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    Laptop,
    Desktop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ExampleType {
    RealWorld,
    Simple,
    Technical,
    Visual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum AssessmentType {
    Quizzes,
    QuickChecks,
    Projects,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackPreference {
    Instant,
    Delayed,
    Both,
}

/// The complete learner profile collected by the onboarding wizard.
///
/// Created once at onboarding completion and immutable thereafter except by
/// re-running onboarding; owned exclusively by the persistent store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub topic: String,
    pub motivation: Motivation,
    pub prior_knowledge: KnowledgeLevel,
    /// Self-reported confidence, 1-5.
    pub confidence: u8,
    pub format_preferences: Vec<FormatPreference>,
    pub session_length: SessionLength,
    /// Intended study days per week.
    pub study_frequency: u32,
    pub device: DeviceType,
    pub accessibility: Vec<String>,
    pub example_types: Vec<ExampleType>,
    pub wants_references: bool,
    pub assessment_pref: Vec<AssessmentType>,
    pub feedback_pref: FeedbackPreference,
    pub consent: bool,
}

//=========================================================================================
// Chat Transcript
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// One turn of the tutoring conversation. The transcript is an append-only
/// ordered sequence, replaced wholesale in the store on each append.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

//=========================================================================================
// Sessions and Assessment Records
//=========================================================================================

/// The "current session" marker written at session start. At most one exists
/// per learner; starting a new session overwrites it unconditionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingSession {
    pub start_time: DateTime<Utc>,
    pub topic: String,
    pub confidence_before: u8,
    pub messages_count: u32,
}

/// A completed learning session, as folded into the analytics bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningSession {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Whole seconds between start and end (floor).
    pub duration: i64,
    pub topic: String,
    pub messages_count: u32,
    pub confidence_before: u8,
    pub confidence_after: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        };
        f.write_str(s)
    }
}

/// Outcome of one completed quiz. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub topic: String,
    /// Percentage score, 0-100.
    pub score: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub timestamp: DateTime<Utc>,
    pub difficulty: Difficulty,
}

/// One confidence reading, appended at the end of each session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceSample {
    pub timestamp: DateTime<Utc>,
    /// Confidence level, 1-5.
    pub level: u8,
    pub topic: String,
}

//=========================================================================================
// Analytics Bundle (aggregate root)
//=========================================================================================

/// The durable aggregate of all sessions, quiz results and confidence samples
/// for one learner. Mutated only through append operations; deleted only by
/// the explicit full-reset operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsBundle {
    pub sessions: Vec<LearningSession>,
    pub quiz_results: Vec<QuizResult>,
    /// Distinct topics studied, in first-occurrence order.
    pub topics_studied: Vec<String>,
    /// Running total of session time, in seconds.
    pub total_time_spent: i64,
    pub confidence_levels: Vec<ConfidenceSample>,
    pub last_active: DateTime<Utc>,
}

impl AnalyticsBundle {
    /// The zero-valued bundle returned when no record has been persisted yet.
    pub fn empty(now: DateTime<Utc>) -> Self {
        Self {
            sessions: Vec::new(),
            quiz_results: Vec::new(),
            topics_studied: Vec::new(),
            total_time_spent: 0,
            confidence_levels: Vec::new(),
            last_active: now,
        }
    }

    /// Inserts a topic into the studied set. Set semantics: no duplicates,
    /// insertion order of first occurrence preserved.
    pub fn record_topic(&mut self, topic: &str) {
        if !self.topics_studied.iter().any(|t| t == topic) {
            self.topics_studied.push(topic.to_string());
        }
    }
}

//=========================================================================================
// Quiz Generation Payloads
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionLabel {
    A,
    B,
    C,
    D,
}

impl fmt::Display for OptionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OptionLabel::A => "A",
            OptionLabel::B => "B",
            OptionLabel::C => "C",
            OptionLabel::D => "D",
        };
        f.write_str(s)
    }
}

/// The four labeled answer options of one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizOptions {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: u32,
    pub question: String,
    pub options: QuizOptions,
    pub correct_answer: OptionLabel,
    pub explanation: String,
}

/// A generated multiple-choice assessment, parsed from the model's JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub quiz_title: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuizQuestion>,
}

/// Parameters for one quiz-generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSpec {
    pub topic: String,
    pub difficulty: Difficulty,
    pub question_count: u8,
    pub language: Language,
    /// Self-reported confidence to calibrate question tone, if known.
    pub confidence: Option<u8>,
}

//=========================================================================================
// Tutoring and Diagram Payloads
//=========================================================================================

/// Response language of the tutoring gateway. The application is bilingual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Urdu,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Language::English => "english",
            Language::Urdu => "urdu",
        };
        f.write_str(s)
    }
}

/// Shape of educational diagram to request from the diagram generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramKind {
    Flowchart,
    Mindmap,
    Comparison,
    Process,
    Chart,
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagramKind::Flowchart => "flowchart",
            DiagramKind::Mindmap => "mindmap",
            DiagramKind::Comparison => "comparison",
            DiagramKind::Process => "process",
            DiagramKind::Chart => "chart",
        };
        f.write_str(s)
    }
}
