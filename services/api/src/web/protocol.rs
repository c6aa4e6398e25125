//! services/api/src/web/protocol.rs
//!
//! Defines the JSON request payloads exchanged between the browser client
//! and the API server. Response bodies largely reuse the core domain types;
//! the few service-owned response shapes live here too.

use mentormind_core::analytics::TimeWindow;
use mentormind_core::domain::{Difficulty, Language};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// Chat
//=========================================================================================

/// One learner message for the tutoring gateway.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    /// Response language; defaults to english.
    #[schema(value_type = Option<String>, example = "english")]
    pub language: Option<Language>,
    /// Forces diagram generation regardless of profile preferences.
    #[serde(default)]
    pub request_image: bool,
}

/// The tutoring reply, with an optional generated visual aid.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

//=========================================================================================
// Sessions
//=========================================================================================

/// Starts (or restarts) the learner's current session. Omitted fields fall
/// back to the stored profile.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    pub topic: Option<String>,
    pub confidence_before: Option<u8>,
}

/// Ends the learner's current session. An omitted confidence reading falls
/// back to the stored profile.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionRequest {
    pub confidence_after: Option<u8>,
}

//=========================================================================================
// Quizzes
//=========================================================================================

/// Parameters for quiz generation. Omitted fields fall back to the stored
/// profile (topic, difficulty from prior knowledge) or to defaults.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuizRequest {
    pub topic: Option<String>,
    #[schema(value_type = Option<String>, example = "beginner")]
    pub difficulty: Option<Difficulty>,
    pub question_count: Option<u8>,
    #[schema(value_type = Option<String>, example = "english")]
    pub language: Option<Language>,
}

/// A completed quiz to record into the analytics bundle. The server assigns
/// the timestamp.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizResultRequest {
    pub topic: String,
    /// Percentage score, 0-100.
    pub score: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
    #[schema(value_type = Option<String>, example = "beginner")]
    pub difficulty: Option<Difficulty>,
}

//=========================================================================================
// Analytics
//=========================================================================================

/// Query parameters of the analytics endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyticsQuery {
    /// Time window to aggregate over: week, month or all. Defaults to week.
    #[param(value_type = Option<String>, example = "week")]
    pub window: Option<TimeWindow>,
}
