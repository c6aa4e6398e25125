//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::{
    AnalyticsQuery, ChatRequest, ChatResponse, EndSessionRequest, GenerateQuizRequest,
    QuizResultRequest, StartSessionRequest,
};
use crate::web::state::AppState;
use crate::adapters::diagram_llm::smart_diagram_kind;
use crate::adapters::tutor_llm::classify_message;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use mentormind_core::analytics::{compute_analytics, TimeWindow};
use mentormind_core::domain::{
    ChatMessage, Difficulty, FormatPreference, Language, QuizResult, QuizSpec, Sender, UserProfile,
};
use mentormind_core::store::UserStore;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::OpenApi;
use uuid::Uuid;

/// The AI turn appended to the transcript when the tutoring gateway fails.
const RETRY_MESSAGE: &str = "Request failed. Please try again!";
/// The error body returned when the tutoring gateway fails.
const GATEWAY_UNAVAILABLE: &str = "Service temporarily unavailable. Please try again.";
/// The error body returned for learners who have not completed onboarding.
const ONBOARDING_REQUIRED: &str = "Complete onboarding first";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        get_profile_handler,
        put_profile_handler,
        chat_handler,
        get_chat_history_handler,
        delete_chat_history_handler,
        start_session_handler,
        end_session_handler,
        generate_quiz_handler,
        record_quiz_result_handler,
        analytics_handler,
        reset_handler,
        export_handler,
    ),
    components(schemas(
        ChatRequest,
        ChatResponse,
        StartSessionRequest,
        EndSessionRequest,
        GenerateQuizRequest,
        QuizResultRequest,
    )),
    tags(
        (name = "MentorMind API", description = "API endpoints for the bilingual AI tutoring application.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Helpers
//=========================================================================================

/// Reads a profile, treating a store failure as absence (the store is
/// best-effort; its failures are never surfaced to the learner).
async fn load_profile(store: &UserStore) -> Option<UserProfile> {
    match store.profile().await {
        Ok(profile) => profile,
        Err(e) => {
            warn!("profile read failed, treating as absent: {e}");
            None
        }
    }
}

/// Persists the transcript, downgrading a store failure to a warning.
async fn save_history(store: &UserStore, messages: &[ChatMessage]) {
    if let Err(e) = store.save_chat_history(messages).await {
        warn!("failed to persist chat history: {e}");
    }
}

//=========================================================================================
// Profile Handlers
//=========================================================================================

/// Fetch the stored learner profile.
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "The stored learner profile"),
        (status = 404, description = "No profile has been stored yet")
    ),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the learner."))
)]
pub async fn get_profile_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let store = app_state.user_store(user_id);
    match load_profile(&store).await {
        Some(profile) => Ok(Json(profile)),
        None => Err((StatusCode::NOT_FOUND, "No profile found".to_string())),
    }
}

/// Store the learner profile produced by the onboarding wizard.
#[utoipa::path(
    put,
    path = "/profile",
    responses((status = 204, description = "Profile stored")),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the learner."))
)]
pub async fn put_profile_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(profile): Json<UserProfile>,
) -> StatusCode {
    let store = app_state.user_store(user_id);
    if let Err(e) = store.save_profile(&profile).await {
        warn!("failed to persist profile: {e}");
    }
    StatusCode::NO_CONTENT
}

//=========================================================================================
// Chat Handlers
//=========================================================================================

/// Send one learner message to the tutor and append the exchange to the
/// transcript.
///
/// For learners who prefer images, explanation-type messages also produce an
/// AI-generated diagram; `requestImage` forces one.
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Tutoring reply", body = ChatResponse),
        (status = 400, description = "Onboarding has not been completed"),
        (status = 500, description = "The tutoring gateway failed")
    ),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the learner."))
)]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let store = app_state.user_store(user_id);
    let Some(profile) = load_profile(&store).await else {
        return Err((StatusCode::BAD_REQUEST, ONBOARDING_REQUIRED.to_string()));
    };
    let language = payload.language.unwrap_or(Language::English);

    // Append the learner's turn and count it toward the current session.
    let mut history = store.chat_history().await.unwrap_or_else(|e| {
        warn!("chat history read failed, treating as empty: {e}");
        Vec::new()
    });
    history.push(ChatMessage {
        sender: Sender::User,
        text: payload.message.clone(),
        timestamp: Utc::now(),
        image_url: None,
    });
    save_history(&store, &history).await;
    if let Err(e) = app_state.tracker(user_id).increment_message_count().await {
        warn!("failed to count session message: {e}");
    }

    let reply = app_state
        .tutor_adapter
        .tutor_reply(&payload.message, &profile, language)
        .await;

    let mut reply = match reply {
        Ok(reply) => reply,
        Err(e) => {
            error!("Tutoring gateway failed: {e}");
            history.push(ChatMessage {
                sender: Sender::Ai,
                text: RETRY_MESSAGE.to_string(),
                timestamp: Utc::now(),
                image_url: None,
            });
            save_history(&store, &history).await;
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                GATEWAY_UNAVAILABLE.to_string(),
            ));
        }
    };

    // Auto-generate a visual aid for image-preferring learners on
    // explanation requests. Diagram failures never fail the chat.
    let message_kind = classify_message(&payload.message);
    let prefers_images = profile
        .format_preferences
        .contains(&FormatPreference::Images);
    let mut image_url = None;
    if payload.request_image || (prefers_images && message_kind.is_explanation()) {
        let concept: String = payload.message.chars().take(100).collect();
        let kind = smart_diagram_kind(&payload.message);
        match app_state
            .diagram_adapter
            .generate_diagram(&profile.topic, &concept, kind)
            .await
        {
            Ok(url) => {
                image_url = Some(url);
                reply.push_str(&format!(
                    "\n\n---\n\n🖼️ **AI-Generated Visual Learning Aid:** An educational {kind} diagram has been generated using AI to help you visualize these concepts."
                ));
            }
            Err(e) => warn!("Diagram generation failed: {e}"),
        }
    }

    history.push(ChatMessage {
        sender: Sender::Ai,
        text: reply.clone(),
        timestamp: Utc::now(),
        image_url: image_url.clone(),
    });
    save_history(&store, &history).await;

    Ok(Json(ChatResponse { reply, image_url }))
}

/// Fetch the stored chat transcript.
#[utoipa::path(
    get,
    path = "/chat/history",
    responses((status = 200, description = "The chat transcript, oldest first")),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the learner."))
)]
pub async fn get_chat_history_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Json<Vec<ChatMessage>> {
    let store = app_state.user_store(user_id);
    let history = store.chat_history().await.unwrap_or_else(|e| {
        warn!("chat history read failed, treating as empty: {e}");
        Vec::new()
    });
    Json(history)
}

/// Clear the stored chat transcript.
#[utoipa::path(
    delete,
    path = "/chat/history",
    responses((status = 204, description = "Transcript cleared")),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the learner."))
)]
pub async fn delete_chat_history_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> StatusCode {
    let store = app_state.user_store(user_id);
    if let Err(e) = store.clear_chat_history().await {
        warn!("failed to clear chat history: {e}");
    }
    StatusCode::NO_CONTENT
}

//=========================================================================================
// Session Handlers
//=========================================================================================

/// Start the learner's current session, overwriting any pending one.
#[utoipa::path(
    post,
    path = "/sessions/start",
    request_body = StartSessionRequest,
    responses(
        (status = 204, description = "Session started"),
        (status = 400, description = "No topic provided and no profile on record")
    ),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the learner."))
)]
pub async fn start_session_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<StartSessionRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let store = app_state.user_store(user_id);
    let profile = load_profile(&store).await;

    let topic = payload
        .topic
        .or_else(|| profile.as_ref().map(|p| p.topic.clone()))
        .ok_or((
            StatusCode::BAD_REQUEST,
            "No topic provided and no profile on record".to_string(),
        ))?;
    let confidence = payload
        .confidence_before
        .or(profile.map(|p| p.confidence))
        .unwrap_or(3);

    if let Err(e) = app_state
        .tracker(user_id)
        .start_session(&topic, confidence)
        .await
    {
        warn!("failed to start session: {e}");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// End the learner's current session and fold it into the analytics bundle.
#[utoipa::path(
    post,
    path = "/sessions/end",
    request_body = EndSessionRequest,
    responses((status = 204, description = "Session ended (no-op when none is pending)")),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the learner."))
)]
pub async fn end_session_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<EndSessionRequest>,
) -> StatusCode {
    let store = app_state.user_store(user_id);
    let confidence = match payload.confidence_after {
        Some(confidence) => confidence,
        None => load_profile(&store).await.map(|p| p.confidence).unwrap_or(3),
    };

    if let Err(e) = app_state.tracker(user_id).end_session(confidence).await {
        warn!("failed to end session: {e}");
    }
    StatusCode::NO_CONTENT
}

//=========================================================================================
// Quiz Handlers
//=========================================================================================

/// Generate a multiple-choice quiz, defaulting parameters from the profile.
#[utoipa::path(
    post,
    path = "/quiz",
    request_body = GenerateQuizRequest,
    responses(
        (status = 200, description = "The generated quiz"),
        (status = 500, description = "The quiz generator failed")
    ),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the learner."))
)]
pub async fn generate_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<GenerateQuizRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let store = app_state.user_store(user_id);
    let profile = load_profile(&store).await;

    let spec = QuizSpec {
        topic: payload
            .topic
            .or_else(|| profile.as_ref().map(|p| p.topic.clone()))
            .unwrap_or_else(|| "General Knowledge".to_string()),
        difficulty: payload
            .difficulty
            .or_else(|| profile.as_ref().map(|p| p.prior_knowledge.to_difficulty()))
            .unwrap_or(Difficulty::Beginner),
        question_count: payload.question_count.unwrap_or(5),
        language: payload.language.unwrap_or(Language::English),
        confidence: profile.map(|p| p.confidence),
    };

    match app_state.quiz_adapter.generate_quiz(&spec).await {
        Ok(quiz) => Ok(Json(quiz)),
        Err(e) => {
            error!("Quiz generation failed: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate quiz. Please try again.".to_string(),
            ))
        }
    }
}

/// Record one completed quiz into the analytics bundle.
#[utoipa::path(
    post,
    path = "/quiz/results",
    request_body = QuizResultRequest,
    responses((status = 201, description = "Quiz result recorded")),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the learner."))
)]
pub async fn record_quiz_result_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(payload): Json<QuizResultRequest>,
) -> StatusCode {
    let store = app_state.user_store(user_id);
    let difficulty = match payload.difficulty {
        Some(difficulty) => difficulty,
        None => load_profile(&store)
            .await
            .map(|p| p.prior_knowledge.to_difficulty())
            .unwrap_or(Difficulty::Beginner),
    };

    let result = QuizResult {
        topic: payload.topic,
        score: payload.score,
        total_questions: payload.total_questions,
        correct_answers: payload.correct_answers,
        timestamp: Utc::now(),
        difficulty,
    };
    if let Err(e) = store.record_quiz_result(result).await {
        warn!("failed to record quiz result: {e}");
    }
    StatusCode::CREATED
}

//=========================================================================================
// Analytics and Data Handlers
//=========================================================================================

/// Compute the derived progress/performance/recommendation metrics.
#[utoipa::path(
    get,
    path = "/analytics",
    params(
        AnalyticsQuery,
        ("x-user-id" = Uuid, Header, description = "The unique ID of the learner.")
    ),
    responses(
        (status = 200, description = "Derived analytics for the selected window"),
        (status = 400, description = "Onboarding has not been completed")
    )
)]
pub async fn analytics_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let store = app_state.user_store(user_id);
    let Some(profile) = load_profile(&store).await else {
        return Err((StatusCode::BAD_REQUEST, ONBOARDING_REQUIRED.to_string()));
    };

    let bundle = store.analytics().await.unwrap_or_else(|e| {
        warn!("analytics read failed, using empty bundle: {e}");
        mentormind_core::domain::AnalyticsBundle::empty(Utc::now())
    });
    let window = query.window.unwrap_or(TimeWindow::Week);
    let report = compute_analytics(&bundle, &profile, window, Utc::now());
    Ok(Json(report))
}

/// Erase everything stored for the learner: profile, transcript, analytics
/// and any pending session.
#[utoipa::path(
    delete,
    path = "/data",
    responses((status = 204, description = "All records cleared")),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the learner."))
)]
pub async fn reset_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> StatusCode {
    let store = app_state.user_store(user_id);
    if let Err(e) = store.clear_all().await {
        warn!("failed to clear learner data: {e}");
    }
    StatusCode::NO_CONTENT
}

/// Export everything stored for the learner, for debugging.
#[utoipa::path(
    get,
    path = "/export",
    responses((status = 200, description = "Profile, transcript and analytics bundle")),
    params(("x-user-id" = Uuid, Header, description = "The unique ID of the learner."))
)]
pub async fn export_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let store = app_state.user_store(user_id);
    match store.export().await {
        Ok(exported) => Ok(Json(exported)),
        Err(e) => {
            error!("Failed to export learner data: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to export data".to_string(),
            ))
        }
    }
}
