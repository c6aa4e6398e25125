//! crates/mentormind_core/src/store.rs
//!
//! Typed access to the four persisted records, layered over the raw
//! `StateStore` port. Every record travels inside a version envelope so the
//! shape can evolve without stranding old data.

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{AnalyticsBundle, ChatMessage, PendingSession, QuizResult, UserProfile};
use crate::ports::{PortResult, RecordKind, StateStore};

/// Current persisted-record schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// The self-describing wrapper every record is stored inside.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    record: serde_json::Value,
}

/// Migrates a record body from the version it was written at to the current
/// schema. Returns `None` for versions this build does not understand.
fn migrate(version: u32, record: serde_json::Value) -> Option<serde_json::Value> {
    match version {
        SCHEMA_VERSION => Some(record),
        _ => None,
    }
}

/// Everything held for one learner, as returned by the debug export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedData {
    pub profile: Option<UserProfile>,
    pub chat_history: Vec<ChatMessage>,
    pub analytics: AnalyticsBundle,
}

/// A `StateStore` handle scoped to a single learner.
///
/// All reads decode through the version envelope; a record that fails to
/// decode (malformed JSON body or unknown schema version) is treated as
/// absent with a logged warning rather than as a hard failure: the store is
/// best-effort telemetry, not a system of record.
#[derive(Clone)]
pub struct UserStore {
    store: Arc<dyn StateStore>,
    user_id: Uuid,
}

impl UserStore {
    pub fn new(store: Arc<dyn StateStore>, user_id: Uuid) -> Self {
        Self { store, user_id }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    async fn read<T: DeserializeOwned>(&self, kind: RecordKind) -> PortResult<Option<T>> {
        let Some(raw) = self.store.get(self.user_id, kind).await? else {
            return Ok(None);
        };

        let envelope: Envelope = match serde_json::from_value(raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                warn!(kind = kind.as_str(), error = %e, "discarding malformed record");
                return Ok(None);
            }
        };

        let Some(body) = migrate(envelope.version, envelope.record) else {
            warn!(
                kind = kind.as_str(),
                version = envelope.version,
                "discarding record with unknown schema version"
            );
            return Ok(None);
        };

        match serde_json::from_value(body) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(kind = kind.as_str(), error = %e, "discarding undecodable record");
                Ok(None)
            }
        }
    }

    async fn write<T: Serialize>(&self, kind: RecordKind, record: &T) -> PortResult<()> {
        let envelope = Envelope {
            version: SCHEMA_VERSION,
            record: serde_json::to_value(record)
                .map_err(|e| crate::ports::PortError::Unexpected(e.to_string()))?,
        };
        let raw = serde_json::to_value(&envelope)
            .map_err(|e| crate::ports::PortError::Unexpected(e.to_string()))?;
        self.store.set(self.user_id, kind, raw).await
    }

    // --- Profile ---

    pub async fn profile(&self) -> PortResult<Option<UserProfile>> {
        self.read(RecordKind::Profile).await
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> PortResult<()> {
        self.write(RecordKind::Profile, profile).await
    }

    // --- Chat Transcript ---

    /// Returns the transcript; an absent record reads as an empty transcript.
    pub async fn chat_history(&self) -> PortResult<Vec<ChatMessage>> {
        Ok(self.read(RecordKind::ChatHistory).await?.unwrap_or_default())
    }

    pub async fn save_chat_history(&self, messages: &[ChatMessage]) -> PortResult<()> {
        self.write(RecordKind::ChatHistory, &messages).await
    }

    pub async fn clear_chat_history(&self) -> PortResult<()> {
        self.store.clear(self.user_id, RecordKind::ChatHistory).await
    }

    // --- Analytics Bundle ---

    /// Returns the analytics bundle; an absent record reads as the zero-valued
    /// default with `last_active` set to the current time.
    pub async fn analytics(&self) -> PortResult<AnalyticsBundle> {
        Ok(self
            .read(RecordKind::Analytics)
            .await?
            .unwrap_or_else(|| AnalyticsBundle::empty(Utc::now())))
    }

    pub async fn save_analytics(&self, bundle: &AnalyticsBundle) -> PortResult<()> {
        self.write(RecordKind::Analytics, bundle).await
    }

    /// Appends one completed quiz to the bundle and bumps the last-active
    /// timestamp to the result's own timestamp.
    pub async fn record_quiz_result(&self, result: QuizResult) -> PortResult<()> {
        let mut bundle = self.analytics().await?;
        bundle.last_active = result.timestamp;
        bundle.quiz_results.push(result);
        self.save_analytics(&bundle).await
    }

    // --- Pending Session Marker ---

    pub async fn pending_session(&self) -> PortResult<Option<PendingSession>> {
        self.read(RecordKind::PendingSession).await
    }

    pub async fn save_pending_session(&self, session: &PendingSession) -> PortResult<()> {
        self.write(RecordKind::PendingSession, session).await
    }

    pub async fn clear_pending_session(&self) -> PortResult<()> {
        self.store
            .clear(self.user_id, RecordKind::PendingSession)
            .await
    }

    // --- Whole-profile Operations ---

    /// The explicit full-reset: clears all four records.
    pub async fn clear_all(&self) -> PortResult<()> {
        self.store.clear_all(self.user_id).await
    }

    /// Snapshot of everything held for this learner, for debugging.
    pub async fn export(&self) -> PortResult<ExportedData> {
        Ok(ExportedData {
            profile: self.profile().await?,
            chat_history: self.chat_history().await?,
            analytics: self.analytics().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ConfidenceSample, Difficulty, LearningSession, Sender};
    use crate::memory::MemoryStore;
    use crate::test_support::sample_profile;
    use chrono::TimeZone;

    fn user_store() -> UserStore {
        UserStore::new(Arc::new(MemoryStore::new()), Uuid::new_v4())
    }

    #[tokio::test]
    async fn profile_round_trips_deep_equal() {
        let store = user_store();
        let profile = sample_profile("Algebra", 3);

        store.save_profile(&profile).await.unwrap();
        let loaded = store.profile().await.unwrap().unwrap();

        assert_eq!(loaded, profile);
    }

    #[tokio::test]
    async fn chat_history_round_trips_deep_equal() {
        let store = user_store();
        let messages = vec![
            ChatMessage {
                sender: Sender::User,
                text: "What is a derivative?".into(),
                timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
                image_url: None,
            },
            ChatMessage {
                sender: Sender::Ai,
                text: "A derivative measures the rate of change.".into(),
                timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 5).unwrap(),
                image_url: Some("data:image/svg+xml;base64,PHN2Zz4=".into()),
            },
        ];

        store.save_chat_history(&messages).await.unwrap();
        assert_eq!(store.chat_history().await.unwrap(), messages);
    }

    #[tokio::test]
    async fn analytics_round_trips_deep_equal() {
        let store = user_store();
        let ts = Utc.with_ymd_and_hms(2024, 5, 2, 18, 30, 0).unwrap();
        let mut bundle = AnalyticsBundle::empty(ts);
        bundle.sessions.push(LearningSession {
            start_time: ts,
            end_time: ts + chrono::Duration::seconds(600),
            duration: 600,
            topic: "Physics".into(),
            messages_count: 4,
            confidence_before: 2,
            confidence_after: 3,
        });
        bundle.total_time_spent = 600;
        bundle.record_topic("Physics");
        bundle.confidence_levels.push(ConfidenceSample {
            timestamp: ts,
            level: 3,
            topic: "Physics".into(),
        });

        store.save_analytics(&bundle).await.unwrap();
        assert_eq!(store.analytics().await.unwrap(), bundle);
    }

    #[tokio::test]
    async fn pending_session_round_trips_deep_equal() {
        let store = user_store();
        let pending = PendingSession {
            start_time: Utc.with_ymd_and_hms(2024, 5, 3, 7, 15, 0).unwrap(),
            topic: "Chemistry".into(),
            confidence_before: 4,
            messages_count: 2,
        };

        store.save_pending_session(&pending).await.unwrap();
        assert_eq!(store.pending_session().await.unwrap(), Some(pending));
    }

    #[tokio::test]
    async fn absent_analytics_reads_as_zero_valued_default() {
        let store = user_store();
        let bundle = store.analytics().await.unwrap();

        assert!(bundle.sessions.is_empty());
        assert!(bundle.quiz_results.is_empty());
        assert!(bundle.topics_studied.is_empty());
        assert!(bundle.confidence_levels.is_empty());
        assert_eq!(bundle.total_time_spent, 0);
    }

    #[tokio::test]
    async fn malformed_record_reads_as_absent() {
        let raw = Arc::new(MemoryStore::new());
        let user_id = Uuid::new_v4();
        raw.set(
            user_id,
            RecordKind::Profile,
            serde_json::json!({"not": "an envelope"}),
        )
        .await
        .unwrap();

        let store = UserStore::new(raw, user_id);
        assert!(store.profile().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_schema_version_reads_as_absent() {
        let raw = Arc::new(MemoryStore::new());
        let user_id = Uuid::new_v4();
        raw.set(
            user_id,
            RecordKind::PendingSession,
            serde_json::json!({"version": 99, "record": {}}),
        )
        .await
        .unwrap();

        let store = UserStore::new(raw, user_id);
        assert!(store.pending_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn record_quiz_result_appends_and_bumps_last_active() {
        let store = user_store();
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let result = QuizResult {
            topic: "Algebra".into(),
            score: 80.0,
            total_questions: 5,
            correct_answers: 4,
            timestamp: ts,
            difficulty: Difficulty::Beginner,
        };

        store.record_quiz_result(result.clone()).await.unwrap();

        let bundle = store.analytics().await.unwrap();
        assert_eq!(bundle.quiz_results, vec![result]);
        assert_eq!(bundle.last_active, ts);
    }

    #[tokio::test]
    async fn clear_all_wipes_every_record() {
        let store = user_store();
        store
            .save_profile(&sample_profile("Biology", 2))
            .await
            .unwrap();
        store
            .save_pending_session(&PendingSession {
                start_time: Utc::now(),
                topic: "Biology".into(),
                confidence_before: 2,
                messages_count: 0,
            })
            .await
            .unwrap();

        store.clear_all().await.unwrap();

        assert!(store.profile().await.unwrap().is_none());
        assert!(store.pending_session().await.unwrap().is_none());
        assert!(store.chat_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn export_collects_all_records() {
        let store = user_store();
        let profile = sample_profile("History", 5);
        store.save_profile(&profile).await.unwrap();

        let exported = store.export().await.unwrap();
        assert_eq!(exported.profile, Some(profile));
        assert!(exported.chat_history.is_empty());
        assert!(exported.analytics.sessions.is_empty());
    }
}
