//! crates/mentormind_core/src/session.rs
//!
//! The session tracker: starts and stops the single "current learning
//! session" and folds completed sessions into the analytics bundle.

use chrono::{DateTime, Utc};

use crate::domain::{ConfidenceSample, LearningSession, PendingSession};
use crate::ports::PortResult;
use crate::store::UserStore;

/// Tracks the lifecycle of one learner's current session.
///
/// Invariant: at most one pending session exists per learner at a time;
/// starting a new session unconditionally overwrites the pending marker.
/// All operations are best-effort telemetry; callers are expected to log
/// and continue on failure rather than surface errors to the learner.
#[derive(Clone)]
pub struct SessionTracker {
    store: UserStore,
}

impl SessionTracker {
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }

    /// Starts a session now. See [`SessionTracker::start_session_at`].
    pub async fn start_session(&self, topic: &str, confidence_before: u8) -> PortResult<()> {
        self.start_session_at(topic, confidence_before, Utc::now())
            .await
    }

    /// Writes a fresh pending-session marker, overwriting any existing one.
    /// There is no merge: only the most recent start survives.
    pub async fn start_session_at(
        &self,
        topic: &str,
        confidence_before: u8,
        now: DateTime<Utc>,
    ) -> PortResult<()> {
        let pending = PendingSession {
            start_time: now,
            topic: topic.to_string(),
            confidence_before,
            messages_count: 0,
        };
        self.store.save_pending_session(&pending).await
    }

    /// Bumps the pending session's message counter by one. A no-op when no
    /// session is pending.
    pub async fn increment_message_count(&self) -> PortResult<()> {
        let Some(mut pending) = self.store.pending_session().await? else {
            return Ok(());
        };
        pending.messages_count += 1;
        self.store.save_pending_session(&pending).await
    }

    /// Ends the session now. See [`SessionTracker::end_session_at`].
    pub async fn end_session(&self, confidence_after: u8) -> PortResult<()> {
        self.end_session_at(confidence_after, Utc::now()).await
    }

    /// Completes the pending session and folds it into the analytics bundle:
    /// appends the session, adds its duration to the running total, bumps
    /// last-active, records the topic and a confidence sample. A no-op when
    /// no session is pending.
    ///
    /// The bundle is persisted before the pending marker is cleared, so an
    /// interruption between the two writes can duplicate a marker but never
    /// lose a completed session.
    pub async fn end_session_at(&self, confidence_after: u8, now: DateTime<Utc>) -> PortResult<()> {
        let Some(pending) = self.store.pending_session().await? else {
            return Ok(());
        };

        let duration = (now - pending.start_time).num_seconds();
        let session = LearningSession {
            start_time: pending.start_time,
            end_time: now,
            duration,
            topic: pending.topic.clone(),
            messages_count: pending.messages_count,
            confidence_before: pending.confidence_before,
            confidence_after,
        };

        let mut bundle = self.store.analytics().await?;
        bundle.sessions.push(session);
        bundle.total_time_spent += duration;
        bundle.last_active = now;
        bundle.record_topic(&pending.topic);
        bundle.confidence_levels.push(ConfidenceSample {
            timestamp: now,
            level: confidence_after,
            topic: pending.topic,
        });

        self.store.save_analytics(&bundle).await?;
        self.store.clear_pending_session().await
    }
}
