//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use mentormind_core::ports::{DiagramService, QuizGenerationService, StateStore, TutoringService};
use mentormind_core::session::SessionTracker;
use mentormind_core::store::UserStore;
use std::sync::Arc;
use uuid::Uuid;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StateStore>,
    pub config: Arc<Config>,
    pub tutor_adapter: Arc<dyn TutoringService>,
    pub quiz_adapter: Arc<dyn QuizGenerationService>,
    pub diagram_adapter: Arc<dyn DiagramService>,
}

impl AppState {
    /// A typed store handle scoped to the requesting learner.
    pub fn user_store(&self, user_id: Uuid) -> UserStore {
        UserStore::new(self.store.clone(), user_id)
    }

    /// The session tracker for the requesting learner.
    pub fn tracker(&self, user_id: Uuid) -> SessionTracker {
        SessionTracker::new(self.user_store(user_id))
    }
}
