//! crates/mentormind_core/src/memory.rs
//!
//! An in-process `StateStore` backed by a hash map. Used by the service as
//! the fallback when no database is configured (the application keeps
//! running with in-memory-only state) and by tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::ports::{PortError, PortResult, RecordKind, StateStore};

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<(Uuid, RecordKind), serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_err(e: impl std::fmt::Display) -> PortError {
        PortError::Unavailable(format!("memory store lock poisoned: {e}"))
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, user_id: Uuid, kind: RecordKind) -> PortResult<Option<serde_json::Value>> {
        let records = self.records.read().map_err(Self::lock_err)?;
        Ok(records.get(&(user_id, kind)).cloned())
    }

    async fn set(
        &self,
        user_id: Uuid,
        kind: RecordKind,
        record: serde_json::Value,
    ) -> PortResult<()> {
        let mut records = self.records.write().map_err(Self::lock_err)?;
        records.insert((user_id, kind), record);
        Ok(())
    }

    async fn clear(&self, user_id: Uuid, kind: RecordKind) -> PortResult<()> {
        let mut records = self.records.write().map_err(Self::lock_err)?;
        records.remove(&(user_id, kind));
        Ok(())
    }

    async fn clear_all(&self, user_id: Uuid) -> PortResult<()> {
        let mut records = self.records.write().map_err(Self::lock_err)?;
        records.retain(|(owner, _), _| *owner != user_id);
        Ok(())
    }
}
