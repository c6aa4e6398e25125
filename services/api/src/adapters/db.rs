//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `StateStore` port from the `core` crate. It keeps one row per
//! (learner, record kind) in PostgreSQL using `sqlx`, replacing the JSON body
//! wholesale on every write.

use async_trait::async_trait;
use mentormind_core::ports::{PortError, PortResult, RecordKind, StateStore};
use sqlx::{PgPool, Row};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `StateStore` port.
#[derive(Clone)]
pub struct PgStateStore {
    pool: PgPool,
}

impl PgStateStore {
    /// Creates a new `PgStateStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    fn unavailable(e: sqlx::Error) -> PortError {
        PortError::Unavailable(e.to_string())
    }
}

//=========================================================================================
// `StateStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl StateStore for PgStateStore {
    async fn get(&self, user_id: Uuid, kind: RecordKind) -> PortResult<Option<serde_json::Value>> {
        let row = sqlx::query("SELECT body FROM records WHERE user_id = $1 AND kind = $2")
            .bind(user_id)
            .bind(kind.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::unavailable)?;

        match row {
            Some(row) => {
                let body: serde_json::Value =
                    row.try_get("body").map_err(Self::unavailable)?;
                Ok(Some(body))
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        user_id: Uuid,
        kind: RecordKind,
        record: serde_json::Value,
    ) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO records (user_id, kind, body, updated_at) \
             VALUES ($1, $2, $3, now()) \
             ON CONFLICT (user_id, kind) \
             DO UPDATE SET body = EXCLUDED.body, updated_at = now()",
        )
        .bind(user_id)
        .bind(kind.as_str())
        .bind(record)
        .execute(&self.pool)
        .await
        .map_err(Self::unavailable)?;
        Ok(())
    }

    async fn clear(&self, user_id: Uuid, kind: RecordKind) -> PortResult<()> {
        sqlx::query("DELETE FROM records WHERE user_id = $1 AND kind = $2")
            .bind(user_id)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(Self::unavailable)?;
        Ok(())
    }

    async fn clear_all(&self, user_id: Uuid) -> PortResult<()> {
        // A single DELETE, so the full reset is atomic.
        sqlx::query("DELETE FROM records WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Self::unavailable)?;
        Ok(())
    }
}
