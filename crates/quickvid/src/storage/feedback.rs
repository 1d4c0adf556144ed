//! Persisted user feedback.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, OptionalExtension};

use crate::core::error::{AppError, AppResult};
use crate::storage::db::{get_connection, DbPool};

/// One feedback message as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackRecord {
    pub chat_id: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Timestamped feedback records keyed by chat.
#[async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Most recent record of `chat_id`, if any.
    async fn latest_for_chat(&self, chat_id: i64) -> AppResult<Option<FeedbackRecord>>;

    async fn insert(&self, record: &FeedbackRecord) -> AppResult<()>;
}

/// [`FeedbackStore`] on the `feedbacks` table.
#[derive(Clone)]
pub struct SqliteFeedbackStore {
    pool: DbPool,
}

impl SqliteFeedbackStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn from_millis(ms: i64) -> AppResult<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| AppError::Validation(format!("feedback timestamp out of range: {}", ms)))
}

#[async_trait]
impl FeedbackStore for SqliteFeedbackStore {
    async fn latest_for_chat(&self, chat_id: i64) -> AppResult<Option<FeedbackRecord>> {
        let pool = self.pool.clone();
        let row = tokio::task::spawn_blocking(move || -> AppResult<Option<(String, i64)>> {
            let conn = get_connection(&pool)?;
            let row = conn
                .query_row(
                    "SELECT message, created_at_ms FROM feedbacks
                     WHERE chat_id = ?1
                     ORDER BY created_at_ms DESC, id DESC
                     LIMIT 1",
                    params![chat_id],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            Ok(row)
        })
        .await??;

        row.map(|(message, created_at_ms)| {
            Ok(FeedbackRecord {
                chat_id,
                message,
                created_at: from_millis(created_at_ms)?,
            })
        })
        .transpose()
    }

    async fn insert(&self, record: &FeedbackRecord) -> AppResult<()> {
        let pool = self.pool.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || -> AppResult<()> {
            let conn = get_connection(&pool)?;
            conn.execute(
                "INSERT INTO feedbacks (chat_id, message, created_at_ms) VALUES (?1, ?2, ?3)",
                params![record.chat_id, record.message, record.created_at.timestamp_millis()],
            )?;
            Ok(())
        })
        .await??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::db::create_pool;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn store() -> (tempfile::TempDir, SqliteFeedbackStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feedback.sqlite");
        let pool = create_pool(path.to_str().unwrap()).unwrap();
        (dir, SqliteFeedbackStore::new(pool))
    }

    fn record(chat_id: i64, message: &str, created_at: DateTime<Utc>) -> FeedbackRecord {
        FeedbackRecord {
            chat_id,
            message: message.to_string(),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_latest_for_unknown_chat_is_none() {
        let (_dir, store) = store();
        assert_eq!(store.latest_for_chat(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_latest_returns_newest_record_of_chat() {
        let (_dir, store) = store();
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

        store.insert(&record(1, "old", now - Duration::days(10))).await.unwrap();
        store.insert(&record(1, "new", now)).await.unwrap();
        store.insert(&record(2, "other chat", now + Duration::days(1))).await.unwrap();

        assert_eq!(store.latest_for_chat(1).await.unwrap(), Some(record(1, "new", now)));
    }
}
