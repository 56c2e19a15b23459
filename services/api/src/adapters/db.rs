//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `EntryStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use journal_core::domain::{JournalEntry, NewJournalEntry};
use journal_core::ports::{EntryStore, PortError, PortResult};
use sqlx::{FromRow, PgPool};

const ENTRY_COLUMNS: &str =
    "id, user_id, transcript, audio_url, mood, mood_emoji, summary, ai_response, created_at, duration";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `EntryStore` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct JournalEntryRecord {
    id: i32,
    user_id: Option<i32>,
    transcript: String,
    audio_url: Option<String>,
    mood: String,
    mood_emoji: String,
    summary: String,
    ai_response: String,
    created_at: DateTime<Utc>,
    duration: Option<i32>,
}
impl JournalEntryRecord {
    fn to_domain(self) -> JournalEntry {
        JournalEntry {
            id: self.id,
            user_id: self.user_id,
            transcript: self.transcript,
            audio_url: self.audio_url,
            mood: self.mood,
            mood_emoji: self.mood_emoji,
            summary: self.summary,
            ai_response: self.ai_response,
            created_at: self.created_at,
            duration: self.duration,
        }
    }
}

//=========================================================================================
// `EntryStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl EntryStore for DbAdapter {
    async fn create_entry(&self, entry: NewJournalEntry) -> PortResult<JournalEntry> {
        let sql = format!(
            "INSERT INTO journal_entries \
             (user_id, transcript, audio_url, mood, mood_emoji, summary, ai_response, duration) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {}",
            ENTRY_COLUMNS
        );
        let record = sqlx::query_as::<_, JournalEntryRecord>(&sql)
            .bind(entry.user_id)
            .bind(entry.transcript)
            .bind(entry.audio_url)
            .bind(entry.mood)
            .bind(entry.mood_emoji)
            .bind(entry.summary)
            .bind(entry.ai_response)
            .bind(entry.duration)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_check_violation() => {
                    PortError::InvalidEntry(db.message().to_string())
                }
                _ => PortError::Unexpected(e.to_string()),
            })?;
        Ok(record.to_domain())
    }

    async fn list_entries(&self, owner_id: Option<i32>) -> PortResult<Vec<JournalEntry>> {
        let sql = format!(
            "SELECT {} FROM journal_entries \
             WHERE ($1::INTEGER IS NULL OR user_id = $1) \
             ORDER BY created_at DESC, id DESC",
            ENTRY_COLUMNS
        );
        let records = sqlx::query_as::<_, JournalEntryRecord>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let entries = records.into_iter().map(|r| r.to_domain()).collect();
        Ok(entries)
    }

    async fn get_entry_by_id(&self, id: i32) -> PortResult<Option<JournalEntry>> {
        let sql = format!("SELECT {} FROM journal_entries WHERE id = $1", ENTRY_COLUMNS);
        let record = sqlx::query_as::<_, JournalEntryRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(record.map(JournalEntryRecord::to_domain))
    }

    async fn delete_entry(&self, id: i32) -> PortResult<bool> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}
