//! crates/journal_core/src/service.rs
//!
//! The entry service: the one place that validates entry input, folds
//! analysis results into new entries, and serves reads from the store.

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use tracing::info;

use crate::domain::{AnalysisResult, JournalEntry, NewJournalEntry};
use crate::insights::{self, Insights};
use crate::pipeline::AnalysisPipeline;
use crate::ports::{EntryStore, PortError, PortResult};

/// Caller-supplied metadata for an entry recorded from a raw transcript.
#[derive(Debug, Clone, Default)]
pub struct EntryMetadata {
    pub user_id: Option<i32>,
    pub audio_url: Option<String>,
    pub duration: Option<i32>,
}

pub struct EntryService {
    store: Arc<dyn EntryStore>,
    pipeline: Arc<AnalysisPipeline>,
}

impl EntryService {
    pub fn new(store: Arc<dyn EntryStore>, pipeline: Arc<AnalysisPipeline>) -> Self {
        Self { store, pipeline }
    }

    /// Runs the analysis pipeline. Never fails; see `AnalysisPipeline`.
    pub async fn analyze(&self, transcript: &str) -> AnalysisResult {
        self.pipeline.analyze_entry(transcript).await
    }

    /// Validates and persists a fully-formed entry.
    pub async fn create_entry(&self, entry: NewJournalEntry) -> PortResult<JournalEntry> {
        entry.validate()?;
        let created = self.store.create_entry(entry).await?;
        info!(entry_id = created.id, user_id = ?created.user_id, "Journal entry created");
        Ok(created)
    }

    /// Analyzes a transcript and persists the resulting entry with `metadata`.
    ///
    /// The transcript itself must be non-empty; analysis failures still produce
    /// an entry carrying the fallback result.
    pub async fn record_entry(
        &self,
        transcript: &str,
        metadata: EntryMetadata,
    ) -> PortResult<JournalEntry> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(PortError::InvalidEntry("transcript must not be empty".to_string()));
        }

        let analysis = self.pipeline.analyze_entry(transcript).await;
        let entry = NewJournalEntry {
            user_id: metadata.user_id,
            audio_url: metadata.audio_url,
            duration: metadata.duration,
            ..NewJournalEntry::from_analysis(transcript, analysis)
        };
        self.create_entry(entry).await
    }

    pub async fn list_entries(&self, owner_id: Option<i32>) -> PortResult<Vec<JournalEntry>> {
        self.store.list_entries(owner_id).await
    }

    pub async fn get_entry(&self, id: i32) -> PortResult<JournalEntry> {
        self.store
            .get_entry_by_id(id)
            .await?
            .ok_or_else(|| PortError::NotFound(format!("Journal entry {} not found", id)))
    }

    pub async fn delete_entry(&self, id: i32) -> PortResult<()> {
        if self.store.delete_entry(id).await? {
            info!(entry_id = id, "Journal entry deleted");
            Ok(())
        } else {
            Err(PortError::NotFound(format!("Journal entry {} not found", id)))
        }
    }

    /// Insights over the owner's entries (or all entries), relative to `now`.
    pub async fn insights<Tz: TimeZone>(
        &self,
        owner_id: Option<i32>,
        now: &DateTime<Tz>,
    ) -> PortResult<Insights> {
        let entries = self.store.list_entries(owner_id).await?;
        Ok(insights::summarize(&entries, now))
    }
}
