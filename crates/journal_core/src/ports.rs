//! crates/journal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;

use crate::domain::{JournalEntry, NewJournalEntry};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy shared by every port.
///
/// Analysis-stage variants (`EmptyTranscript`, `UpstreamUnavailable`,
/// `MalformedResponse`) never leave the analysis pipeline; the store-facing
/// variants travel up to the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Transcript is empty")]
    EmptyTranscript,
    #[error("Completion service unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Invalid journal entry: {0}")]
    InvalidEntry(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Durable keyed collection of journal entries.
///
/// Implementations must return listings ordered by `created_at` descending
/// (ties broken by `id` descending); callers rely on that order.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Persists a new entry, assigning a fresh `id` and the current time.
    async fn create_entry(&self, entry: NewJournalEntry) -> PortResult<JournalEntry>;

    /// Lists entries, newest first, optionally restricted to one owner.
    async fn list_entries(&self, owner_id: Option<i32>) -> PortResult<Vec<JournalEntry>>;

    async fn get_entry_by_id(&self, id: i32) -> PortResult<Option<JournalEntry>>;

    /// Removes an entry. Returns `false` when no entry had that id.
    async fn delete_entry(&self, id: i32) -> PortResult<bool>;
}

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends a transcript together with the journaling prompt to the language
    /// model and returns the raw, unparsed completion text.
    async fn complete_analysis(&self, transcript: &str) -> PortResult<String>;
}
