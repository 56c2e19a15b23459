//! crates/journal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or wire format.

use chrono::{DateTime, Utc};

use crate::ports::{PortError, PortResult};

/// A persisted journal entry: the user's words plus the analysis folded into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub id: i32,
    pub user_id: Option<i32>,
    pub transcript: String,
    pub audio_url: Option<String>,
    pub mood: String,
    pub mood_emoji: String,
    pub summary: String,
    pub ai_response: String,
    pub created_at: DateTime<Utc>,
    pub duration: Option<i32>,
}

/// The fields a caller supplies when creating an entry. The store assigns
/// `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewJournalEntry {
    pub user_id: Option<i32>,
    pub transcript: String,
    pub audio_url: Option<String>,
    pub mood: String,
    pub mood_emoji: String,
    pub summary: String,
    pub ai_response: String,
    pub duration: Option<i32>,
}

impl NewJournalEntry {
    /// Builds an entry from a transcript and the analysis produced for it.
    pub fn from_analysis(transcript: impl Into<String>, analysis: AnalysisResult) -> Self {
        Self {
            transcript: transcript.into(),
            mood: analysis.mood,
            mood_emoji: analysis.mood_emoji,
            summary: analysis.summary,
            ai_response: analysis.response,
            ..Default::default()
        }
    }

    /// Checks the invariants every persisted entry must hold.
    pub fn validate(&self) -> PortResult<()> {
        let required = [
            ("transcript", &self.transcript),
            ("mood", &self.mood),
            ("moodEmoji", &self.mood_emoji),
            ("summary", &self.summary),
            ("aiResponse", &self.ai_response),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(PortError::InvalidEntry(format!("{} must not be empty", field)));
            }
        }

        if let Some(duration) = self.duration {
            if duration < 0 {
                return Err(PortError::InvalidEntry(format!(
                    "duration must be non-negative, got {}",
                    duration
                )));
            }
        }

        Ok(())
    }
}

/// The structured analysis of a single transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResult {
    pub summary: String,
    pub mood: String,
    pub mood_emoji: String,
    pub response: String,
}
