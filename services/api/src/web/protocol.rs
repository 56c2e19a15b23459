//! services/api/src/web/protocol.rs
//!
//! Defines the JSON wire format between the browser client and the API server.
//! Field names are camelCase to match the client's expectations.

use chrono::{DateTime, Utc};
use journal_core::domain::{AnalysisResult, JournalEntry, NewJournalEntry};
use journal_core::insights::{DateGroup, Insights, MoodShare};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// Payloads Sent FROM the Client TO the Server
//=========================================================================================

/// Body of `POST /api/analyze-entry`.
#[derive(Deserialize, ToSchema, Debug)]
pub struct AnalyzeEntryRequest {
    pub transcript: Option<String>,
}

/// Body of `POST /api/journal-entries`: a journal entry without `id`/`createdAt`.
#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub user_id: Option<i32>,
    pub transcript: String,
    pub audio_url: Option<String>,
    pub mood: String,
    pub mood_emoji: String,
    pub summary: String,
    pub ai_response: String,
    pub duration: Option<i32>,
}

impl From<CreateEntryRequest> for NewJournalEntry {
    fn from(req: CreateEntryRequest) -> Self {
        NewJournalEntry {
            user_id: req.user_id,
            transcript: req.transcript,
            audio_url: req.audio_url,
            mood: req.mood,
            mood_emoji: req.mood_emoji,
            summary: req.summary,
            ai_response: req.ai_response,
            duration: req.duration,
        }
    }
}

/// Body of `POST /api/record-entry`: a raw transcript plus recording metadata.
#[derive(Deserialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RecordEntryRequest {
    pub transcript: Option<String>,
    pub user_id: Option<i32>,
    pub audio_url: Option<String>,
    pub duration: Option<i32>,
}

#[derive(Deserialize, IntoParams, Debug)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListEntriesQuery {
    /// Only return entries owned by this user.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_id: Option<i32>,
}

#[derive(Deserialize, IntoParams, Debug)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct InsightsQuery {
    /// Only aggregate entries owned by this user.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub user_id: Option<i32>,
    /// The caller's offset from UTC in minutes (east positive). Day boundaries
    /// use the server's local zone when absent.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub utc_offset_minutes: Option<i32>,
}

/// Reads an optional query value, treating `?key=` the same as an absent key.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client
//=========================================================================================

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub summary: String,
    pub mood: String,
    pub mood_emoji: String,
    pub response: String,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            summary: result.summary,
            mood: result.mood,
            mood_emoji: result.mood_emoji,
            response: result.response,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryResponse {
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

impl From<JournalEntry> for JournalEntryResponse {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id,
            user_id: entry.user_id,
            transcript: entry.transcript,
            audio_url: entry.audio_url,
            mood: entry.mood,
            mood_emoji: entry.mood_emoji,
            summary: entry.summary,
            ai_response: entry.ai_response,
            created_at: entry.created_at,
            duration: entry.duration,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MoodShareResponse {
    pub mood: String,
    pub mood_emoji: String,
    pub count: usize,
    pub percentage: u32,
}

impl From<MoodShare> for MoodShareResponse {
    fn from(share: MoodShare) -> Self {
        Self {
            mood: share.mood,
            mood_emoji: share.mood_emoji,
            count: share.count,
            percentage: share.percentage,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DateGroupResponse {
    pub label: String,
    pub count: usize,
    pub mood_emoji: String,
}

impl From<DateGroup> for DateGroupResponse {
    fn from(group: DateGroup) -> Self {
        Self {
            label: group.label,
            count: group.count,
            mood_emoji: group.mood_emoji,
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub total_entries: usize,
    pub most_common_mood: Option<MoodShareResponse>,
    pub mood_distribution: Vec<MoodShareResponse>,
    pub date_groups: Vec<DateGroupResponse>,
}

impl From<Insights> for InsightsResponse {
    fn from(insights: Insights) -> Self {
        Self {
            total_entries: insights.total_entries,
            most_common_mood: insights.most_common_mood.map(Into::into),
            mood_distribution: insights.mood_distribution.into_iter().map(Into::into).collect(),
            date_groups: insights.date_groups.into_iter().map(Into::into).collect(),
        }
    }
}

/// A plain status or error message.
#[derive(Serialize, ToSchema, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
