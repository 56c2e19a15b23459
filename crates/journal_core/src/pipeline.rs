//! crates/journal_core/src/pipeline.rs
//!
//! The analysis pipeline: completion call followed by extraction, with a fixed
//! fallback standing in for any failure. `analyze_entry` never returns an error.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::AnalysisResult;
use crate::extract::extract;
use crate::ports::{CompletionService, PortError, PortResult};

pub const FALLBACK_UNAVAILABLE_SUMMARY: &str = "Unable to analyze entry at this time";
pub const FALLBACK_PARSE_SUMMARY: &str = "Unable to parse journal entry";
pub const FALLBACK_MOOD: &str = "Neutral";
pub const FALLBACK_MOOD_EMOJI: &str = "😊";
pub const FALLBACK_RESPONSE: &str = "I'm here to listen to you. Please try again in a moment.";

impl AnalysisResult {
    /// The result used whenever a real analysis cannot be obtained or trusted.
    pub fn fallback(cause: &PortError) -> Self {
        let summary = match cause {
            PortError::MalformedResponse(_) => FALLBACK_PARSE_SUMMARY,
            _ => FALLBACK_UNAVAILABLE_SUMMARY,
        };
        Self {
            summary: summary.to_string(),
            mood: FALLBACK_MOOD.to_string(),
            mood_emoji: FALLBACK_MOOD_EMOJI.to_string(),
            response: FALLBACK_RESPONSE.to_string(),
        }
    }
}

pub struct AnalysisPipeline {
    client: Arc<dyn CompletionService>,
}

impl AnalysisPipeline {
    pub fn new(client: Arc<dyn CompletionService>) -> Self {
        Self { client }
    }

    /// Analyzes a transcript, degrading to the fallback result on any failure.
    pub async fn analyze_entry(&self, transcript: &str) -> AnalysisResult {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return AnalysisResult::fallback(&PortError::EmptyTranscript);
        }

        match self.try_analyze(transcript).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Entry analysis failed, returning fallback result");
                AnalysisResult::fallback(&e)
            }
        }
    }

    async fn try_analyze(&self, transcript: &str) -> PortResult<AnalysisResult> {
        let raw = self.client.complete_analysis(transcript).await?;
        debug!(raw_completion = %raw, "Received analysis completion");
        extract(&raw)
    }
}
