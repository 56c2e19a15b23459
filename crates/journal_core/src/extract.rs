//! crates/journal_core/src/extract.rs
//!
//! Turns the free-form text returned by the language model into a validated
//! `AnalysisResult`. The model is asked for bare JSON but regularly wraps it in
//! prose or code fences and repeats the human-readable labels from the prompt
//! inside the values, so extraction is: locate, repair, parse, validate.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use serde::Deserialize;
use tracing::debug;

use crate::domain::AnalysisResult;
use crate::ports::{PortError, PortResult};

/// First `{ ... }` span, non-greedy, across newlines.
static OBJECT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").expect("object pattern is valid"));

static REPAIR_RULES: LazyLock<Vec<RepairRule>> = LazyLock::new(|| {
    vec![
        RepairRule::label("summary-label", "summary", "🧠", "Summary"),
        RepairRule::label("response-label", "response", "💬", "Response"),
    ]
});

//=========================================================================================
// Repair Rules
//=========================================================================================

/// A named textual rewrite applied to the located JSON object before parsing.
pub struct RepairRule {
    name: &'static str,
    pattern: Regex,
    replacement: String,
}

impl RepairRule {
    /// Strips `<emoji> <label>` (and any whitespace, escaped newline or colon
    /// after it) from the very start of the string value of `key`.
    fn label(name: &'static str, key: &str, emoji: &str, label: &str) -> Self {
        let pattern = format!(
            r#""{key}"\s*:\s*"\s*{emoji}\s*{label}(?:\s|\\[nrt]|:)*"#,
            key = regex::escape(key),
            emoji = regex::escape(emoji),
            label = regex::escape(label),
        );
        Self {
            name,
            pattern: Regex::new(&pattern).expect("label repair pattern is valid"),
            replacement: format!(r#""{}":""#, key),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Applies the rule; returns `Cow::Borrowed` when nothing matched.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.pattern
            .replace_all(text, NoExpand(self.replacement.as_str()))
    }
}

/// The repair rules, in the order they are applied.
pub fn repair_rules() -> &'static [RepairRule] {
    &REPAIR_RULES
}

//=========================================================================================
// Extraction
//=========================================================================================

#[derive(Deserialize)]
struct RawAnalysis {
    summary: Option<String>,
    mood: Option<String>,
    #[serde(rename = "moodEmoji")]
    mood_emoji: Option<String>,
    response: Option<String>,
}

/// Extracts and validates an `AnalysisResult` from a raw completion.
///
/// Fails with `PortError::MalformedResponse` when no object can be located,
/// the repaired object is not valid JSON, or any of the four fields is
/// missing, not a string, or blank.
pub fn extract(raw: &str) -> PortResult<AnalysisResult> {
    let object = locate_object(raw).ok_or_else(|| {
        PortError::MalformedResponse("no JSON object found in completion".to_string())
    })?;

    let repaired = apply_repairs(object);

    let payload: RawAnalysis = serde_json::from_str(&repaired)
        .map_err(|e| PortError::MalformedResponse(format!("invalid JSON payload: {}", e)))?;

    Ok(AnalysisResult {
        summary: required_field("summary", payload.summary)?,
        mood: required_field("mood", payload.mood)?,
        mood_emoji: required_field("moodEmoji", payload.mood_emoji)?,
        response: required_field("response", payload.response)?,
    })
}

/// Returns the first brace-delimited span of `raw`, if any.
pub fn locate_object(raw: &str) -> Option<&str> {
    OBJECT_PATTERN.find(raw).map(|m| m.as_str())
}

fn apply_repairs(object: &str) -> String {
    let mut text = object.to_string();
    for rule in repair_rules() {
        let repaired = match rule.apply(&text) {
            Cow::Owned(repaired) => Some(repaired),
            Cow::Borrowed(_) => None,
        };
        if let Some(repaired) = repaired {
            debug!(rule = rule.name(), "applied repair rule to completion");
            text = repaired;
        }
    }
    text
}

fn required_field(name: &str, value: Option<String>) -> PortResult<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        Some(_) => Err(PortError::MalformedResponse(format!("field '{}' is empty", name))),
        None => Err(PortError::MalformedResponse(format!("field '{}' is missing", name))),
    }
}
