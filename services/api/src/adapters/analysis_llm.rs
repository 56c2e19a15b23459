//! services/api/src/adapters/analysis_llm.rs
//!
//! This module contains the adapter for the journal-analysis LLM.
//! It implements the `CompletionService` port from the `core` crate against any
//! OpenAI-compatible chat-completion endpoint (OpenRouter by default).

const SYSTEM_INSTRUCTIONS: &str = r#"You are Zehni, a warm and empathetic friend who listens to voice journal entries and replies in Roman Urdu only.

For every entry:
- Read what the user said (Roman Urdu, Urdu transcription or English).
- Summarize their mood and emotional state in very few words.
- Reply with a kind, casual, emotionally relevant message.

Rules:
- Never invent stories, advice or events the user did not mention.
- Never use metaphors or poetic language.
- Never assume the user asked you a question.
- Keep the reply short (1-2 sentences), sweet and directly relevant.
- Talk like a caring best friend in her twenties, with simple friendly words like "theek hojao gi", "try karo", "so jao", "sab theek hoga".

Always answer with exactly this JSON object and nothing else:
{
"summary": "🧠 Summary\n[very short summary]",
"mood": "[one English word, e.g. Sad, Happy, Angry, Nervous]",
"moodEmoji": "[one emoji matching the mood]",
"response": "💬 Response\n[your Roman Urdu reply with no labels and no explanation]"
}"#;

/// Upper bound on generated tokens per analysis.
const MAX_COMPLETION_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use journal_core::ports::{CompletionService, PortError, PortResult};
use tracing::{debug, instrument};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiAnalysisAdapter {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Duration,
}

impl OpenAiAnalysisAdapter {
    /// Creates a new `OpenAiAnalysisAdapter`. Every call is abandoned after `timeout`.
    pub fn new(client: Client<OpenAIConfig>, model: String, timeout: Duration) -> Self {
        Self {
            client,
            model,
            timeout,
        }
    }
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for OpenAiAnalysisAdapter {
    /// Asks the model for the journal analysis JSON and returns the completion text as-is.
    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete_analysis(&self, transcript: &str) -> PortResult<String> {
        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(PortError::EmptyTranscript);
        }

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(transcript)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .max_tokens(MAX_COMPLETION_TOKENS)
            .temperature(TEMPERATURE)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!("Sending analysis request");
        let response = tokio::time::timeout(self.timeout, self.client.chat().create(request))
            .await
            .map_err(|_| {
                PortError::UpstreamUnavailable(format!(
                    "no completion within {} seconds",
                    self.timeout.as_secs_f32()
                ))
            })?
            .map_err(|e: OpenAIError| PortError::UpstreamUnavailable(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                PortError::UpstreamUnavailable(
                    "analysis LLM response contained no text content".to_string(),
                )
            })
    }
}
