//! Chat-completion classifier that picks a toggle list for a note.
//!
//! Used by the "Use AI" mode: each fragment is sent to an OpenAI-compatible
//! `chat/completions` endpoint together with the candidate list names, and the
//! model answers with one of them. Any failure falls back to the first candidate.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use url::Url;

use togglenote_shared::{ClassifierConfig, Result, TogglenoteError};

/// Timeout for a single classification call.
const CLASSIFY_TIMEOUT_SECS: u64 = 30;

const MAX_TOKENS: u32 = 10;
const TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str = "You are a categorization assistant.";

/// Picks one of several toggle list names for a note.
pub trait NoteClassifier: Send + Sync {
    /// Return one of `candidates`. Callers guarantee `candidates` is non-empty.
    fn classify(&self, note: &str, candidates: &[String]) -> impl Future<Output = String> + Send;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

// ---------------------------------------------------------------------------
// ChatClassifier
// ---------------------------------------------------------------------------

/// [`NoteClassifier`] backed by an OpenAI-compatible chat API.
#[derive(Debug, Clone)]
pub struct ChatClassifier {
    client: Client,
    endpoint: Url,
    model: String,
    /// `None` disables remote calls; every note then goes to the first candidate.
    api_key: Option<String>,
}

impl ChatClassifier {
    /// Build from config, reading the API key from the configured env var.
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        Self::new(config, config.api_key())
    }

    pub fn new(config: &ClassifierConfig, api_key: Option<String>) -> Result<Self> {
        let endpoint = config
            .base_url()?
            .join("chat/completions")
            .map_err(|e| TogglenoteError::config(format!("invalid classifier URL: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(CLASSIFY_TIMEOUT_SECS))
            .build()
            .map_err(|e| TogglenoteError::Network(format!("failed to build HTTP client: {e}")))?;

        if api_key.is_none() {
            warn!(
                env = %config.api_key_env,
                "classifier API key not set; \"Use AI\" notes go to the first list"
            );
        }

        Ok(Self {
            client,
            endpoint,
            model: config.model.clone(),
            api_key,
        })
    }

    /// Ask the model for a category; returns its raw (trimmed) answer.
    async fn ask(&self, note: &str, candidates: &[String]) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| TogglenoteError::Classifier("no API key configured".into()))?;

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".into(),
                    content: SYSTEM_PROMPT.into(),
                },
                ChatMessage {
                    role: "user".into(),
                    content: build_prompt(note, candidates),
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TogglenoteError::Classifier(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TogglenoteError::Classifier(format!("HTTP {status}")));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| TogglenoteError::Classifier(format!("invalid response: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| TogglenoteError::Classifier("response had no choices".into()))
    }
}

impl NoteClassifier for ChatClassifier {
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    async fn classify(&self, note: &str, candidates: &[String]) -> String {
        let fallback = candidates.first().cloned().unwrap_or_default();

        match self.ask(note, candidates).await {
            Ok(answer) if candidates.contains(&answer) => {
                info!(list = %answer, "note classified");
                answer
            }
            Ok(answer) => {
                warn!(%answer, %fallback, "unexpected classifier answer, using first list");
                fallback
            }
            Err(e) => {
                warn!(error = %e, %fallback, "classification failed, using first list");
                fallback
            }
        }
    }
}

fn build_prompt(note: &str, candidates: &[String]) -> String {
    let lists = candidates
        .iter()
        .map(|c| format!("'{c}'"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a classifier that categorizes notes into specific lists. \
         Given the following note, classify it into exactly one of these categories: {lists}. \
         Note to classify: '{note}'\n\n\
         Respond with ONLY the category name, nothing else. \
         If unsure, choose the first category."
    )
}
