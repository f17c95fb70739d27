//! Oracle boundary
//!
//! An oracle turns a prompt into free text. It is a fallible black box: every
//! caller in this crate has a fallback for when it cannot be reached.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::NarratorConfig;

/// Oracle failures
#[derive(Debug, Error)]
pub enum OracleError {
    /// Transport failure, timeout, or a non-success status
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    /// The oracle answered, but not in the expected shape
    #[error("malformed oracle response: {0}")]
    MalformedResponse(String),
}

/// Text completion service
pub trait Oracle {
    fn complete(&self, prompt: &str, temperature: f64) -> Result<String, OracleError>;
}

impl<O: Oracle + ?Sized> Oracle for &O {
    fn complete(&self, prompt: &str, temperature: f64) -> Result<String, OracleError> {
        (**self).complete(prompt, temperature)
    }
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn complete(&self, prompt: &str, temperature: f64) -> Result<String, OracleError> {
        (**self).complete(prompt, temperature)
    }
}

/// Always unavailable, so every call takes its fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineOracle;

impl Oracle for OfflineOracle {
    fn complete(&self, _prompt: &str, _temperature: f64) -> Result<String, OracleError> {
        Err(OracleError::Unavailable("offline mode".to_string()))
    }
}

/// Client for an Ollama server's non-streaming chat endpoint
#[derive(Debug, Clone)]
pub struct OllamaOracle {
    client: reqwest::blocking::Client,
    url: String,
    model: String,
}

impl OllamaOracle {
    pub fn new(config: &NarratorConfig) -> Result<Self, OracleError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            url: config.chat_url(),
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Oracle for OllamaOracle {
    fn complete(&self, prompt: &str, temperature: f64) -> Result<String, OracleError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            options: ChatOptions { temperature },
        };

        let started = Instant::now();
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            return Err(OracleError::Unavailable(format!("{}: {}", status, body)));
        }

        let reply: ChatResponse = response
            .json()
            .map_err(|e| OracleError::MalformedResponse(e.to_string()))?;

        tracing::debug!(
            "Oracle {} answered in {} ms",
            self.model,
            started.elapsed().as_millis()
        );

        Ok(reply.message.content.trim().to_string())
    }
}

// Ollama chat API types
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f64,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}
