//! AI provider trait and implementations.
//!
//! Each provider module exposes a struct that implements [`AiProvider`].

pub mod gemini;

use async_trait::async_trait;

use crate::types::{ChatRequest, ChatResponse};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that any provider may return.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited")]
    RateLimit,

    #[error("Invalid API key")]
    InvalidKey,

    #[error("Model not available: {0}")]
    ModelUnavailable(String),

    #[error("Timeout")]
    Timeout,

    #[error("Provider returned no text")]
    EmptyResponse,

    #[error("Provider error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Unified interface for text-generation backends.
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Human-readable display name.
    fn name(&self) -> &str;

    /// Whether the provider is configured well enough to attempt a call.
    async fn is_available(&self) -> bool;

    /// Non-streaming completion.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError>;
}
