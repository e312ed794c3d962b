//! In-process providers and fixtures shared by the unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use forge_ai::{AiProvider, ChatRequest, ChatResponse, FinishReason, ProviderError, TokenUsage};

use crate::types::McqItem;

pub fn mcq(id: &str, correct: &str) -> McqItem {
    McqItem {
        id: id.into(),
        question: format!("Question {id}?"),
        options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct_option: correct.into(),
        difficulty: None,
        explanation: None,
    }
}

fn reply(content: &str, model: &str) -> ChatResponse {
    ChatResponse {
        content: content.to_string(),
        model: model.to_string(),
        usage: TokenUsage::default(),
        finish_reason: FinishReason::Stop,
    }
}

/// Answers every request with the same text and records what it was sent.
pub struct ScriptedProvider {
    reply: String,
    calls: AtomicUsize,
    last: Mutex<Option<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
            last: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl AiProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(request.clone());
        Ok(reply(&self.reply, &request.model))
    }
}

/// Always fails as if the network were down.
pub struct FailingProvider;

#[async_trait]
impl AiProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn chat(&self, _request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        Err(ProviderError::Network("connection refused".into()))
    }
}

/// Replies only after a delay.
pub struct SlowProvider {
    delay: Duration,
    reply: String,
}

impl SlowProvider {
    pub fn new(delay: Duration, reply: impl Into<String>) -> Self {
        Self {
            delay,
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl AiProvider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ProviderError> {
        tokio::time::sleep(self.delay).await;
        Ok(reply(&self.reply, &request.model))
    }
}
