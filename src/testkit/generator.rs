//! Mock [`ImageGenerator`] for testing.
//!
//! [`ScriptedGenerator`] pops one pre-loaded result per call (defaults to
//! "no image" when exhausted) and records every call. A gated generator
//! blocks inside `generate` until [`ScriptedGenerator::release`] is called,
//! which lets tests hold a request in flight.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{Notify, Semaphore};

use crate::domain::Credential;
use crate::error::Result;
use crate::port::outbound::generator::{GenerateRequest, GeneratedImage, ImageGenerator};

/// One recorded `generate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub credential: String,
    pub mime_type: String,
    pub image: Vec<u8>,
    pub prompt: String,
}

/// A mock generator with scripted results.
pub struct ScriptedGenerator {
    results: Mutex<VecDeque<Result<Option<GeneratedImage>>>>,
    calls: Mutex<Vec<RecordedCall>>,
    call_count: AtomicUsize,
    connection_result: Mutex<Option<Result<()>>>,
    gate: Option<Semaphore>,
    entered: Notify,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
            connection_result: Mutex::new(None),
            gate: None,
            entered: Notify::new(),
        }
    }

    /// A generator whose calls block until [`release`](Self::release).
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    /// Queue a result for the next call.
    pub fn push(&self, result: Result<Option<GeneratedImage>>) {
        self.results.lock().push_back(result);
    }

    /// Queue a successful image for the next call.
    pub fn push_image(&self, mime_type: &str, data: Vec<u8>) {
        self.push(Ok(Some(GeneratedImage {
            mime_type: Some(mime_type.to_string()),
            data,
        })));
    }

    /// Script the next `test_connection` result (defaults to `Ok`).
    pub fn set_connection_result(&self, result: Result<()>) {
        *self.connection_result.lock() = Some(result);
    }

    /// Let one blocked call proceed.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    /// Wait until a call has entered `generate`.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Number of `generate` calls issued.
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every recorded call, in order.
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Prompts of every recorded call, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().iter().map(|c| c.prompt.clone()).collect()
    }
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerator for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, request: GenerateRequest<'_>) -> Result<Option<GeneratedImage>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(RecordedCall {
            credential: request.credential.expose().to_string(),
            mime_type: request.mime_type.to_string(),
            image: request.image.to_vec(),
            prompt: request.prompt.to_string(),
        });
        self.entered.notify_one();

        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }

        self.results.lock().pop_front().unwrap_or(Ok(None))
    }

    async fn test_connection(&self, _credential: &Credential) -> Result<()> {
        self.connection_result.lock().take().unwrap_or(Ok(()))
    }
}
