//! Fakes shared by the unit tests of this crate.

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Notify;

use crate::{
    error::TransportError,
    flow::AnalysisFlow,
    service::{AnalysisRequest, AnalysisService, ServiceReply},
};

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Echo {
    #[serde(default)]
    pub value: String,
}

pub struct EchoFlow;

impl AnalysisFlow for EchoFlow {
    type Output = Echo;

    fn id(&self) -> &str {
        "echo"
    }

    fn endpoint(&self) -> &str {
        "/api/echo"
    }

    fn flag_field(&self) -> &str {
        "loud"
    }

    fn default_error(&self) -> &str {
        "Failed to echo"
    }

    fn render(&self, output: &Echo) -> String {
        output.value.clone()
    }
}

pub fn reply(status: u16, body: &str) -> ServiceReply {
    ServiceReply {
        status,
        body: body.to_string(),
    }
}

/// Answers every call with a canned reply and remembers what was sent.
pub struct RecordingService {
    reply: Mutex<Result<ServiceReply, String>>,
    requests: Mutex<Vec<(String, String, String)>>,
    calls: AtomicUsize,
}

impl RecordingService {
    pub fn replying(status: u16, body: &str) -> Self {
        Self {
            reply: Mutex::new(Ok(reply(status, body))),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Mutex::new(Err(message.to_string())),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_reply(&self, status: u16, body: &str) {
        *self.reply.lock().unwrap() = Ok(reply(status, body));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(endpoint, flag field, flag value)` per call
    pub fn recorded(&self) -> Vec<(String, String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisService for RecordingService {
    async fn submit(&self, request: AnalysisRequest<'_>) -> Result<ServiceReply, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((
            request.endpoint.to_string(),
            request.flag_field.to_string(),
            request.flag_value().to_string(),
        ));
        self.reply
            .lock()
            .unwrap()
            .clone()
            .map_err(|message| {
                TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    message,
                ))
            })
    }
}

/// Holds every call until [`GatedService::release`] is called.
pub struct GatedService {
    gate: Notify,
    reply: ServiceReply,
    calls: AtomicUsize,
}

impl GatedService {
    pub fn replying(status: u16, body: &str) -> Self {
        Self {
            gate: Notify::new(),
            reply: reply(status, body),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnalysisService for GatedService {
    async fn submit(&self, _request: AnalysisRequest<'_>) -> Result<ServiceReply, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.notified().await;
        Ok(self.reply.clone())
    }
}

/// Never answers.
pub struct PendingService;

#[async_trait]
impl AnalysisService for PendingService {
    async fn submit(&self, _request: AnalysisRequest<'_>) -> Result<ServiceReply, TransportError> {
        std::future::pending().await
    }
}
