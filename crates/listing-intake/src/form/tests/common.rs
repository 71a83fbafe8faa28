use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{json, Value};
use tokio::sync::Notify;

use crate::form::{
    FormValues, ListingForm, NoticeTexts, SchemaValidator, SubmissionController,
    SubmissionTransport, TransportError,
};

pub(super) fn valid_values() -> FormValues {
    FormValues {
        name: "Квартира у парка".to_string(),
        address: "Москва, ул. Садовая, 10".to_string(),
        total_floors: "10".to_string(),
        floor: "4".to_string(),
        square: "62.5".to_string(),
        living_square: "38".to_string(),
        kitchen_square: "12".to_string(),
        is_processing: true,
        is_residential: "жилое".to_string(),
    }
}

pub(super) fn validator() -> SchemaValidator {
    SchemaValidator::default()
}

#[derive(Debug, Clone)]
pub(super) enum Scripted {
    Respond(Value),
    Fail(String),
    Status(u16),
    Unknown,
}

/// Transport that records every body it is asked to send.
#[derive(Debug)]
pub(super) struct RecordingTransport {
    pub(super) script: Scripted,
    pub(super) sent: Mutex<Vec<Vec<u8>>>,
}

impl RecordingTransport {
    pub(super) fn responding(payload: Value) -> Self {
        Self::scripted(Scripted::Respond(payload))
    }

    pub(super) fn scripted(script: Scripted) -> Self {
        Self {
            script,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn sent_bodies(&self) -> Vec<Value> {
        self.sent
            .lock()
            .expect("sent mutex poisoned")
            .iter()
            .map(|body| serde_json::from_slice(body).expect("body is JSON"))
            .collect()
    }
}

impl SubmissionTransport for RecordingTransport {
    async fn send(&self, body: Vec<u8>) -> Result<Value, TransportError> {
        self.sent.lock().expect("sent mutex poisoned").push(body);
        match &self.script {
            Scripted::Respond(payload) => Ok(payload.clone()),
            Scripted::Fail(message) => Err(TransportError::Other(message.clone())),
            Scripted::Status(status) => Err(TransportError::Status {
                status: *status,
                body: String::new(),
            }),
            Scripted::Unknown => Err(TransportError::Unknown),
        }
    }

    fn endpoint(&self) -> &str {
        "memory://listings"
    }
}

/// Transport whose send panics, either with a message or an opaque payload.
#[derive(Debug)]
pub(super) enum PanickingTransport {
    Message(&'static str),
    Formatted(u16),
    Opaque,
}

impl SubmissionTransport for PanickingTransport {
    async fn send(&self, _body: Vec<u8>) -> Result<Value, TransportError> {
        match self {
            PanickingTransport::Message(message) => panic!("{}", message),
            PanickingTransport::Formatted(port) => panic!("socket on port {port} closed"),
            PanickingTransport::Opaque => std::panic::panic_any(7_u32),
        }
    }

    fn endpoint(&self) -> &str {
        "memory://panicking"
    }
}

/// Transport that holds the request open until released.
#[derive(Debug, Default)]
pub(super) struct GatedTransport {
    pub(super) started: Notify,
    pub(super) release: Notify,
    pub(super) calls: Mutex<usize>,
}

impl GatedTransport {
    pub(super) fn call_count(&self) -> usize {
        *self.calls.lock().expect("calls mutex poisoned")
    }
}

impl SubmissionTransport for Arc<GatedTransport> {
    async fn send(&self, _body: Vec<u8>) -> Result<Value, TransportError> {
        *self.calls.lock().expect("calls mutex poisoned") += 1;
        self.started.notify_one();
        self.release.notified().await;
        Ok(json!({ "id": 1 }))
    }

    fn endpoint(&self) -> &str {
        "memory://gated"
    }
}

pub(super) fn form_with(
    transport: RecordingTransport,
    values: FormValues,
) -> ListingForm<RecordingTransport> {
    ListingForm::with_values(
        values,
        validator(),
        SubmissionController::new(transport),
        NoticeTexts::default(),
        Duration::from_millis(5000),
    )
}
