use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::domain::{FormValues, ListingPayload};
use super::messages::NoticeTexts;
use super::transport::SubmissionTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Idle,
    Submitting,
}

/// Terminal outcome of one submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    Success(Value),
    Failure(FailureReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Described(String),
    Unknown,
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success(_))
    }

    pub fn notification(&self, texts: &NoticeTexts, duration: Duration) -> Notification {
        let (title, description, severity) = match self {
            SubmissionResult::Success(_) => (
                texts.success_title.clone(),
                texts.success_description.clone(),
                Severity::Success,
            ),
            SubmissionResult::Failure(FailureReason::Described(message)) => {
                let description = if message.trim().is_empty() {
                    texts.failure_fallback.clone()
                } else {
                    message.clone()
                };
                (texts.failure_title.clone(), description, Severity::Error)
            }
            SubmissionResult::Failure(FailureReason::Unknown) => (
                texts.unknown_title.clone(),
                texts.unknown_description.clone(),
                Severity::Error,
            ),
        };

        Notification {
            title,
            description,
            severity,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            closable: true,
            issued_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Error,
}

/// Transient, dismissible notice raised once per submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub duration_ms: u64,
    pub closable: bool,
    pub issued_at: DateTime<Utc>,
}

impl Notification {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("a submission is already in flight")]
    InFlight,
}

/// Read-only view of the controller's in-flight flag.
#[derive(Debug, Clone)]
pub struct InFlightFlag(Arc<AtomicBool>);

impl InFlightFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Clears the flag on every exit path, including a dropped future.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sends pre-validated listings and tracks whether one is outstanding.
#[derive(Debug)]
pub struct SubmissionController<T> {
    transport: T,
    in_flight: Arc<AtomicBool>,
}

impl<T> SubmissionController<T>
where
    T: SubmissionTransport,
{
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn status(&self) -> SubmissionStatus {
        if self.is_submitting() {
            SubmissionStatus::Submitting
        } else {
            SubmissionStatus::Idle
        }
    }

    pub fn in_flight(&self) -> InFlightFlag {
        InFlightFlag(self.in_flight.clone())
    }

    /// Issue exactly one request for `values`. Callers validate first; faults,
    /// including a panicking transport, come back as [`SubmissionResult::Failure`],
    /// and a second call while one is outstanding is refused without touching
    /// the transport.
    pub async fn submit(&self, values: &FormValues) -> Result<SubmissionResult, SubmitError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or_else(|| {
            warn!("submission ignored while another is in flight");
            SubmitError::InFlight
        })?;

        let endpoint = self.transport.endpoint();
        let body = match encode(values) {
            Ok(body) => body,
            Err(reason) => {
                warn!(%endpoint, %reason, "listing could not be encoded");
                return Ok(SubmissionResult::Failure(FailureReason::Described(reason)));
            }
        };

        info!(%endpoint, bytes = body.len(), "submitting listing");

        let sent = AssertUnwindSafe(self.transport.send(body))
            .catch_unwind()
            .await;

        let result = match sent {
            Ok(Ok(payload)) => {
                info!(%endpoint, response = %payload, "listing accepted");
                SubmissionResult::Success(payload)
            }
            Ok(Err(err)) => {
                warn!(
                    %endpoint,
                    error = %err,
                    response_body = err.response_body().unwrap_or_default(),
                    "listing submission failed"
                );
                SubmissionResult::Failure(
                    err.description()
                        .map(FailureReason::Described)
                        .unwrap_or(FailureReason::Unknown),
                )
            }
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                warn!(
                    %endpoint,
                    reason = reason.as_deref().unwrap_or("<opaque>"),
                    "transport panicked"
                );
                SubmissionResult::Failure(
                    reason
                        .map(FailureReason::Described)
                        .unwrap_or(FailureReason::Unknown),
                )
            }
        };

        Ok(result)
    }
}

/// Panics raised with `panic!("...")` carry a `&str` or `String`; anything else is opaque.
fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
}

fn encode(values: &FormValues) -> Result<Vec<u8>, String> {
    let payload = ListingPayload::try_from(values).map_err(|err| err.to_string())?;
    serde_json::to_vec(&payload).map_err(|err| err.to_string())
}
