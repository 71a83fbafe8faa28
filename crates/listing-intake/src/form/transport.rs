use std::future::Future;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("server responded with status {status}")]
    Status { status: u16, body: String },
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
    #[error("{0}")]
    Other(String),
    #[error("unknown transport fault")]
    Unknown,
}

impl TransportError {
    /// Message suitable for the user, or `None` for faults that carry nothing identifiable.
    pub fn description(&self) -> Option<String> {
        match self {
            TransportError::Unknown => None,
            other => Some(other.to_string()),
        }
    }

    /// Body the endpoint sent along with a non-success status.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            TransportError::Status { body, .. } if !body.is_empty() => Some(body.as_str()),
            _ => None,
        }
    }
}

/// Outbound seam of the submission controller: one call, one request.
pub trait SubmissionTransport: Send + Sync {
    /// Deliver a JSON-encoded body and return the decoded response payload.
    fn send(&self, body: Vec<u8>) -> impl Future<Output = Result<Value, TransportError>> + Send;

    fn endpoint(&self) -> &str;
}

/// `POST`s the listing to a fixed endpoint with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }
}

impl SubmissionTransport for HttpTransport {
    async fn send(&self, body: Vec<u8>) -> Result<Value, TransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), endpoint = %self.endpoint, "listing endpoint responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| TransportError::Decode(err.to_string()))
    }

    fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}
