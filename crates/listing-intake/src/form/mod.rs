//! Listing form core: field rules, the schema validator, and the
//! submission controller that posts a validated record.

pub mod domain;
pub mod messages;
pub mod rules;
pub mod session;
pub mod submission;
pub mod transport;
pub mod validator;

#[cfg(test)]
mod tests;

pub use domain::{
    parse_flag, FieldName, FieldValueError, FormValues, ListingPayload, NumericInput, PayloadError,
    ResidentialStatus,
};
pub use messages::{MessageCatalog, NoticeTexts, RuleKind};
pub use rules::{FieldSchema, ListingLimits, Rule, Violation};
pub use session::{ListingForm, SubmitAttempt};
pub use submission::{
    FailureReason, InFlightFlag, Notification, Severity, SubmissionController, SubmissionResult,
    SubmissionStatus, SubmitError,
};
pub use transport::{HttpTransport, SubmissionTransport, TransportError};
pub use validator::{listing_schema, ErrorMap, SchemaValidator};
