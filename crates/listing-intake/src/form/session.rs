use std::collections::BTreeSet;
use std::time::Duration;

use super::domain::{FieldName, FieldValueError, FormValues};
use super::messages::NoticeTexts;
use super::submission::{
    InFlightFlag, Notification, SubmissionController, SubmissionResult, SubmitError,
};
use super::transport::SubmissionTransport;
use super::validator::{ErrorMap, SchemaValidator};

/// Outcome of [`ListingForm::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAttempt {
    /// Validation failed; nothing was sent.
    Invalid(ErrorMap),
    Rejected(SubmitError),
    Completed(SubmissionResult),
}

/// State of one listing form: entered values, touched fields and the
/// notification from the latest submission attempt.
///
/// Values survive every submission outcome; only [`ListingForm::reset`] clears them.
#[derive(Debug)]
pub struct ListingForm<T> {
    values: FormValues,
    touched: BTreeSet<FieldName>,
    validator: SchemaValidator,
    controller: SubmissionController<T>,
    texts: NoticeTexts,
    notice_duration: Duration,
    notification: Option<Notification>,
}

impl<T> ListingForm<T>
where
    T: SubmissionTransport,
{
    pub fn new(
        validator: SchemaValidator,
        controller: SubmissionController<T>,
        texts: NoticeTexts,
        notice_duration: Duration,
    ) -> Self {
        Self::with_values(
            FormValues::default(),
            validator,
            controller,
            texts,
            notice_duration,
        )
    }

    pub fn with_values(
        values: FormValues,
        validator: SchemaValidator,
        controller: SubmissionController<T>,
        texts: NoticeTexts,
        notice_duration: Duration,
    ) -> Self {
        Self {
            values,
            touched: BTreeSet::new(),
            validator,
            controller,
            texts,
            notice_duration,
            notification: None,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn change(
        &mut self,
        field: FieldName,
        value: impl Into<String>,
    ) -> Result<(), FieldValueError> {
        self.values.set(field, value)
    }

    pub fn blur(&mut self, field: FieldName) {
        self.touched.insert(field);
    }

    pub fn is_touched(&self, field: FieldName) -> bool {
        self.touched.contains(&field)
    }

    pub fn errors(&self) -> ErrorMap {
        self.validator.validate(&self.values)
    }

    /// Errors of fields the user has already visited.
    pub fn visible_errors(&self) -> ErrorMap {
        self.errors().only(&self.touched)
    }

    pub fn is_submitting(&self) -> bool {
        self.controller.is_submitting()
    }

    pub fn in_flight(&self) -> InFlightFlag {
        self.controller.in_flight()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
    }

    /// Validate, then hand the record to the controller. Every field counts
    /// as touched afterwards so all errors become visible.
    pub async fn submit(&mut self) -> SubmitAttempt {
        self.touched.extend(FieldName::all());

        let errors = self.validator.validate(&self.values);
        if !errors.is_empty() {
            return SubmitAttempt::Invalid(errors);
        }

        match self.controller.submit(&self.values).await {
            Ok(result) => {
                self.notification = Some(result.notification(&self.texts, self.notice_duration));
                SubmitAttempt::Completed(result)
            }
            Err(err) => SubmitAttempt::Rejected(err),
        }
    }

    pub fn reset(&mut self) {
        self.values = FormValues::default();
        self.touched.clear();
        self.notification = None;
    }
}
