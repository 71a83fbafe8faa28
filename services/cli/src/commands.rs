use crate::cli::{RecordArgs, SubmitArgs};
use listing_intake::config::{parse_endpoint, AppConfig};
use listing_intake::error::AppError;
use listing_intake::form::{
    ErrorMap, FailureReason, FormValues, HttpTransport, ListingForm, SubmissionController,
    SubmissionResult, SubmitAttempt,
};
use listing_intake::telemetry;
use std::io::Read;
use tracing::info;

impl RecordArgs {
    fn load(&self) -> Result<FormValues, AppError> {
        let raw = if self.input.as_os_str() == "-" {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        } else {
            std::fs::read_to_string(&self.input)?
        };

        let mut values: FormValues = serde_json::from_str(&raw)?;
        for (field, value) in &self.overrides {
            values.set(*field, value.clone())?;
        }
        Ok(values)
    }
}

fn print_errors(errors: &ErrorMap) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(errors)?);
    Ok(())
}

pub(crate) fn run_validate(args: RecordArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let values = args.load()?;
    let errors = config.validation.validator().validate(&values);
    print_errors(&errors)?;

    if errors.is_empty() {
        info!("listing record is valid");
        Ok(())
    } else {
        Err(AppError::Invalid(errors))
    }
}

pub(crate) async fn run_submit(args: SubmitArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(endpoint) = args.endpoint.as_deref() {
        config.submission.endpoint = parse_endpoint(endpoint)?;
    }
    telemetry::init(&config.telemetry)?;

    let values = args.record.load()?;
    let transport = HttpTransport::new(config.submission.endpoint.clone());
    let mut form = ListingForm::with_values(
        values,
        config.validation.validator(),
        SubmissionController::new(transport),
        config.submission.notices.clone(),
        config.submission.notice_duration,
    );

    info!(
        ?config.environment,
        endpoint = %config.submission.endpoint,
        "submitting listing record"
    );

    match form.submit().await {
        SubmitAttempt::Invalid(errors) => {
            print_errors(&errors)?;
            Err(AppError::Invalid(errors))
        }
        SubmitAttempt::Rejected(err) => Err(err.into()),
        SubmitAttempt::Completed(result) => {
            if let Some(notice) = form.notification() {
                println!("{}", serde_json::to_string_pretty(notice)?);
            }
            match result {
                SubmissionResult::Success(_) => Ok(()),
                SubmissionResult::Failure(FailureReason::Described(reason)) => {
                    Err(AppError::Rejected(reason))
                }
                SubmissionResult::Failure(FailureReason::Unknown) => {
                    Err(AppError::Rejected("unknown fault".to_string()))
                }
            }
        }
    }
}
