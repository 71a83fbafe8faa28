use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::common::*;
use crate::form::{
    FailureReason, FieldName, NoticeTexts, Severity, SubmissionController, SubmissionResult,
    SubmissionStatus, SubmitError,
};

#[tokio::test]
async fn valid_record_is_sent_once_with_numeric_fields() {
    let controller = SubmissionController::new(RecordingTransport::responding(json!({
        "id": 42
    })));

    let result = controller
        .submit(&valid_values())
        .await
        .expect("controller is idle");

    assert_eq!(result, SubmissionResult::Success(json!({ "id": 42 })));
    let bodies = controller.transport().sent_bodies();
    assert_eq!(bodies.len(), 1);

    let body = &bodies[0];
    assert_eq!(body["name"], "Квартира у парка");
    assert_eq!(body["totalFloors"].as_f64(), Some(10.0));
    assert_eq!(body["floor"].as_f64(), Some(4.0));
    assert_eq!(body["square"].as_f64(), Some(62.5));
    assert_eq!(body["livingSquare"].as_f64(), Some(38.0));
    assert_eq!(body["kitchenSquare"].as_f64(), Some(12.0));
    assert_eq!(body["isResidential"], "жилое");
    assert_eq!(body["isProcessing"], true);
    assert_eq!(controller.status(), SubmissionStatus::Idle);
}

#[tokio::test]
async fn transport_failure_carries_message_and_clears_flag() {
    let controller = SubmissionController::new(RecordingTransport::scripted(Scripted::Fail(
        "connection reset".to_string(),
    )));
    let values = valid_values();

    let result = controller.submit(&values).await.expect("controller is idle");

    assert_eq!(
        result,
        SubmissionResult::Failure(FailureReason::Described("connection reset".to_string()))
    );
    assert!(!controller.is_submitting());
    assert_eq!(values, valid_values());
}

#[tokio::test]
async fn non_success_status_is_a_described_failure() {
    let controller =
        SubmissionController::new(RecordingTransport::scripted(Scripted::Status(503)));

    let result = controller
        .submit(&valid_values())
        .await
        .expect("controller is idle");

    assert_eq!(
        result,
        SubmissionResult::Failure(FailureReason::Described(
            "server responded with status 503".to_string()
        ))
    );
}

#[tokio::test]
async fn opaque_fault_is_reported_as_unknown() {
    let controller = SubmissionController::new(RecordingTransport::scripted(Scripted::Unknown));

    let result = controller
        .submit(&valid_values())
        .await
        .expect("controller is idle");

    assert_eq!(result, SubmissionResult::Failure(FailureReason::Unknown));
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn unencodable_record_fails_without_a_request() {
    let controller = SubmissionController::new(RecordingTransport::responding(json!({})));
    let mut values = valid_values();
    values
        .set(FieldName::Square, "сорок")
        .expect("numeric fields take any text");

    let result = controller.submit(&values).await.expect("controller is idle");

    match result {
        SubmissionResult::Failure(FailureReason::Described(message)) => {
            assert!(message.contains("square"), "message: {message}");
        }
        other => panic!("expected encoding failure, got {other:?}"),
    }
    assert!(controller.transport().sent_bodies().is_empty());
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn second_submit_while_in_flight_is_rejected() {
    let transport = Arc::new(GatedTransport::default());
    let controller = SubmissionController::new(transport.clone());
    let values = valid_values();

    let (first, second) = tokio::join!(controller.submit(&values), async {
        transport.started.notified().await;
        assert_eq!(controller.status(), SubmissionStatus::Submitting);
        assert!(controller.in_flight().is_set());
        let second = controller.submit(&values).await;
        transport.release.notify_one();
        second
    });

    assert!(matches!(first, Ok(SubmissionResult::Success(_))));
    assert_eq!(second, Err(SubmitError::InFlight));
    assert_eq!(transport.call_count(), 1);
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn dropped_submission_still_clears_flag() {
    let transport = Arc::new(GatedTransport::default());
    let controller = SubmissionController::new(transport.clone());
    let values = valid_values();

    tokio::select! {
        _ = controller.submit(&values) => panic!("gated transport never completes"),
        _ = transport.started.notified() => {}
    }

    assert!(!controller.is_submitting());
    transport.release.notify_one();
    assert!(matches!(
        controller.submit(&values).await,
        Ok(SubmissionResult::Success(_))
    ));
    assert_eq!(transport.call_count(), 2);
}

#[tokio::test]
async fn panicking_transport_becomes_described_failure() {
    let controller = SubmissionController::new(PanickingTransport::Formatted(8080));

    let result = controller
        .submit(&valid_values())
        .await
        .expect("controller is idle");

    assert_eq!(
        result,
        SubmissionResult::Failure(FailureReason::Described(
            "socket on port 8080 closed".to_string()
        ))
    );
    assert!(!controller.is_submitting());
}

#[tokio::test]
async fn panic_with_static_message_keeps_the_message() {
    let controller = SubmissionController::new(PanickingTransport::Message("socket layer blew up"));

    let result = controller
        .submit(&valid_values())
        .await
        .expect("controller is idle");

    assert_eq!(
        result,
        SubmissionResult::Failure(FailureReason::Described(
            "socket layer blew up".to_string()
        ))
    );
}

#[tokio::test]
async fn opaque_panic_payload_is_reported_as_unknown() {
    let controller = SubmissionController::new(PanickingTransport::Opaque);

    let result = controller
        .submit(&valid_values())
        .await
        .expect("controller is idle");

    assert_eq!(result, SubmissionResult::Failure(FailureReason::Unknown));
    assert_eq!(controller.status(), SubmissionStatus::Idle);
}

#[test]
fn notifications_distinguish_described_and_unknown_faults() {
    let texts = NoticeTexts::default();
    let duration = Duration::from_millis(5000);

    let success = SubmissionResult::Success(json!({})).notification(&texts, duration);
    assert_eq!(success.title, "Данные успешно отправлены!");
    assert_eq!(success.description, "Запись была добавлена в базу данных.");
    assert_eq!(success.severity, Severity::Success);
    assert_eq!(success.duration(), duration);
    assert!(success.closable);

    let described = SubmissionResult::Failure(FailureReason::Described("timeout".to_string()))
        .notification(&texts, duration);
    assert_eq!(described.title, "Ошибка отправки данных");
    assert_eq!(described.description, "timeout");
    assert_eq!(described.severity, Severity::Error);

    let blank = SubmissionResult::Failure(FailureReason::Described(String::new()))
        .notification(&texts, duration);
    assert_eq!(blank.description, "Что-то пошло не так.");

    let unknown =
        SubmissionResult::Failure(FailureReason::Unknown).notification(&texts, duration);
    assert_eq!(unknown.title, "Неизвестная ошибка");
    assert_eq!(unknown.description, "Произошло что-то непредсказуемое.");
}
