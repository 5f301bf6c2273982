//! End-to-end lifecycle scenarios over the full stack:
//! scripted transport -> integrity interceptor -> pipeline -> reconciler.

use formpipe_core::prelude::*;
use formpipe_core::{RawError, RawEvent, RawResponse};
use formpipe_test_utils::{ok_envelope, validation_error, RecordingNotifier, ScriptedTransport};
use serde_json::json;
use std::sync::Arc;

struct Stack {
    transport: Intercepted<ScriptedTransport>,
    notifier: Arc<RecordingNotifier>,
    pipeline: RequestPipeline,
}

fn stack(scripts: Vec<Vec<RawEvent>>) -> Stack {
    let notifier = Arc::new(RecordingNotifier::new());
    let config = LifecycleConfig::default();
    let transport = Intercepted::new(
        ScriptedTransport::sequence(scripts),
        notifier.clone(),
        config.clone(),
    );
    let pipeline = RequestPipeline::new(notifier.clone(), config);
    Stack {
        transport,
        notifier,
        pipeline,
    }
}

fn put_user(body: serde_json::Value) -> RequestDescriptor {
    RequestDescriptor::new(Method::Put, "/users/1").with_body(body)
}

#[tokio::test]
async fn duplicate_name_shows_server_message_on_the_field() {
    // Scenario A: a 400 with a duplicate_name error lands on the name field
    // verbatim and leaves other fields' errors untouched.
    let mut stack = stack(vec![vec![RawEvent::Failed(validation_error(vec![(
        "name",
        "duplicate_name",
        "There is already a user with this name.",
    )]))]]);

    let mut form = FormState::with_fields(["name", "email"]);
    let saved = Record::from_value(json!({"name": "ada", "email": "a@b.c"})).unwrap();
    update_form(&mut form, &saved);
    form.set_value("name", json!("dup"));

    let terminal = stack
        .pipeline
        .execute(&stack.transport, put_user(json!({"name": "dup"})), &mut |_| {})
        .await;

    let Outcome::ValidationFailure(errors) = terminal else {
        panic!("expected validation failure");
    };
    let map = FieldErrorMap::from_payload(Some(&ValidationEnvelope {
        message: "Validation failed".to_string(),
        errors,
    }));
    set_errors(&mut form, &map);

    let name_errors = form.field_errors("name").expect("name errors present");
    assert_eq!(
        name_errors["duplicate_name"],
        "There is already a user with this name."
    );
    assert!(form.field_errors("email").is_none());
    // Validation failures never hit the notification channel.
    assert!(stack.notifier.messages().is_empty());
}

#[tokio::test]
async fn bare_failure_classifies_network_unreachable() {
    // Scenario B: no headers, not ok, no status, no counters.
    let mut stack = stack(vec![vec![RawEvent::Failed(RawError::unreached(
        "connection refused",
    ))]]);

    let terminal = stack
        .pipeline
        .execute(
            &stack.transport,
            RequestDescriptor::new(Method::Get, "/users/1"),
            &mut |_| {},
        )
        .await;

    assert_eq!(
        terminal,
        Outcome::TransportFailure {
            kind: TransportFailureKind::NetworkUnreachable,
            recoverable: true,
        }
    );
    assert_eq!(stack.notifier.messages().len(), 1);
    assert!(!stack.pipeline.in_progress());
}

#[tokio::test]
async fn malformed_success_classifies_and_notifies_once() {
    // Scenario C: 200 with a body missing the envelope.
    let mut stack = stack(vec![vec![RawEvent::Response(RawResponse::new(
        200,
        json!({"foo": "bar"}),
    ))]]);

    let terminal = stack
        .pipeline
        .execute(&stack.transport, put_user(json!({"name": "ada"})), &mut |_| {})
        .await;

    assert_eq!(
        terminal,
        Outcome::TransportFailure {
            kind: TransportFailureKind::MalformedResponse,
            recoverable: false,
        }
    );
    assert_eq!(stack.notifier.messages().len(), 1);
    assert!(!stack.pipeline.in_progress());
}

#[tokio::test]
async fn halfway_upload_reports_fifty_percent() {
    // Scenario D: loaded=5_000_000 of total=10_000_000.
    let mut stack = stack(vec![vec![
        RawEvent::UploadProgress {
            loaded: 5_000_000,
            total: Some(10_000_000),
        },
        RawEvent::Response(RawResponse::new(200, ok_envelope(json!({"id": 1})))),
    ]]);

    let mut outcomes = Vec::new();
    stack
        .pipeline
        .execute(&stack.transport, put_user(json!({"name": "ada"})), &mut |o| {
            outcomes.push(o);
        })
        .await;

    assert_eq!(outcomes[0], Outcome::Progress(50));
}

#[tokio::test]
async fn corrected_save_clears_errors_and_replaces_record() {
    // Scenario E: first save fails validation, second succeeds; afterwards
    // the field error is cleared and the record equals the new saved value.
    let mut stack = stack(vec![
        vec![RawEvent::Failed(validation_error(vec![(
            "name",
            "duplicate_name",
            "There is already a user with this name.",
        )]))],
        vec![RawEvent::Response(RawResponse::new(
            200,
            ok_envelope(json!({"id": 1, "name": "unique", "email": "a@b.c"})),
        ))],
    ]);

    let mut form = FormState::with_fields(["name", "email"]);

    // First save: rejected.
    let terminal = stack
        .pipeline
        .execute(&stack.transport, put_user(json!({"name": "dup"})), &mut |_| {})
        .await;
    let Outcome::ValidationFailure(errors) = terminal else {
        panic!("expected validation failure");
    };
    set_errors(
        &mut form,
        &FieldErrorMap::from_payload(Some(&ValidationEnvelope {
            message: "Validation failed".to_string(),
            errors,
        })),
    );
    assert!(form.field_errors("name").is_some());

    // Second save: corrected name, accepted.
    let terminal = stack
        .pipeline
        .execute(&stack.transport, put_user(json!({"name": "unique"})), &mut |_| {})
        .await;
    let Outcome::Success(record) = terminal else {
        panic!("expected success");
    };
    update_form(&mut form, &record);
    set_errors(&mut form, &FieldErrorMap::new());
    let last_saved = Some(record);

    assert!(form.field_errors("name").is_none());
    let saved = last_saved.as_ref().unwrap();
    assert_eq!(saved.get("name"), Some(&json!("unique")));
    assert!(is_pristine(&form, last_saved.as_ref()));
    assert!(stack.notifier.messages().is_empty());
}

#[tokio::test]
async fn in_flight_flags_reset_after_progress_and_success() {
    let notifier = Arc::new(RecordingNotifier::new());
    let config = LifecycleConfig::default();
    let transport = Intercepted::new(
        ScriptedTransport::single(vec![
            RawEvent::UploadProgress {
                loaded: 1,
                total: Some(2),
            },
            RawEvent::Response(RawResponse::new(200, ok_envelope(json!({"id": 1})))),
        ]),
        notifier.clone(),
        config.clone(),
    );
    let mut pipeline = RequestPipeline::new(notifier, config);

    pipeline
        .execute(
            &transport,
            put_user(json!({"name": "ada"})),
            &mut |_| {},
        )
        .await;

    assert!(!pipeline.in_progress());
    assert_eq!(pipeline.last_upload_percent(), 0);
}
