mod common;

use booking_lifecycle::application::WebhookOutcome;
use booking_lifecycle::domain::booking::{BookingStatus, BookingSubmission, StatusChange};
use booking_lifecycle::domain::checkout::{CheckoutResource, CheckoutSubmission};
use booking_lifecycle::domain::notification::{Notification, Recipient};
use booking_lifecycle::domain::session::{SessionChange, SessionStatus};
use booking_lifecycle::error::MarketError;
use chrono::Utc;
use common::*;

#[tokio::test]
async fn test_paid_session_full_lifecycle() {
    let app = TestApp::new();
    let ada = app.add_profile("Ada", true).await;

    let redirect = app
        .state
        .checkout
        .initiate(CheckoutSubmission {
            professional_id: Some(ada.id.clone()),
            student_name: Some("Jane Doe".into()),
            student_email: Some("jane@brown.edu".into()),
        })
        .await
        .unwrap();
    assert!(redirect.url.starts_with("https://checkout.example/"));
    let metadata = app.provider.created.lock().unwrap()[0].metadata.clone();
    assert_eq!(metadata.student_email.as_deref(), Some("jane@brown.edu"));

    let payload = completed_checkout_event("cs_test_1", "pi_life", &ada, 20000);
    let outcome = app
        .state
        .webhooks
        .handle(&payload, Some(&sign(&payload)))
        .await
        .unwrap();
    let WebhookOutcome::SessionCreated(session) = outcome else {
        panic!("expected a new session");
    };
    assert_eq!(session.status, SessionStatus::Paid);

    {
        let sent = app.sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        let student = sent[0].render();
        assert_eq!(student.to, Recipient::Address("jane@brown.edu".into()));
        assert!(student.body.contains("Amount: $200"));
        assert!(student.body.contains("https://calendly.com/ada"));
        assert!(matches!(
            sent[1].render().to,
            Recipient::Professional { ref id, .. } if *id == ada.id
        ));
    }

    app.provider.register(CheckoutResource {
        id: "cs_test_1".into(),
        payment_intent: Some("pi_life".into()),
        ..Default::default()
    });
    let confirmation = app
        .state
        .sessions
        .resolve_checkout("cs_test_1")
        .await
        .unwrap();
    assert_eq!(confirmation.session.id, session.id);

    let scheduled = app
        .state
        .sessions
        .update_status(
            &session.id,
            SessionChange {
                status: SessionStatus::Scheduled,
                scheduled_at: Some(Utc::now()),
                calendly_event_url: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(scheduled.status, SessionStatus::Scheduled);

    let cancelled = app
        .state
        .sessions
        .update_status(
            &session.id,
            SessionChange {
                status: SessionStatus::Cancelled,
                scheduled_at: None,
                calendly_event_url: None,
            },
        )
        .await
        .unwrap();
    assert!(cancelled.status.is_terminal());

    let reopen = app
        .state
        .sessions
        .update_status(
            &session.id,
            SessionChange {
                status: SessionStatus::Paid,
                scheduled_at: None,
                calendly_event_url: None,
            },
        )
        .await;
    assert!(matches!(reopen, Err(MarketError::Validation(_))));
}

#[tokio::test]
async fn test_concurrent_duplicate_deliveries_create_one_session() {
    let app = TestApp::new();
    let ada = app.add_profile("Ada", true).await;
    let payload = completed_checkout_event("cs_race", "pi_race", &ada, 15000);
    let signature = sign(&payload);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let state = app.state.clone();
        let payload = payload.clone();
        let signature = signature.clone();
        handles.push(tokio::spawn(async move {
            state.webhooks.handle(&payload, Some(&signature)).await
        }));
    }

    let mut created = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            WebhookOutcome::SessionCreated(_) => created += 1,
            WebhookOutcome::Duplicate(_) => duplicates += 1,
            WebhookOutcome::Ignored(t) => panic!("unexpected ignore of {t}"),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(duplicates, 15);
    assert_eq!(app.state.sessions.list_all().await.unwrap().len(), 1);
    assert_eq!(app.sink.count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_admin_updates_respect_terminal_states() {
    for round in 0..50 {
        let app = TestApp::new();
        let ada = app.add_profile("Ada", true).await;
        let payload = completed_checkout_event("cs_admin", &format!("pi_admin_{round}"), &ada, 20000);
        let WebhookOutcome::SessionCreated(session) = app
            .state
            .webhooks
            .handle(&payload, Some(&sign(&payload)))
            .await
            .unwrap()
        else {
            panic!("expected a new session");
        };

        let mut handles = Vec::new();
        for i in 0..8 {
            let state = app.state.clone();
            let id = session.id.clone();
            let status = if i % 2 == 0 {
                SessionStatus::Cancelled
            } else {
                SessionStatus::Scheduled
            };
            handles.push(tokio::spawn(async move {
                let change = SessionChange {
                    status,
                    scheduled_at: Some(Utc::now()),
                    calendly_event_url: None,
                };
                (status, state.sessions.update_status(&id, change).await.is_ok())
            }));
        }

        let mut cancellations = 0;
        for handle in handles {
            if let (SessionStatus::Cancelled, true) = handle.await.unwrap() {
                cancellations += 1;
            }
        }
        assert_eq!(cancellations, 1);

        let stored = app.state.sessions.get(&session.id).await.unwrap();
        assert_eq!(stored.status, SessionStatus::Cancelled);
    }
}

#[tokio::test]
async fn test_booking_request_triage() {
    let app = TestApp::new();
    let ada = app.add_profile("Ada", true).await;

    let request = app
        .state
        .bookings
        .submit(BookingSubmission {
            professional_id: Some(ada.id.clone()),
            student_name: Some("Jane Doe".into()),
            student_email: Some("jane@brown.edu".into()),
            preferred_times: Some("Weekdays 2-5pm".into()),
            note: Some(" Interested in PM roles ".into()),
        })
        .await
        .unwrap();
    assert_eq!(request.status, BookingStatus::New);
    assert_eq!(request.note.as_deref(), Some("Interested in PM roles"));

    {
        let sent = app.sink.sent.lock().unwrap();
        let Notification::BookingRequested { request: sent_request, .. } = &sent[0] else {
            panic!("expected a booking notification");
        };
        assert_eq!(sent_request.id, request.id);
        assert_eq!(sent[0].render().to, Recipient::Admins);
    }

    for status in ["CONTACTED", "SCHEDULED", "NEW"] {
        let updated = app
            .state
            .bookings
            .update_status(
                &request.id,
                StatusChange {
                    status: Some(status.into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status.as_str(), status);
    }

    // Approval is read fresh: revoking it blocks the next booking.
    app.state
        .directory
        .update(
            &ada.id,
            serde_json::from_str(r#"{"is_approved": false}"#).unwrap(),
        )
        .await
        .unwrap();
    let blocked = app
        .state
        .bookings
        .submit(BookingSubmission {
            professional_id: Some(ada.id.clone()),
            student_name: Some("Sam".into()),
            student_email: Some("sam@brown.edu".into()),
            preferred_times: Some("Fridays".into()),
            note: None,
        })
        .await;
    assert!(matches!(blocked, Err(MarketError::Unavailable(_))));
}
