//! E2E tests for the daily check-in path.
//!
//! Drives the full flow the CLI exercises: conversation state machine,
//! local history, outbox queueing, and delivery against a mocked
//! backend.

use chrono::{Duration, Utc};
use exhale_core::checkin::flow::CheckInFlow;
use exhale_core::outbox::{drain, Outbox, RetryPolicy};
use exhale_core::storage::config::ApiConfig;
use exhale_core::{ApiClient, CheckInState, Event};
use tempfile::TempDir;

fn run_flow(baseline: CheckInState, cigarettes: &str) -> (CheckInFlow, exhale_core::CompletedCheckIn) {
    let mut flow = CheckInFlow::new(baseline);
    flow.begin().unwrap();
    flow.answer_cigarettes(cigarettes).unwrap();
    flow.answer_confidence(7).unwrap();
    let done = flow.answer_craving(4, Utc::now()).unwrap();
    (flow, done)
}

#[tokio::test]
async fn completed_checkin_is_queued_and_delivered() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/users/u-1/checkins")
        .match_body(mockito::Matcher::Json(serde_json::json!({
            "cigarettesCount": 0,
            "confidence": 7,
            "craving": 4,
            "streak": 3
        })))
        .with_status(201)
        .create_async()
        .await;

    let baseline = CheckInState {
        cigarettes: 5,
        confidence: 5,
        craving: 5,
        streak: 3,
        last_check_in: Some(Utc::now() - Duration::hours(30)),
    };
    let (_, done) = run_flow(baseline, "0");
    assert_eq!(done.state.streak, 4);

    let dir = TempDir::new().unwrap();
    let mut outbox = Outbox::open_at(dir.path().join("outbox.json")).unwrap();
    let now = Utc::now();
    outbox.enqueue("u-1", done.submission.clone(), now);

    let api = ApiClient::new(&ApiConfig {
        base_url: server.url(),
        timeout_secs: 5,
    })
    .unwrap();

    let events = drain(&mut outbox, &api, &RetryPolicy::default(), now).await;
    assert!(outbox.is_empty());
    assert!(matches!(events[0], Event::SubmissionDelivered { .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn local_state_survives_backend_outage() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/users/u-1/checkins")
        .with_status(503)
        .create_async()
        .await;

    let baseline = CheckInState {
        cigarettes: 10,
        confidence: 5,
        craving: 5,
        streak: 1,
        last_check_in: Some(Utc::now() - Duration::hours(25)),
    };
    let (flow, done) = run_flow(baseline, "6");
    // Local commit happened regardless of what the network does.
    assert_eq!(done.state.streak, 2);
    assert_eq!(flow.baseline(), &done.state);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("outbox.json");
    let now = Utc::now();

    let mut outbox = Outbox::open_at(path.clone()).unwrap();
    outbox.enqueue("u-1", done.submission, now);

    let api = ApiClient::new(&ApiConfig {
        base_url: server.url(),
        timeout_secs: 5,
    })
    .unwrap();

    let events = drain(&mut outbox, &api, &RetryPolicy::default(), now).await;
    assert!(matches!(
        events[0],
        Event::SubmissionFailed { gave_up: false, .. }
    ));

    // Pending entry survives a process restart.
    outbox.persist().unwrap();
    let reloaded = Outbox::open_at(path).unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded.entries()[0].attempts, 1);
}

#[test]
fn correction_rerun_same_day_keeps_streak() {
    let now = Utc::now();
    let baseline = CheckInState {
        cigarettes: 8,
        confidence: 5,
        craving: 5,
        streak: 6,
        last_check_in: Some(now - Duration::hours(26)),
    };
    let (mut flow, first) = run_flow(baseline, "2");
    assert_eq!(first.state.streak, 7);

    flow.correct().unwrap();
    flow.answer_cigarettes("3").unwrap();
    flow.answer_confidence(8).unwrap();
    let redone = flow.answer_craving(3, now + Duration::minutes(10)).unwrap();

    // Same-day rerun: streak unchanged, comparison against the state
    // committed by the first run (2 -> 3).
    assert_eq!(redone.state.streak, 7);
    assert_eq!(redone.submission.streak, 7);
    assert_eq!(redone.state.cigarettes, 3);
}

#[test]
fn lapse_resets_streak_to_zero() {
    let baseline = CheckInState {
        cigarettes: 4,
        confidence: 5,
        craving: 5,
        streak: 12,
        last_check_in: Some(Utc::now() - Duration::hours(72)),
    };
    let (_, done) = run_flow(baseline, "4");
    assert_eq!(done.state.streak, 0);
    assert!(done.streak_line.contains("day zero"));
}
