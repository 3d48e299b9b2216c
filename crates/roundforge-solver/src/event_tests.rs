//! Tests for the event system.

use std::sync::Mutex;

use super::*;

#[test]
fn test_event_support_new() {
    let support = AttemptEventSupport::new();

    assert_eq!(support.listener_count(), 0);
    assert!(!support.has_listeners());
}

#[test]
fn test_event_support_fire_events() {
    let mut support = AttemptEventSupport::new();
    let listener = Arc::new(CountingAttemptListener::new());
    support.add_listener(listener.clone());

    let stats = SearchStatistics::default();
    support.fire_deepening_started(5);
    support.fire_attempt_started(5);
    support.fire_attempt_finished(5, AttemptOutcome::Ok, &stats);
    support.fire_attempt_started(4);
    support.fire_attempt_finished(4, AttemptOutcome::Timeout, &stats);
    support.fire_deepening_ended(Some(5), false);

    assert_eq!(listener.deepening_started_count(), 1);
    assert_eq!(listener.attempts_started_count(), 2);
    assert_eq!(listener.ok_count(), 1);
    assert_eq!(listener.timeout_count(), 1);
    assert_eq!(listener.not_found_count(), 0);
    assert_eq!(listener.attempts_finished_count(), 2);
    assert_eq!(listener.deepening_ended_count(), 1);
}

#[test]
fn test_counting_listener_reset() {
    let listener = CountingAttemptListener::new();
    listener.on_attempt_finished(3, AttemptOutcome::NotFound, &SearchStatistics::default());
    assert_eq!(listener.not_found_count(), 1);

    listener.reset();
    assert_eq!(listener.attempts_finished_count(), 0);
}

#[test]
fn test_clear_listeners() {
    let mut support = AttemptEventSupport::new();
    support.add_listener(Arc::new(CountingAttemptListener::new()));
    support.add_listener(Arc::new(LoggingAttemptListener::new()));
    assert_eq!(support.listener_count(), 2);

    support.clear_listeners();
    assert!(!support.has_listeners());
}

#[test]
fn test_logging_progress_line() {
    let listener = LoggingAttemptListener::with_prefix("[mars] ");
    assert_eq!(
        listener.progress_line(12, AttemptOutcome::Ok),
        "[mars] Trying to solve in 12 rounds... OK"
    );
    assert_eq!(
        listener.progress_line(7, AttemptOutcome::NotFound),
        "[mars] Trying to solve in 7 rounds... NOK"
    );
}

#[test]
fn test_closure_listener() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let listener = FnAttemptListener::new(move |budget, outcome| {
        sink.lock().unwrap().push((budget, outcome));
    });

    listener.on_attempt_finished(6, AttemptOutcome::Ok, &SearchStatistics::default());
    listener.on_attempt_finished(5, AttemptOutcome::NotFound, &SearchStatistics::default());

    assert_eq!(
        *seen.lock().unwrap(),
        vec![(6, AttemptOutcome::Ok), (5, AttemptOutcome::NotFound)]
    );
}

#[test]
fn test_channel_listener_streams_events() {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let listener = ChannelAttemptListener::new(sender);

    listener.on_deepening_started(3);
    listener.on_attempt_finished(3, AttemptOutcome::Ok, &SearchStatistics::default());
    listener.on_deepening_ended(Some(3), false);

    assert_eq!(
        receiver.try_recv().unwrap(),
        AttemptEvent::DeepeningStarted { max_rounds: 3 }
    );
    assert!(matches!(
        receiver.try_recv().unwrap(),
        AttemptEvent::AttemptFinished {
            budget: 3,
            outcome: AttemptOutcome::Ok,
            ..
        }
    ));
    assert_eq!(
        receiver.try_recv().unwrap(),
        AttemptEvent::DeepeningEnded {
            rounds_used: Some(3),
            terminated_early: false,
        }
    );
}

#[test]
fn test_channel_listener_ignores_closed_receiver() {
    let (sender, receiver) = mpsc::unbounded_channel();
    drop(receiver);

    let listener = ChannelAttemptListener::new(sender);
    listener.on_attempt_started(2);
}

#[test]
fn test_outcome_labels() {
    assert_eq!(AttemptOutcome::Ok.to_string(), "ok");
    assert_eq!(AttemptOutcome::NotFound.as_str(), "not_found");
    assert_eq!(AttemptOutcome::Timeout.as_str(), "timeout");
    assert!(!AttemptOutcome::Timeout.is_ok());
}
