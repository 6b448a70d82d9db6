use tracker_core::{
    update, Banner, BatchParameters, BatchState, BatchStatus, Effect, JobHandle, Msg,
    SessionState, TrackerState, POLL_WARNING_THRESHOLD,
};

/// Drives a fresh state through submission to an actively tracked job.
fn tracking_state(handle: &str) -> TrackerState {
    let (state, _) = update(
        TrackerState::new(),
        Msg::SubmitRequested(BatchParameters::new(200)),
    );
    let (state, _) = update(
        state,
        Msg::SubmissionSucceeded {
            handle: JobHandle::new(handle),
            at_unix: 1_000,
        },
    );
    state
}

fn processing(percent: f64, processed: u32, total: u32) -> BatchStatus {
    BatchStatus {
        state: BatchState::Processing,
        progress_percent: percent,
        processed,
        total,
        found: None,
        errors: None,
    }
}

fn terminal(state: BatchState, found: u32, errors: u32) -> BatchStatus {
    BatchStatus {
        state,
        progress_percent: 100.0,
        processed: 200,
        total: 200,
        found: Some(found),
        errors: Some(errors),
    }
}

#[test]
fn processing_snapshot_keeps_polling_and_updates_progress() {
    let state = tracking_state("abc123");
    let (state, effects) = update(state, Msg::StatusArrived(processing(10.0, 20, 200)));

    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Tracking);

    let view = state.view();
    assert_eq!(view.progress_text.as_deref(), Some("20 / 200"));
    assert_eq!(view.percent, 10.0);
    assert_eq!(view.banner, Banner::InProgress);
}

#[test]
fn completed_sequence_stops_polling_with_success_banner() {
    let state = tracking_state("abc123");
    let (state, effects) = update(state, Msg::StatusArrived(processing(50.0, 100, 200)));
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::StatusArrived(processing(90.0, 180, 200)));
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::StatusArrived(terminal(BatchState::Completed, 34, 0)),
    );

    assert_eq!(effects, vec![Effect::StopPolling]);
    assert_eq!(state.session(), SessionState::Finished);
    assert_eq!(
        state.view().banner,
        Banner::Success {
            found: 34,
            errors: 0
        }
    );
}

#[test]
fn error_terminal_shows_failure_banner_not_success() {
    let state = tracking_state("abc123");
    let (state, _) = update(state, Msg::StatusArrived(processing(40.0, 80, 200)));
    let (state, effects) = update(
        state,
        Msg::StatusArrived(BatchStatus {
            state: BatchState::Error,
            progress_percent: 40.0,
            processed: 80,
            total: 200,
            found: None,
            errors: Some(3),
        }),
    );

    assert_eq!(effects, vec![Effect::StopPolling]);
    assert_eq!(state.session(), SessionState::Finished);
    assert_eq!(state.view().banner, Banner::Failed);
}

#[test]
fn completed_with_errors_shows_partial_success() {
    let state = tracking_state("abc123");
    let (state, _) = update(
        state,
        Msg::StatusArrived(terminal(BatchState::CompletedWithErrors, 12, 5)),
    );

    assert_eq!(
        state.view().banner,
        Banner::PartialSuccess {
            found: 12,
            errors: 5
        }
    );
}

#[test]
fn transient_failure_between_polls_does_not_stop_tracking() {
    let state = tracking_state("abc123");
    let (state, _) = update(state, Msg::StatusArrived(processing(50.0, 100, 200)));

    let (state, effects) = update(
        state,
        Msg::PollFailed {
            message: "connection reset".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Tracking);

    // The next successful poll is applied as usual.
    let (state, effects) = update(state, Msg::StatusArrived(processing(55.0, 110, 200)));
    assert!(effects.is_empty());
    assert_eq!(state.view().progress_text.as_deref(), Some("110 / 200"));
    assert!(state.view().poll_warning.is_none());
}

#[test]
fn repeated_failures_surface_a_warning_that_resets_on_success() {
    let mut state = tracking_state("abc123");
    for _ in 0..POLL_WARNING_THRESHOLD {
        let (next, _) = update(
            state,
            Msg::PollFailed {
                message: "timeout".to_string(),
            },
        );
        state = next;
    }
    assert!(state.view().poll_warning.is_some());

    let (state, _) = update(state, Msg::StatusArrived(processing(60.0, 120, 200)));
    assert!(state.view().poll_warning.is_none());
}

#[test]
fn resume_starts_polling_without_resubmitting() {
    let handle = JobHandle::new("abc123");
    let (state, effects) = update(
        TrackerState::new(),
        Msg::ResumeRequested {
            handle: handle.clone(),
            at_unix: 2_000,
        },
    );

    assert_eq!(effects, vec![Effect::StartPolling(handle.clone())]);
    assert_eq!(state.session(), SessionState::Tracking);
    assert_eq!(state.handle(), Some(&handle));
}

#[test]
fn resume_is_ignored_while_already_tracking() {
    let state = tracking_state("abc123");
    let (state, effects) = update(
        state,
        Msg::ResumeRequested {
            handle: JobHandle::new("other"),
            at_unix: 2_000,
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.handle(), Some(&JobHandle::new("abc123")));
}

#[test]
fn abandon_stops_polling_and_clears_the_handle() {
    let state = tracking_state("abc123");
    let (state, effects) = update(state, Msg::AbandonRequested);

    assert_eq!(effects, vec![Effect::StopPolling, Effect::ClearHandle]);
    assert_eq!(state.session(), SessionState::Idle);
    assert_eq!(state.handle(), None);
    assert_eq!(state.view().banner, Banner::Idle);
}

#[test]
fn abandon_while_idle_is_a_no_op() {
    let (state, effects) = update(TrackerState::new(), Msg::AbandonRequested);

    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);
}

#[test]
fn stale_snapshot_after_abandon_is_ignored() {
    let state = tracking_state("abc123");
    let (state, _) = update(state, Msg::AbandonRequested);

    let (state, effects) = update(state, Msg::StatusArrived(processing(99.0, 198, 200)));
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);
    assert!(state.last_status().is_none());
}

#[test]
fn pending_count_round_trip() {
    let (state, effects) = update(TrackerState::new(), Msg::PendingRefreshRequested);
    assert!(matches!(
        effects[..],
        [Effect::FetchPendingCount { limit: _ }]
    ));

    let (state, _) = update(state, Msg::PendingCountArrived { total: 1_234 });
    assert_eq!(state.view().pending_total, Some(1_234));
}
