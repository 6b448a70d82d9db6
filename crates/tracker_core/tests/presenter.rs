use tracker_core::{
    clamp_percent, format_elapsed, update, Banner, BatchParameters, BatchState, BatchStatus,
    JobHandle, Msg, TrackerState,
};

fn init_logging() {
    tracker_logging::initialize_for_tests();
}

fn tracking_state(at_unix: u64) -> TrackerState {
    let (state, _) = update(
        TrackerState::new(),
        Msg::SubmitRequested(BatchParameters::new(100)),
    );
    let (state, _) = update(
        state,
        Msg::SubmissionSucceeded {
            handle: JobHandle::new("abc123"),
            at_unix,
        },
    );
    state
}

fn snapshot(state: BatchState, percent: f64) -> BatchStatus {
    BatchStatus {
        state,
        progress_percent: percent,
        processed: 20,
        total: 200,
        found: None,
        errors: None,
    }
}

#[test]
fn percent_is_clamped_to_display_range() {
    init_logging();
    let state = tracking_state(0);
    let (state, _) = update(
        state,
        Msg::StatusArrived(snapshot(BatchState::Processing, 150.0)),
    );
    assert_eq!(state.view().percent, 100.0);

    let state = tracking_state(0);
    let (state, _) = update(
        state,
        Msg::StatusArrived(snapshot(BatchState::Processing, -5.0)),
    );
    assert_eq!(state.view().percent, 0.0);
}

#[test]
fn clamp_handles_non_finite_input() {
    assert_eq!(clamp_percent(f64::NAN), 0.0);
    assert_eq!(clamp_percent(f64::INFINITY), 0.0);
    assert_eq!(clamp_percent(33.3), 33.3);
}

#[test]
fn progress_text_shows_processed_over_total() {
    let state = tracking_state(0);
    let (state, _) = update(
        state,
        Msg::StatusArrived(snapshot(BatchState::Processing, 10.0)),
    );
    assert_eq!(state.view().progress_text.as_deref(), Some("20 / 200"));
}

#[test]
fn elapsed_formatting_covers_all_magnitudes() {
    assert_eq!(format_elapsed(5), "5s");
    assert_eq!(format_elapsed(59), "59s");
    assert_eq!(format_elapsed(67), "1m 07s");
    assert_eq!(format_elapsed(600), "10m 00s");
    assert_eq!(format_elapsed(3_725), "1h 02m");
}

#[test]
fn elapsed_advances_on_ticks_without_any_poll() {
    let state = tracking_state(100);
    let (state, _) = update(state, Msg::ElapsedTick { now_unix: 130 });

    let view = state.view();
    assert_eq!(view.elapsed_text.as_deref(), Some("30s"));
    // No snapshot ever arrived; progress stays empty.
    assert!(view.progress_text.is_none());
}

#[test]
fn elapsed_is_absent_before_submission() {
    let state = TrackerState::new();
    let (state, _) = update(state, Msg::ElapsedTick { now_unix: 500 });
    assert!(state.view().elapsed_text.is_none());
}

#[test]
fn queued_banner_until_processing_starts() {
    let state = tracking_state(0);
    assert_eq!(state.view().banner, Banner::Queued);

    let (state, _) = update(
        state,
        Msg::StatusArrived(snapshot(BatchState::Pending, 0.0)),
    );
    assert_eq!(state.view().banner, Banner::Queued);

    let (state, _) = update(
        state,
        Msg::StatusArrived(snapshot(BatchState::Processing, 1.0)),
    );
    assert_eq!(state.view().banner, Banner::InProgress);
}

#[test]
fn submitting_banner_while_request_in_flight() {
    let (state, _) = update(
        TrackerState::new(),
        Msg::SubmitRequested(BatchParameters::new(100)),
    );
    assert_eq!(state.view().banner, Banner::Submitting);
}

#[test]
fn dirty_is_consumed_once_per_change() {
    let mut state = tracking_state(0);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());

    let (mut state, _) = update(
        state,
        Msg::StatusArrived(snapshot(BatchState::Processing, 10.0)),
    );
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}
