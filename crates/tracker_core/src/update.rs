use crate::{Effect, Msg, SessionState, TrackerState};

/// How many backlog entries the pending endpoint is asked to preview.
pub const PENDING_PREVIEW_LIMIT: u32 = 25;

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: TrackerState, msg: Msg) -> (TrackerState, Vec<Effect>) {
    let effects = match msg {
        Msg::SubmitRequested(params) => {
            match state.session() {
                SessionState::Submitting | SessionState::Tracking => {
                    return (state, Vec::new());
                }
                SessionState::Idle | SessionState::Finished => {}
            }
            let params = params.normalized();
            if let Err(err) = params.validate() {
                state.set_error(err.to_string());
                return (state, Vec::new());
            }
            state.begin_submission();
            vec![Effect::SubmitBatch(params)]
        }
        Msg::SubmissionSucceeded { handle, at_unix } => {
            if state.session() != SessionState::Submitting {
                return (state, Vec::new());
            }
            state.adopt_handle(handle.clone(), at_unix);
            vec![
                Effect::SaveHandle(handle.clone()),
                Effect::StartPolling(handle),
            ]
        }
        Msg::SubmissionFailed { message } => {
            if state.session() != SessionState::Submitting {
                return (state, Vec::new());
            }
            state.fail_submission(message);
            Vec::new()
        }
        Msg::StatusArrived(status) => {
            if state.session() != SessionState::Tracking {
                return (state, Vec::new());
            }
            let terminal = status.state.is_terminal();
            state.apply_snapshot(status);
            if terminal {
                // The poller stops itself and clears the store when it
                // observes a terminal snapshot; this releases the
                // platform-side session object.
                vec![Effect::StopPolling]
            } else {
                Vec::new()
            }
        }
        Msg::PollFailed { .. } => {
            if state.session() == SessionState::Tracking {
                state.record_poll_failure();
            }
            Vec::new()
        }
        Msg::ResumeRequested { handle, at_unix } => {
            if state.session() != SessionState::Idle {
                return (state, Vec::new());
            }
            state.adopt_handle(handle.clone(), at_unix);
            vec![Effect::StartPolling(handle)]
        }
        Msg::AbandonRequested => match state.session() {
            SessionState::Idle => Vec::new(),
            _ => {
                state.reset_tracking();
                vec![Effect::StopPolling, Effect::ClearHandle]
            }
        },
        Msg::ElapsedTick { now_unix } => {
            state.set_now(now_unix);
            Vec::new()
        }
        Msg::PendingRefreshRequested => vec![Effect::FetchPendingCount {
            limit: PENDING_PREVIEW_LIMIT,
        }],
        Msg::PendingCountArrived { total } => {
            state.set_pending_total(total);
            Vec::new()
        }
        Msg::ErrorDismissed => {
            state.dismiss_error();
            Vec::new()
        }
    };

    (state, effects)
}
