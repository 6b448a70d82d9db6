use crate::view_model::{
    clamp_percent, format_elapsed, Banner, TrackerViewModel, POLL_WARNING_THRESHOLD,
};
use crate::{BatchState, BatchStatus, JobHandle};

/// What the tracking client itself is doing. Distinct from the job's
/// lifecycle state, which lives in the latest snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No job tracked; the form is available.
    #[default]
    Idle,
    /// The create request is in flight.
    Submitting,
    /// A handle is owned and the poller is running.
    Tracking,
    /// The job reached a terminal state; the outcome banner is shown.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackerState {
    session: SessionState,
    handle: Option<JobHandle>,
    last_status: Option<BatchStatus>,
    submitted_at_unix: Option<u64>,
    now_unix: Option<u64>,
    last_error: Option<String>,
    consecutive_poll_failures: u32,
    pending_total: Option<u32>,
    dirty: bool,
}

impl TrackerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn handle(&self) -> Option<&JobHandle> {
        self.handle.as_ref()
    }

    pub fn last_status(&self) -> Option<&BatchStatus> {
        self.last_status.as_ref()
    }

    /// Returns whether a re-render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> TrackerViewModel {
        let (percent, progress_text) = match &self.last_status {
            Some(status) => (
                clamp_percent(status.progress_percent),
                Some(format!("{} / {}", status.processed, status.total)),
            ),
            None => (0.0, None),
        };

        let elapsed_text = match (self.submitted_at_unix, self.now_unix) {
            (Some(start), Some(now)) => Some(format_elapsed(now.saturating_sub(start))),
            _ => None,
        };

        let poll_warning = if self.session == SessionState::Tracking
            && self.consecutive_poll_failures >= POLL_WARNING_THRESHOLD
        {
            Some(format!(
                "{} status checks in a row failed; still retrying",
                self.consecutive_poll_failures
            ))
        } else {
            None
        };

        TrackerViewModel {
            session: self.session,
            banner: self.banner(),
            percent,
            progress_text,
            elapsed_text,
            error: self.last_error.clone(),
            poll_warning,
            pending_total: self.pending_total,
            dirty: self.dirty,
        }
    }

    fn banner(&self) -> Banner {
        match self.session {
            SessionState::Idle => Banner::Idle,
            SessionState::Submitting => Banner::Submitting,
            SessionState::Tracking => match self.last_status.as_ref().map(|s| s.state) {
                None | Some(BatchState::Pending) => Banner::Queued,
                _ => Banner::InProgress,
            },
            SessionState::Finished => {
                let (found, errors) = self
                    .last_status
                    .as_ref()
                    .map(|s| (s.found.unwrap_or(0), s.errors.unwrap_or(0)))
                    .unwrap_or((0, 0));
                match self.last_status.as_ref().map(|s| s.state) {
                    Some(BatchState::Completed) => Banner::Success { found, errors },
                    Some(BatchState::CompletedWithErrors) => {
                        Banner::PartialSuccess { found, errors }
                    }
                    _ => Banner::Failed,
                }
            }
        }
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.last_error = Some(message);
        self.dirty = true;
    }

    pub(crate) fn dismiss_error(&mut self) {
        if self.last_error.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn begin_submission(&mut self) {
        self.session = SessionState::Submitting;
        self.handle = None;
        self.last_status = None;
        self.submitted_at_unix = None;
        self.last_error = None;
        self.consecutive_poll_failures = 0;
        self.dirty = true;
    }

    /// Takes ownership of a handle, either fresh from a submission or
    /// restored from the handle store at startup.
    pub(crate) fn adopt_handle(&mut self, handle: JobHandle, at_unix: u64) {
        self.session = SessionState::Tracking;
        self.handle = Some(handle);
        self.submitted_at_unix = Some(at_unix);
        self.now_unix = Some(at_unix);
        self.consecutive_poll_failures = 0;
        self.dirty = true;
    }

    pub(crate) fn fail_submission(&mut self, message: String) {
        self.session = SessionState::Idle;
        self.last_error = Some(message);
        self.dirty = true;
    }

    /// Replaces the snapshot; a terminal one also finishes the session.
    pub(crate) fn apply_snapshot(&mut self, status: BatchStatus) {
        if status.state.is_terminal() {
            self.session = SessionState::Finished;
        }
        self.last_status = Some(status);
        self.consecutive_poll_failures = 0;
        self.dirty = true;
    }

    pub(crate) fn record_poll_failure(&mut self) {
        self.consecutive_poll_failures += 1;
        // The view only changes once the warning threshold is crossed.
        if self.consecutive_poll_failures >= POLL_WARNING_THRESHOLD {
            self.dirty = true;
        }
    }

    pub(crate) fn reset_tracking(&mut self) {
        self.session = SessionState::Idle;
        self.handle = None;
        self.last_status = None;
        self.submitted_at_unix = None;
        self.consecutive_poll_failures = 0;
        self.dirty = true;
    }

    pub(crate) fn set_now(&mut self, now_unix: u64) {
        if self.session == SessionState::Tracking {
            self.now_unix = Some(now_unix);
            self.dirty = true;
        }
    }

    pub(crate) fn set_pending_total(&mut self, total: u32) {
        self.pending_total = Some(total);
        self.dirty = true;
    }
}
