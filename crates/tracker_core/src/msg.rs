#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User submitted batch parameters from the form.
    SubmitRequested(crate::BatchParameters),
    /// The job API accepted the submission and returned a handle.
    SubmissionSucceeded {
        handle: crate::JobHandle,
        at_unix: u64,
    },
    /// The submission request failed or the response carried no handle.
    SubmissionFailed { message: String },
    /// A status poll returned a fresh snapshot.
    StatusArrived(crate::BatchStatus),
    /// A single status poll failed; the schedule keeps running.
    PollFailed { message: String },
    /// A persisted handle was found at startup; resume tracking it.
    ResumeRequested {
        handle: crate::JobHandle,
        at_unix: u64,
    },
    /// User explicitly abandoned the tracked job.
    AbandonRequested,
    /// One-second clock tick driving the elapsed-time display.
    ElapsedTick { now_unix: u64 },
    /// User asked for the backlog count shown next to the form.
    PendingRefreshRequested,
    /// Backlog count response.
    PendingCountArrived { total: u32 },
    /// User dismissed the inline error banner.
    ErrorDismissed,
}
