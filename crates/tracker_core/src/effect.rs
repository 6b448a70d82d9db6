#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Issue the create request to the job API.
    SubmitBatch(crate::BatchParameters),
    /// Persist the handle so tracking survives a restart.
    SaveHandle(crate::JobHandle),
    /// Begin (or resume) the polling session for a handle.
    StartPolling(crate::JobHandle),
    /// Release the active polling session.
    StopPolling,
    /// Remove the persisted handle.
    ClearHandle,
    /// Fetch the backlog count for display.
    FetchPendingCount { limit: u32 },
}
