//! Tracker core: pure batch-tracking state machine and view-model helpers.
mod batch;
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use batch::{
    BatchParameters, BatchState, BatchStatus, JobHandle, ParameterError, MAX_BATCH_SIZE,
    MIN_BATCH_SIZE,
};
pub use effect::Effect;
pub use msg::Msg;
pub use state::{SessionState, TrackerState};
pub use update::{update, PENDING_PREVIEW_LIMIT};
pub use view_model::{
    clamp_percent, format_elapsed, Banner, TrackerViewModel, POLL_WARNING_THRESHOLD,
};
