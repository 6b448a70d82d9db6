use crate::SessionState;

/// Consecutive failed polls before the view surfaces a warning.
pub const POLL_WARNING_THRESHOLD: u32 = 3;

/// Render-ready projection of the tracker state. Pure data; the platform
/// layer decides how to draw it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackerViewModel {
    pub session: SessionState,
    pub banner: Banner,
    /// Progress percentage, clamped to 0..=100.
    pub percent: f64,
    /// "processed / total", absent until the first snapshot arrives.
    pub progress_text: Option<String>,
    /// Humanized time since submission, absent while no job is tracked.
    pub elapsed_text: Option<String>,
    /// Dismissable validation/submission error.
    pub error: Option<String>,
    /// Set after repeated consecutive poll failures.
    pub poll_warning: Option<String>,
    pub pending_total: Option<u32>,
    pub dirty: bool,
}

/// Which banner the page shows for the current session and snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Banner {
    #[default]
    Idle,
    Submitting,
    Queued,
    InProgress,
    Success {
        found: u32,
        errors: u32,
    },
    PartialSuccess {
        found: u32,
        errors: u32,
    },
    Failed,
}

/// Clamps a backend-reported percentage into the displayable range.
pub fn clamp_percent(raw: f64) -> f64 {
    if raw.is_finite() {
        raw.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Formats a duration in whole seconds as "42s", "3m 07s" or "1h 02m".
pub fn format_elapsed(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}h {minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m {seconds:02}s")
    } else {
        format!("{seconds}s")
    }
}
