use std::fmt;

use thiserror::Error;

/// Smallest batch the job API accepts.
pub const MIN_BATCH_SIZE: u32 = 1;
/// Largest batch the job API accepts.
pub const MAX_BATCH_SIZE: u32 = 500;

/// Opaque identifier of a submitted batch job.
///
/// This is the only piece of tracking state that must outlive a single
/// run of the client; everything else is rebuilt from status polls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state the job API reports for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Pending,
    Processing,
    Completed,
    CompletedWithErrors,
    Error,
}

impl BatchState {
    /// Terminal states admit no further transition; observing one is the
    /// sole signal that stops polling.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Completed | Self::CompletedWithErrors | Self::Error
        )
    }

    /// Parses the wire representation used by the job API.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "completed_with_errors" => Some(Self::CompletedWithErrors),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::CompletedWithErrors => "completed_with_errors",
            Self::Error => "error",
        }
    }
}

/// One point-in-time progress snapshot for a batch.
///
/// Each snapshot fully replaces the previous one; snapshots are never
/// merged or diffed.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchStatus {
    pub state: BatchState,
    pub progress_percent: f64,
    pub processed: u32,
    pub total: u32,
    /// Result counter, present once the job is terminal.
    pub found: Option<u32>,
    /// Error counter, present once the job is terminal.
    pub errors: Option<u32>,
}

/// A batch parameter the submission form rejected before any network call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("batch size {0} must be between 1 and 500")]
    BatchSizeOutOfRange(u32),
    #[error("similarity weight {0} must be between -1.0 and 1.0")]
    WeightOutOfRange(f64),
    #[error("country code {0:?} must be a two-letter code")]
    InvalidCountryCode(String),
}

/// Immutable input to one batch submission.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchParameters {
    pub batch_size: u32,
    pub similarity_weight: Option<f64>,
    /// Two-letter region filter; absent means "all".
    pub country_code: Option<String>,
    /// Explicit target identifiers, when the caller supplies its own list.
    pub domains: Option<Vec<String>>,
}

impl BatchParameters {
    pub fn new(batch_size: u32) -> Self {
        Self {
            batch_size,
            similarity_weight: None,
            country_code: None,
            domains: None,
        }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(MIN_BATCH_SIZE..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            return Err(ParameterError::BatchSizeOutOfRange(self.batch_size));
        }
        if let Some(weight) = self.similarity_weight {
            if !(-1.0..=1.0).contains(&weight) {
                return Err(ParameterError::WeightOutOfRange(weight));
            }
        }
        if let Some(code) = self.country_code.as_deref() {
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(ParameterError::InvalidCountryCode(code.to_string()));
            }
        }
        Ok(())
    }

    /// Uppercases the country code; all other fields pass through as-is.
    pub fn normalized(mut self) -> Self {
        if let Some(code) = self.country_code.as_mut() {
            *code = code.to_ascii_uppercase();
        }
        self
    }
}
