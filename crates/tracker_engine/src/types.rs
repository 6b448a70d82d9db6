use std::fmt;

use tracker_core::{BatchStatus, JobHandle};

/// Failure classification for job API requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiFailure {
    InvalidBaseUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Response body could not be interpreted (bad JSON, unknown status).
    MalformedResponse,
    /// The API answered but declined the submission (no batch id).
    Rejected,
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiFailure::InvalidBaseUrl => write!(f, "invalid base url"),
            ApiFailure::HttpStatus(code) => write!(f, "http status {code}"),
            ApiFailure::Timeout => write!(f, "timeout"),
            ApiFailure::Network => write!(f, "network error"),
            ApiFailure::MalformedResponse => write!(f, "malformed response"),
            ApiFailure::Rejected => write!(f, "submission rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiFailure,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Backlog information returned by the pending endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCount {
    pub total: u32,
    pub preview: Vec<String>,
}

/// Events the engine emits toward the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    SubmissionCompleted {
        result: Result<JobHandle, ApiError>,
    },
    StatusTick {
        handle: JobHandle,
        result: Result<BatchStatus, ApiError>,
    },
    PendingFetched {
        result: Result<PendingCount, ApiError>,
    },
}
