//! Tracker engine: job API IO, handle persistence and polling sessions.
mod api;
mod engine;
mod poller;
mod store;
mod types;

pub use api::{ApiSettings, ConsoleApi, HttpConsoleApi};
pub use engine::EngineHandle;
pub use poller::{PollerSettings, PollingSession, StatusPoller};
pub use store::{FileHandleStore, HandleStore, MemoryHandleStore, StoreError, STATE_FILENAME};
pub use types::{ApiError, ApiFailure, EngineEvent, PendingCount};
