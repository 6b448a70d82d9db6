use std::sync::{mpsc, Arc};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use tracker_core::JobHandle;
use tracker_logging::{tracker_info, tracker_warn};

use crate::api::ConsoleApi;
use crate::store::HandleStore;
use crate::types::EngineEvent;

/// Polling cadence for batch status checks.
#[derive(Debug, Clone)]
pub struct PollerSettings {
    pub interval: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
        }
    }
}

pub struct StatusPoller;

impl StatusPoller {
    /// Spawns the polling task for `handle` on the current tokio runtime.
    ///
    /// The task polls once immediately, then on the fixed interval, until
    /// a terminal status arrives or the returned session is cancelled.
    /// When it observes a terminal status it clears the handle store
    /// before ending; a failed poll is reported and the cadence kept.
    pub fn spawn(
        api: Arc<dyn ConsoleApi>,
        store: Arc<dyn HandleStore>,
        handle: JobHandle,
        settings: PollerSettings,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> PollingSession {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let task_handle = handle.clone();
        let join = tokio::spawn(async move {
            poll_loop(api, store, task_handle, settings, event_tx, task_token).await;
        });

        PollingSession {
            handle,
            token,
            join,
        }
    }
}

async fn poll_loop(
    api: Arc<dyn ConsoleApi>,
    store: Arc<dyn HandleStore>,
    handle: JobHandle,
    settings: PollerSettings,
    event_tx: mpsc::Sender<EngineEvent>,
    token: CancellationToken,
) {
    loop {
        let result = tokio::select! {
            _ = token.cancelled() => return,
            result = api.batch_status(&handle) => result,
        };

        // A single failed poll never stops the schedule; only a terminal
        // status or cancellation does.
        if let Err(err) = &result {
            tracker_warn!("Status poll for batch {} failed: {}", handle, err);
        }
        let terminal = matches!(&result, Ok(status) if status.state.is_terminal());

        let delivered = event_tx
            .send(EngineEvent::StatusTick {
                handle: handle.clone(),
                result,
            })
            .is_ok();

        if terminal {
            if let Err(err) = store.clear() {
                tracker_warn!("Failed to clear handle store for batch {}: {}", handle, err);
            }
            tracker_info!("Batch {} reached a terminal state; polling stopped", handle);
            return;
        }

        if !delivered {
            // Receiver gone: nobody is watching this session anymore.
            return;
        }

        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(settings.interval) => {}
        }
    }
}

/// Scoped ownership of one repeating poll timer.
///
/// Dropping the session cancels the timer on any exit path; `cancel` may
/// be called any number of times.
pub struct PollingSession {
    handle: JobHandle,
    token: CancellationToken,
    join: tokio::task::JoinHandle<()>,
}

impl PollingSession {
    pub fn handle(&self) -> &JobHandle {
        &self.handle
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// True once the poll task has ended, whether by terminal status or
    /// cancellation.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

impl Drop for PollingSession {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
