use std::sync::{mpsc, Arc};
use std::thread;

use tracker_core::{BatchParameters, JobHandle};
use tracker_logging::tracker_debug;

use crate::api::ConsoleApi;
use crate::poller::{PollerSettings, PollingSession, StatusPoller};
use crate::store::HandleStore;
use crate::types::EngineEvent;

enum EngineCommand {
    Submit { params: BatchParameters },
    StartPolling { handle: JobHandle },
    StopPolling,
    FetchPending { limit: u32 },
}

/// Handle to the engine thread that runs all job API IO.
///
/// Commands go in over a channel; events come back on the receiver that
/// [`EngineHandle::new`] returns. Dropping the handle closes the command
/// channel, which ends the engine thread and cancels any live polling
/// session with it.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(
        api: Arc<dyn ConsoleApi>,
        store: Arc<dyn HandleStore>,
        settings: PollerSettings,
    ) -> (Self, mpsc::Receiver<EngineEvent>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut session: Option<PollingSession> = None;

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Submit { params } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = api.submit_batch(&params).await;
                            let _ = event_tx.send(EngineEvent::SubmissionCompleted { result });
                        });
                    }
                    EngineCommand::StartPolling { handle } => {
                        // Idempotent start: one live session per handle.
                        if let Some(active) = &session {
                            if active.handle() == &handle && !active.is_finished() {
                                tracker_debug!("Polling already active for batch {}", handle);
                                continue;
                            }
                        }
                        session = None;
                        let _guard = runtime.enter();
                        session = Some(StatusPoller::spawn(
                            api.clone(),
                            store.clone(),
                            handle,
                            settings.clone(),
                            event_tx.clone(),
                        ));
                    }
                    EngineCommand::StopPolling => {
                        session = None;
                    }
                    EngineCommand::FetchPending { limit } => {
                        let api = api.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = api.pending_count(limit).await;
                            let _ = event_tx.send(EngineEvent::PendingFetched { result });
                        });
                    }
                }
            }
            // Command channel closed: dropping the runtime cancels any
            // remaining poll task.
        });

        (Self { cmd_tx }, event_rx)
    }

    pub fn submit(&self, params: BatchParameters) {
        let _ = self.cmd_tx.send(EngineCommand::Submit { params });
    }

    pub fn start_polling(&self, handle: JobHandle) {
        let _ = self.cmd_tx.send(EngineCommand::StartPolling { handle });
    }

    pub fn stop_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::StopPolling);
    }

    pub fn fetch_pending(&self, limit: u32) {
        let _ = self.cmd_tx.send(EngineCommand::FetchPending { limit });
    }
}
