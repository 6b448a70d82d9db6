use std::sync::{mpsc, Arc};
use std::thread;

use chrono::Utc;
use tracker_core::{Effect, Msg};
use tracker_engine::{ConsoleApi, EngineEvent, EngineHandle, HandleStore, PollerSettings};
use tracker_logging::{tracker_error, tracker_info, tracker_warn};

/// Interprets the state machine's effects against the engine and the
/// handle store.
pub(crate) struct EffectRunner {
    engine: EngineHandle,
    store: Arc<dyn HandleStore>,
}

impl EffectRunner {
    pub(crate) fn new(
        api: Arc<dyn ConsoleApi>,
        store: Arc<dyn HandleStore>,
        settings: PollerSettings,
        msg_tx: mpsc::Sender<Msg>,
    ) -> Self {
        let (engine, event_rx) = EngineHandle::new(api, store.clone(), settings);
        spawn_event_loop(event_rx, msg_tx);
        Self { engine, store }
    }

    pub(crate) fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitBatch(params) => {
                    tracker_info!("Submitting batch of {}", params.batch_size);
                    self.engine.submit(params);
                }
                Effect::SaveHandle(handle) => {
                    if let Err(err) = self.store.save(&handle) {
                        tracker_error!("Failed to persist handle {}: {}", handle, err);
                    }
                }
                Effect::StartPolling(handle) => {
                    self.engine.start_polling(handle);
                }
                Effect::StopPolling => {
                    self.engine.stop_polling();
                }
                Effect::ClearHandle => {
                    if let Err(err) = self.store.clear() {
                        tracker_error!("Failed to clear persisted handle: {}", err);
                    }
                }
                Effect::FetchPendingCount { limit } => {
                    self.engine.fetch_pending(limit);
                }
            }
        }
    }
}

/// Forwards engine events to the state machine as messages, stamping
/// wall-clock time where the core needs it.
fn spawn_event_loop(event_rx: mpsc::Receiver<EngineEvent>, msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        while let Ok(event) = event_rx.recv() {
            let msg = match event {
                EngineEvent::SubmissionCompleted { result } => match result {
                    Ok(handle) => Msg::SubmissionSucceeded {
                        handle,
                        at_unix: now_unix(),
                    },
                    Err(err) => Msg::SubmissionFailed {
                        message: err.to_string(),
                    },
                },
                EngineEvent::StatusTick { result, .. } => match result {
                    Ok(status) => Msg::StatusArrived(status),
                    Err(err) => Msg::PollFailed {
                        message: err.to_string(),
                    },
                },
                EngineEvent::PendingFetched { result } => match result {
                    Ok(pending) => Msg::PendingCountArrived {
                        total: pending.total,
                    },
                    Err(err) => {
                        tracker_warn!("Pending count fetch failed: {}", err);
                        continue;
                    }
                },
            };
            if msg_tx.send(msg).is_err() {
                return;
            }
        }
    });
}

pub(crate) fn now_unix() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
