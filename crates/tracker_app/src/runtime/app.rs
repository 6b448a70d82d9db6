use std::io::BufRead;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use tracker_core::{update, Banner, Msg, TrackerState, TrackerViewModel};
use tracker_engine::{ApiSettings, FileHandleStore, HandleStore, HttpConsoleApi, PollerSettings};
use tracker_logging::{tracker_error, tracker_info, tracker_warn};

use super::command::{parse_command, Command};
use super::effects::{now_unix, EffectRunner};
use super::logging;

const BASE_URL_ENV: &str = "TRACKER_API_BASE";

pub fn run() {
    logging::initialize();

    let settings = ApiSettings {
        base_url: std::env::var(BASE_URL_ENV).unwrap_or_else(|_| ApiSettings::default().base_url),
        ..ApiSettings::default()
    };
    let api = match HttpConsoleApi::new(settings) {
        Ok(api) => Arc::new(api),
        Err(err) => {
            tracker_error!("Invalid job API configuration: {}", err);
            return;
        }
    };

    let store: Arc<dyn HandleStore> = Arc::new(FileHandleStore::new(state_dir()));
    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = EffectRunner::new(api, store.clone(), PollerSettings::default(), msg_tx.clone());

    // Resume a batch left tracking by a previous run.
    match store.load() {
        Ok(Some(handle)) => {
            tracker_info!("Resuming batch {} from persisted state", handle);
            let _ = msg_tx.send(Msg::ResumeRequested {
                handle,
                at_unix: now_unix(),
            });
        }
        Ok(None) => {}
        Err(err) => tracker_warn!("Could not read persisted handle: {}", err),
    }

    let quit = Arc::new(AtomicBool::new(false));
    spawn_elapsed_ticker(msg_tx.clone());
    spawn_stdin_reader(msg_tx, quit.clone());

    println!("commands: submit <batch_size> [weight] [country] | pending | abandon | dismiss | quit");

    let mut state = TrackerState::new();
    while !quit.load(Ordering::SeqCst) {
        match msg_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(msg) => {
                let (next, effects) = update(std::mem::take(&mut state), msg);
                state = next;
                runner.enqueue(effects);
                if state.consume_dirty() {
                    for line in render_lines(&state.view()) {
                        println!("{line}");
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
    // Dropping the runner tears down the engine thread and any live
    // polling session before the process exits.
    drop(runner);
}

fn state_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// One-second tick so the elapsed display advances even when polls fail.
fn spawn_elapsed_ticker(msg_tx: mpsc::Sender<Msg>) {
    thread::spawn(move || {
        let interval = Duration::from_secs(1);
        while msg_tx
            .send(Msg::ElapsedTick {
                now_unix: now_unix(),
            })
            .is_ok()
        {
            thread::sleep(interval);
        }
    });
}

fn spawn_stdin_reader(msg_tx: mpsc::Sender<Msg>, quit: Arc<AtomicBool>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match parse_command(trimmed) {
                Ok(Command::Submit(params)) => {
                    let _ = msg_tx.send(Msg::SubmitRequested(params));
                }
                Ok(Command::Abandon) => {
                    let _ = msg_tx.send(Msg::AbandonRequested);
                }
                Ok(Command::Pending) => {
                    let _ = msg_tx.send(Msg::PendingRefreshRequested);
                }
                Ok(Command::Dismiss) => {
                    let _ = msg_tx.send(Msg::ErrorDismissed);
                }
                Ok(Command::Quit) => {
                    quit.store(true, Ordering::SeqCst);
                    return;
                }
                Err(message) => println!("{message}"),
            }
        }
        quit.store(true, Ordering::SeqCst);
    });
}

fn render_lines(view: &TrackerViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    let banner = match &view.banner {
        Banner::Idle => "idle; no batch tracked".to_string(),
        Banner::Submitting => "submitting batch...".to_string(),
        Banner::Queued => "batch accepted; waiting to start".to_string(),
        Banner::InProgress => {
            let progress = view.progress_text.as_deref().unwrap_or("-");
            format!("processing {} ({:.0}%)", progress, view.percent)
        }
        Banner::Success { found, errors } => {
            format!("batch completed: {found} similar companies found, {errors} errors")
        }
        Banner::PartialSuccess { found, errors } => {
            format!("batch completed with errors: {found} found, {errors} errors")
        }
        Banner::Failed => "batch failed before finishing".to_string(),
    };
    lines.push(banner);
    if let Some(elapsed) = &view.elapsed_text {
        lines.push(format!("elapsed: {elapsed}"));
    }
    if let Some(warning) = &view.poll_warning {
        lines.push(format!("warning: {warning}"));
    }
    if let Some(error) = &view.error {
        lines.push(format!("error: {error}"));
    }
    if let Some(total) = view.pending_total {
        lines.push(format!("pending backlog: {total}"));
    }
    lines
}
