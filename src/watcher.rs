//! Polling directory watcher driving the transform pipeline.
//!
//! The `notify` polling backend scans the input root on its own thread and
//! forwards raw events over a channel. A single worker thread drains that
//! channel and runs the pipeline for one event at a time, so there is never
//! more than one transform in flight.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{select, unbounded, Receiver, Sender};
use notify::{Config as NotifyConfig, Event, PollWatcher, RecursiveMode, Watcher};

use crate::error::WatchError;
use crate::model::WatchEvent;
use crate::path_mapper::is_staging_file;
use crate::pipeline::{TransformPipeline, TransformResult};

/// A watch event that reached the pipeline, with its outcome.
#[derive(Debug)]
pub struct ProcessedEvent {
    pub event: WatchEvent,
    pub result: TransformResult,
}

pub struct DirectoryWatcher {
    pipeline: Arc<TransformPipeline>,
    backend: Option<PollWatcher>,
    shutdown_tx: Option<Sender<()>>,
    outcome_tx: Option<Sender<ProcessedEvent>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl DirectoryWatcher {
    /// Fails when the input root is missing or not a directory.
    pub fn new(pipeline: TransformPipeline) -> Result<Self, WatchError> {
        let root = pipeline.config().roots.input_root();
        if !root.is_dir() {
            return Err(WatchError::RootMissing(root.to_path_buf()));
        }

        Ok(Self {
            pipeline: Arc::new(pipeline),
            backend: None,
            shutdown_tx: None,
            outcome_tx: None,
            worker: None,
        })
    }

    /// Returns a channel receiving every pipeline outcome, in processing order.
    ///
    /// Takes effect on the next [`DirectoryWatcher::start`].
    pub fn outcomes(&mut self) -> Receiver<ProcessedEvent> {
        let (tx, rx) = unbounded();
        self.outcome_tx = Some(tx);
        rx
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Schedules polling of the input root and spawns the worker.
    pub fn start(&mut self) -> Result<(), WatchError> {
        if self.is_running() {
            return Err(WatchError::AlreadyRunning);
        }

        let config = self.pipeline.config();
        let (event_tx, event_rx) = unbounded::<notify::Result<Event>>();
        let notify_config = NotifyConfig::default()
            .with_poll_interval(config.poll_interval)
            .with_compare_contents(false);
        let mut backend = PollWatcher::new(
            move |res: notify::Result<Event>| {
                let _ = event_tx.send(res);
            },
            notify_config,
        )?;
        backend.watch(config.roots.input_root(), RecursiveMode::Recursive)?;

        let (shutdown_tx, shutdown_rx) = unbounded::<()>();
        let pipeline = Arc::clone(&self.pipeline);
        let outcome_tx = self.outcome_tx.clone();
        let worker = thread::Builder::new()
            .name("dicomwatch-worker".to_string())
            .spawn(move || drain_events(event_rx, shutdown_rx, &pipeline, outcome_tx.as_ref()))
            .map_err(WatchError::Spawn)?;

        log::debug!(
            "Polling {} every {:?}",
            config.roots.input_root().display(),
            config.poll_interval
        );
        self.backend = Some(backend);
        self.shutdown_tx = Some(shutdown_tx);
        self.worker = Some(worker);
        Ok(())
    }

    /// Cancels polling and joins the worker once its current transform finishes.
    pub fn stop(&mut self) -> Result<(), WatchError> {
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };

        self.backend = None;
        self.shutdown_tx = None;
        worker.join().map_err(|_| WatchError::WorkerPanicked)
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            log::warn!("Failed to stop watcher cleanly: {err}");
        }
    }
}

fn drain_events(
    events: Receiver<notify::Result<Event>>,
    shutdown: Receiver<()>,
    pipeline: &TransformPipeline,
    outcomes: Option<&Sender<ProcessedEvent>>,
) {
    loop {
        select! {
            recv(shutdown) -> _ => break,
            recv(events) -> message => match message {
                Ok(Ok(event)) => {
                    for watch_event in WatchEvent::from_notify(&event) {
                        if let Some(processed) = dispatch(pipeline, watch_event) {
                            if let Some(outcomes) = outcomes {
                                let _ = outcomes.send(processed);
                            }
                        }
                    }
                }
                Ok(Err(err)) => log::warn!("File watcher error: {err}"),
                Err(_) => break,
            },
        }
    }
    log::debug!("Watcher worker exiting");
}

fn dispatch(pipeline: &TransformPipeline, event: WatchEvent) -> Option<ProcessedEvent> {
    if event.is_directory {
        log::debug!("Ignoring directory event for {}", event.path.display());
        return None;
    }
    if is_staging_file(&event.path) {
        log::debug!("Ignoring {} (output being written)", event.path.display());
        return None;
    }
    if !pipeline.config().accepts_extension(&event.path) {
        log::debug!("Ignoring {} (extension filter)", event.path.display());
        return None;
    }

    log::info!("{} file: {}", event.kind, event.path.display());
    let result = pipeline.run_contained(&event.path)?;
    Some(ProcessedEvent { event, result })
}
