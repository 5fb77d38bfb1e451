use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use collector_core::{CrawlReport, CrawlRequest, CrawlSnapshot, CrawlState};
use engine_logging::{engine_error, engine_info, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::progress::SnapshotSink;
use crate::{ChannelProgressSink, CrawlEvent, Crawler, ProgressSink};

#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("a crawl is already running")]
    AlreadyRunning,
    #[error("cannot crawl {0}: not an absolute URL")]
    InvalidStartUrl(String),
    #[error("failed to spawn crawl worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result of [`CrawlController::shutdown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shutdown {
    /// Worker exited within the grace period.
    Finished(CrawlReport),
    /// Worker was still busy and has been detached.
    Forced,
    NotRunning,
}

enum Wait {
    NoWait,
    Timeout(Duration),
    Forever,
}

enum Poll {
    Event(CrawlEvent),
    Empty,
    Gone,
}

struct ActiveRun {
    cancel: CancellationToken,
    events: mpsc::Receiver<CrawlEvent>,
    worker: JoinHandle<()>,
}

/// Owns the background worker for one crawl at a time.
///
/// The caller drives it from its own thread: `start`, then poll events with
/// `try_recv`/`recv_timeout` (or block in `wait`), `cancel` at any point.
/// `snapshot` can be read at any time.
pub struct CrawlController {
    crawler: Crawler,
    snapshot: Arc<Mutex<CrawlSnapshot>>,
    active: Option<ActiveRun>,
}

impl CrawlController {
    pub fn new(crawler: Crawler) -> Self {
        Self {
            crawler,
            snapshot: Arc::new(Mutex::new(CrawlSnapshot::default())),
            active: None,
        }
    }

    pub fn start(&mut self, request: CrawlRequest) -> Result<(), StartError> {
        if self.is_running() {
            return Err(StartError::AlreadyRunning);
        }
        if request.normalized_start().is_none() {
            return Err(StartError::InvalidStartUrl(request.start_url));
        }
        self.finish_active();

        let (event_tx, event_rx) = mpsc::channel();
        let cancel = CancellationToken::new();
        self.set_snapshot(CrawlSnapshot {
            state: CrawlState::Running,
            ..CrawlSnapshot::default()
        });

        let crawler = self.crawler.clone();
        let worker_cancel = cancel.clone();
        let sink = SnapshotSink::new(self.snapshot.clone(), ChannelProgressSink::new(event_tx));
        let worker = thread::Builder::new()
            .name("crawl-worker".to_string())
            .spawn(move || {
                let report = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime.block_on(crawler.run(&request, &worker_cancel, &sink)),
                    Err(err) => {
                        engine_error!("Failed to build crawl runtime: {}", err);
                        CrawlReport::failed(format!("failed to start crawl runtime: {err}"))
                    }
                };
                sink.emit(CrawlEvent::Finished(report));
            });
        let worker = match worker {
            Ok(worker) => worker,
            Err(err) => {
                self.set_snapshot(CrawlSnapshot::default());
                return Err(StartError::Spawn(err));
            }
        };

        self.active = Some(ActiveRun {
            cancel,
            events: event_rx,
            worker,
        });
        Ok(())
    }

    /// Request a cooperative stop. Safe to call repeatedly or with no run active.
    pub fn cancel(&self) {
        if let Some(active) = &self.active {
            if !active.cancel.is_cancelled() {
                engine_info!("Cancellation requested");
            }
            active.cancel.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some() && self.snapshot().state == CrawlState::Running
    }

    pub fn snapshot(&self) -> CrawlSnapshot {
        match self.snapshot.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Return to `Idle` after a finished run. No-op while running.
    pub fn reset(&mut self) {
        if !self.is_running() {
            self.finish_active();
            self.set_snapshot(CrawlSnapshot::default());
        }
    }

    pub fn try_recv(&mut self) -> Option<CrawlEvent> {
        self.next_event(Wait::NoWait)
    }

    pub fn recv_timeout(&mut self, timeout: Duration) -> Option<CrawlEvent> {
        self.next_event(Wait::Timeout(timeout))
    }

    /// Block until the current run ends, discarding progress events.
    pub fn wait(&mut self) -> Option<CrawlReport> {
        while let Some(event) = self.next_event(Wait::Forever) {
            if let CrawlEvent::Finished(report) = event {
                return Some(report);
            }
        }
        None
    }

    /// Cancel and wait at most `grace` for the worker to unwind.
    pub fn shutdown(&mut self, grace: Duration) -> Shutdown {
        self.cancel();
        let deadline = Instant::now() + grace;
        loop {
            if self.active.is_none() {
                return Shutdown::NotRunning;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.next_event(Wait::Timeout(remaining)) {
                Some(CrawlEvent::Finished(report)) => return Shutdown::Finished(report),
                Some(_) => continue,
                None if Instant::now() >= deadline => {
                    self.abandon();
                    return Shutdown::Forced;
                }
                None => {}
            }
        }
    }

    /// Cancel and detach the worker without waiting for it.
    pub fn abandon(&mut self) {
        self.cancel();
        if self.active.take().is_some() {
            engine_warn!("Crawl worker detached before it finished");
            let mut snapshot = self.snapshot();
            snapshot.state = CrawlState::Stopped;
            snapshot.current_url = None;
            self.set_snapshot(snapshot);
        }
    }

    fn next_event(&mut self, wait: Wait) -> Option<CrawlEvent> {
        let active = self.active.as_ref()?;
        let poll = match wait {
            Wait::NoWait => match active.events.try_recv() {
                Ok(event) => Poll::Event(event),
                Err(mpsc::TryRecvError::Empty) => Poll::Empty,
                Err(mpsc::TryRecvError::Disconnected) => Poll::Gone,
            },
            Wait::Timeout(timeout) => match active.events.recv_timeout(timeout) {
                Ok(event) => Poll::Event(event),
                Err(mpsc::RecvTimeoutError::Timeout) => Poll::Empty,
                Err(mpsc::RecvTimeoutError::Disconnected) => Poll::Gone,
            },
            Wait::Forever => match active.events.recv() {
                Ok(event) => Poll::Event(event),
                Err(mpsc::RecvError) => Poll::Gone,
            },
        };

        match poll {
            Poll::Event(CrawlEvent::Finished(report)) => {
                self.finish_active();
                Some(CrawlEvent::Finished(report))
            }
            Poll::Event(event) => Some(event),
            Poll::Empty => None,
            Poll::Gone => {
                engine_error!("Crawl worker exited without a report");
                let report = CrawlReport::failed("crawl worker exited unexpectedly");
                self.set_snapshot(CrawlSnapshot {
                    state: CrawlState::Failed,
                    ..self.snapshot()
                });
                self.finish_active();
                Some(CrawlEvent::Finished(report))
            }
        }
    }

    fn finish_active(&mut self) {
        if let Some(active) = self.active.take() {
            if active.worker.join().is_err() {
                engine_error!("Crawl worker panicked");
            }
        }
    }

    fn set_snapshot(&self, snapshot: CrawlSnapshot) {
        match self.snapshot.lock() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }
}

impl Drop for CrawlController {
    fn drop(&mut self) {
        // Let a detached worker unwind at its next checkpoint.
        self.cancel();
    }
}
