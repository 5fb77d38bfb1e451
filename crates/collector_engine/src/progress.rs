use std::sync::{mpsc, Arc, Mutex};

use collector_core::{CrawlSnapshot, CrawlState};

use crate::CrawlEvent;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: CrawlEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<CrawlEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<CrawlEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: CrawlEvent) {
        let _ = self.tx.send(event);
    }
}

/// Mirrors events into a shared snapshot before forwarding them.
pub(crate) struct SnapshotSink<S> {
    snapshot: Arc<Mutex<CrawlSnapshot>>,
    inner: S,
}

impl<S: ProgressSink> SnapshotSink<S> {
    pub(crate) fn new(snapshot: Arc<Mutex<CrawlSnapshot>>, inner: S) -> Self {
        Self { snapshot, inner }
    }
}

impl<S: ProgressSink> ProgressSink for SnapshotSink<S> {
    fn emit(&self, event: CrawlEvent) {
        if let Ok(mut snapshot) = self.snapshot.lock() {
            match &event {
                CrawlEvent::Started { .. } => {
                    snapshot.state = CrawlState::Running;
                }
                CrawlEvent::Visiting { url, visited_count } => {
                    snapshot.current_url = Some(url.clone());
                    snapshot.visited_count = *visited_count;
                }
                CrawlEvent::PageDone { found_count, .. } => {
                    snapshot.found_count = *found_count;
                }
                CrawlEvent::PageFailed { .. } => {}
                CrawlEvent::Finished(report) => {
                    snapshot.state = report.state;
                    snapshot.current_url = None;
                    snapshot.found_count = report.found.len();
                    snapshot.visited_count = report.visited.len();
                }
            }
        }
        self.inner.emit(event);
    }
}
