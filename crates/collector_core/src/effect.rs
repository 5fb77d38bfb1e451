use std::time::Duration;

use crate::CrawlRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Start a crawl worker for a validated request.
    StartCrawl(CrawlRequest),
    /// Ask the running worker to stop at its next checkpoint.
    CancelCrawl,
    /// Deliver `Msg::ForceStopElapsed` after `grace` unless the worker exits first.
    ScheduleForceStop { grace: Duration },
    /// Stop waiting for a worker that ignored cancellation.
    AbandonCrawl,
    /// Persist the sorted link list.
    SaveLinks { links: Vec<String>, filename: String },
}
