/// Lifecycle of the crawl worker: `Idle -> Running -> {Completed, Stopped, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlState {
    #[default]
    Idle,
    Running,
    /// Frontier exhausted (or the single page processed). May have found nothing.
    Completed,
    /// Cancellation was observed before the run finished.
    Stopped,
    /// Internal fault; partial results are not persisted.
    Failed,
}

/// Read-only progress view, safe to poll from another thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSnapshot {
    pub state: CrawlState,
    pub current_url: Option<String>,
    pub found_count: usize,
    pub visited_count: usize,
}

/// Final result of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlReport {
    pub state: CrawlState,
    /// Sorted found links.
    pub found: Vec<String>,
    /// Sorted visited (attempted) links.
    pub visited: Vec<String>,
    pub error: Option<String>,
}

impl CrawlReport {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            state: CrawlState::Failed,
            found: Vec::new(),
            visited: Vec::new(),
            error: Some(message.into()),
        }
    }
}
