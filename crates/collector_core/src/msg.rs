#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User asked to collect links.
    StartRequested {
        url: String,
        filename: String,
        mode: crate::CrawlMode,
        domain_only: bool,
    },
    /// User asked to stop the running crawl.
    CancelRequested,
    /// Worker progress.
    Progress {
        current_url: Option<String>,
        found_count: usize,
    },
    /// Worker finished, in whatever terminal state.
    CrawlFinished(crate::CrawlReport),
    /// Persistence finished: saved path or error text.
    SaveFinished(Result<String, String>),
    /// The stop grace period ran out.
    ForceStopElapsed,
}
