use std::fmt;

use collector_core::CrawlReport;

/// Progress and completion messages from a crawl worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlEvent {
    Started {
        start_url: String,
    },
    /// A page is about to be fetched.
    Visiting {
        url: String,
        visited_count: usize,
    },
    /// Fetch or parse failed; the page counts as visited with no links.
    PageFailed {
        url: String,
        error: FetchError,
    },
    /// A page was processed.
    PageDone {
        url: String,
        new_links: usize,
        found_count: usize,
    },
    Finished(CrawlReport),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutput {
    pub bytes: Vec<u8>,
    pub metadata: FetchMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchMetadata {
    pub original_url: String,
    /// URL after redirects.
    pub final_url: String,
    pub status: u16,
    pub content_type: Option<String>,
    pub byte_len: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Not an HTML page. `None` when the server sent no content type at all.
    UnsupportedContentType { content_type: Option<String> },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType {
                content_type: Some(content_type),
            } => write!(f, "unsupported content type {content_type}"),
            FailureKind::UnsupportedContentType { content_type: None } => {
                write!(f, "missing content type")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
