#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use collector_core::{CrawlMode, CrawlRequest};
use collector_engine::{
    CrawlEvent, FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher, ProgressSink,
};
use tokio_util::sync::CancellationToken;

enum Page {
    Html(String),
    Fail(FailureKind),
}

/// In-memory site keyed by exact URL. Unknown URLs answer 404.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, Page>,
    calls: Mutex<Vec<String>>,
    cancel_on: Option<(String, CancellationToken)>,
    delay: Duration,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, hrefs: &[&str]) -> Self {
        let body: String = hrefs
            .iter()
            .map(|href| format!("<a href=\"{href}\">link</a>\n"))
            .collect();
        self.pages.insert(
            url.to_string(),
            Page::Html(format!("<html><body>{body}</body></html>")),
        );
        self
    }

    pub fn failing(mut self, url: &str, kind: FailureKind) -> Self {
        self.pages.insert(url.to_string(), Page::Fail(kind));
        self
    }

    /// Cancel `token` while `url` is being fetched.
    pub fn cancel_on(mut self, url: &str, token: CancellationToken) -> Self {
        self.cancel_on = Some((url.to_string(), token));
        self
    }

    /// Every fetch sleeps this long first.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for FakeSite {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some((target, token)) = &self.cancel_on {
            if target == url {
                token.cancel();
            }
        }
        match self.pages.get(url) {
            Some(Page::Html(html)) => Ok(FetchOutput {
                bytes: html.as_bytes().to_vec(),
                metadata: FetchMetadata {
                    original_url: url.to_string(),
                    final_url: url.to_string(),
                    status: 200,
                    content_type: Some("text/html; charset=utf-8".to_string()),
                    byte_len: html.len() as u64,
                },
            }),
            Some(Page::Fail(kind)) => Err(FetchError::new(kind.clone(), "fake failure")),
            None => Err(FetchError::new(FailureKind::HttpStatus(404), "not found")),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CrawlEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<CrawlEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: CrawlEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn request(start_url: &str, mode: CrawlMode, domain_only: bool) -> CrawlRequest {
    CrawlRequest {
        start_url: start_url.to_string(),
        mode,
        domain_only,
        output_filename: "links.txt".to_string(),
    }
}
