use std::sync::Arc;
use std::time::Duration;

use collector_core::{
    CrawlReport, CrawlRequest, CrawlRun, CrawlState, LinkDecision, NormalizedUrl, SourcePage,
};
use engine_logging::{engine_debug, engine_info, engine_trace, engine_warn};
use tokio_util::sync::CancellationToken;

use crate::decode::decode_html;
use crate::{CrawlEvent, FailureKind, Fetcher, LinkExtractor, ProgressSink};

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Pause after each processed page.
    pub politeness_delay: Duration,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            politeness_delay: Duration::from_secs(1),
        }
    }
}

enum Visit {
    Done,
    AlreadyVisited,
    Failed,
    Cancelled,
}

/// Sequential crawl loop over a fetcher and a link extractor.
///
/// One URL is in flight at a time. Cancellation is checked before every
/// step that can block; an in-flight fetch is allowed to finish.
#[derive(Clone)]
pub struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    settings: CrawlSettings,
}

impl Crawler {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
        settings: CrawlSettings,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            settings,
        }
    }

    /// Run one crawl to completion, exhaustion or cancellation.
    pub async fn run(
        &self,
        request: &CrawlRequest,
        cancel: &CancellationToken,
        sink: &dyn ProgressSink,
    ) -> CrawlReport {
        let Some(start) = request.normalized_start() else {
            return CrawlReport::failed(format!("cannot crawl {}", request.start_url));
        };
        let mut run = CrawlRun::new(start, request.mode, request.domain_only);
        sink.emit(CrawlEvent::Started {
            start_url: request.start_url.clone(),
        });

        let mut cancelled = false;
        while let Some(url) = run.next_url() {
            if let Visit::Cancelled = self.visit(&mut run, url, cancel, sink).await {
                cancelled = true;
                break;
            }
        }
        let state = if cancelled || cancel.is_cancelled() {
            CrawlState::Stopped
        } else {
            CrawlState::Completed
        };
        engine_info!(
            "Crawl of {} ended {:?}: {} found, {} visited",
            request.start_url,
            state,
            run.found_count(),
            run.visited_count()
        );

        CrawlReport {
            state,
            found: run.found_links(),
            visited: run.visited_links(),
            error: None,
        }
    }

    async fn visit(
        &self,
        run: &mut CrawlRun,
        url: NormalizedUrl,
        cancel: &CancellationToken,
        sink: &dyn ProgressSink,
    ) -> Visit {
        if cancel.is_cancelled() {
            return Visit::Cancelled;
        }
        if !run.begin_visit(&url) {
            return Visit::AlreadyVisited;
        }
        sink.emit(CrawlEvent::Visiting {
            url: url.to_string(),
            visited_count: run.visited_count(),
        });

        let output = match self.fetcher.fetch(url.as_str()).await {
            Ok(output) => output,
            Err(_) if cancel.is_cancelled() => return Visit::Cancelled,
            Err(err) => {
                if let FailureKind::UnsupportedContentType { .. } = err.kind {
                    engine_debug!("Skipping {}: {}", url, err);
                } else {
                    engine_warn!("Error scraping {}: {}", url, err);
                }
                sink.emit(CrawlEvent::PageFailed {
                    url: url.to_string(),
                    error: err,
                });
                return Visit::Failed;
            }
        };
        if cancel.is_cancelled() {
            return Visit::Cancelled;
        }

        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());
        let hrefs = self.extractor.extract_links(&decoded.html);
        engine_trace!("{} raw hrefs on {}", hrefs.len(), url);

        let page = SourcePage::new(url);
        let mut new_links = 0;
        for href in &hrefs {
            if cancel.is_cancelled() {
                return Visit::Cancelled;
            }
            match run.record_link(&page, href) {
                LinkDecision::Found(_) | LinkDecision::FoundAndQueued(_) => new_links += 1,
                LinkDecision::Skipped | LinkDecision::OtherDomain | LinkDecision::Duplicate => {}
            }
        }
        sink.emit(CrawlEvent::PageDone {
            url: page.url().to_string(),
            new_links,
            found_count: run.found_count(),
        });

        if !self.settings.politeness_delay.is_zero() {
            tokio::select! {
                _ = tokio::time::sleep(self.settings.politeness_delay) => {}
                _ = cancel.cancelled() => return Visit::Cancelled,
            }
        }
        Visit::Done
    }
}
