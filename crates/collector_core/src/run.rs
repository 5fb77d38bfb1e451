use std::collections::HashMap;

use crate::{normalize_url, CrawlMode, Frontier, NormalizedUrl};

/// What happened to one raw href found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkDecision {
    /// Empty, script, mail, phone or anchor-only href, or unresolvable.
    Skipped,
    /// Dropped by the domain-only filter.
    OtherDomain,
    /// Already found (or already visited) earlier in this run.
    Duplicate,
    /// New link recorded as output.
    Found(NormalizedUrl),
    /// New link recorded as output and queued for a later visit.
    FoundAndQueued(NormalizedUrl),
}

/// The page whose links are being recorded, with its host resolved once.
#[derive(Debug, Clone)]
pub struct SourcePage {
    url: NormalizedUrl,
    domain: String,
}

impl SourcePage {
    pub fn new(url: NormalizedUrl) -> Self {
        let domain = url.domain();
        Self { url, domain }
    }

    pub fn url(&self) -> &NormalizedUrl {
        &self.url
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }
}

/// Run-scoped crawl context: visited set, found links and frontier.
///
/// Built fresh for every run and owned by whoever drives that run. Both sets
/// are keyed by [`NormalizedUrl::identity`] and keep the first form seen.
#[derive(Debug, Clone)]
pub struct CrawlRun {
    mode: CrawlMode,
    domain_only: bool,
    visited: HashMap<String, NormalizedUrl>,
    found: HashMap<String, NormalizedUrl>,
    frontier: Frontier,
    dequeued: usize,
}

impl CrawlRun {
    pub fn new(start: NormalizedUrl, mode: CrawlMode, domain_only: bool) -> Self {
        let mut frontier = Frontier::new();
        frontier.enqueue(start);
        Self {
            mode,
            domain_only,
            visited: HashMap::new(),
            found: HashMap::new(),
            frontier,
            dequeued: 0,
        }
    }

    /// Next URL to visit. Single-page runs hand out the start URL and nothing else.
    pub fn next_url(&mut self) -> Option<NormalizedUrl> {
        if self.mode == CrawlMode::SinglePage && self.dequeued > 0 {
            return None;
        }
        let next = self.frontier.dequeue()?;
        self.dequeued += 1;
        Some(next)
    }

    /// Marks `url` visited. Returns false if it was visited before, in which
    /// case it must not be fetched again.
    pub fn begin_visit(&mut self, url: &NormalizedUrl) -> bool {
        if self.is_visited(url) {
            return false;
        }
        self.visited.insert(url.identity().to_owned(), url.clone());
        true
    }

    pub fn is_visited(&self, url: &NormalizedUrl) -> bool {
        self.visited.contains_key(url.identity())
    }

    /// Resolve, filter and record one raw href found on `page`.
    pub fn record_link(&mut self, page: &SourcePage, href: &str) -> LinkDecision {
        let Some(link) = normalize_url(href, page.url().as_str()) else {
            return LinkDecision::Skipped;
        };
        let link_domain = link.domain();
        let same_domain = link_domain == page.domain();
        if self.domain_only && !same_domain {
            return LinkDecision::OtherDomain;
        }
        if self.found.contains_key(link.identity()) || self.is_visited(&link) {
            return LinkDecision::Duplicate;
        }

        self.found.insert(link.identity().to_owned(), link.clone());
        // Frontier growth stays on the page's own host whatever the output filter says.
        if self.mode == CrawlMode::DomainCrawl && same_domain {
            self.frontier.enqueue(link.clone());
            LinkDecision::FoundAndQueued(link)
        } else {
            LinkDecision::Found(link)
        }
    }

    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.frontier.len()
    }

    pub fn has_pending(&self) -> bool {
        match self.mode {
            CrawlMode::SinglePage => self.dequeued == 0 && !self.frontier.is_empty(),
            CrawlMode::DomainCrawl => !self.frontier.is_empty(),
        }
    }

    /// Found links in lexicographic order.
    pub fn found_links(&self) -> Vec<String> {
        sorted_links(&self.found)
    }

    /// Visited links in lexicographic order.
    pub fn visited_links(&self) -> Vec<String> {
        sorted_links(&self.visited)
    }
}

fn sorted_links(set: &HashMap<String, NormalizedUrl>) -> Vec<String> {
    let mut links: Vec<String> = set.values().map(|u| u.as_str().to_owned()).collect();
    links.sort();
    links
}
