use engine_logging::engine_warn;
use scraper::{Html, Selector};

/// Pulls raw, unresolved hrefs out of an HTML document.
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, html: &str) -> Vec<String>;
}

/// Collects the `href` of every `<a>` element in document order.
///
/// Values are trimmed but otherwise untouched; resolution and filtering
/// happen later against the page URL.
#[derive(Debug, Clone, Default)]
pub struct AnchorLinkExtractor {
    max_links_per_page: Option<usize>,
}

impl AnchorLinkExtractor {
    /// Extractor that keeps every href on the page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the first `max_links_per_page` hrefs; the rest are dropped with a warning.
    pub fn with_max_links(max_links_per_page: usize) -> Self {
        Self {
            max_links_per_page: Some(max_links_per_page),
        }
    }
}

impl LinkExtractor for AnchorLinkExtractor {
    fn extract_links(&self, html: &str) -> Vec<String> {
        let Ok(anchors) = Selector::parse("a[href]") else {
            return Vec::new();
        };
        let document = Html::parse_document(html);
        let mut links: Vec<String> = document
            .select(&anchors)
            .filter_map(|element| element.value().attr("href"))
            .map(|href| href.trim().to_string())
            .collect();

        if let Some(max) = self.max_links_per_page {
            if links.len() > max {
                engine_warn!(
                    "Dropping {} of {} links on page (limit {} per page)",
                    links.len() - max,
                    links.len(),
                    max
                );
                links.truncate(max);
            }
        }
        links
    }
}
