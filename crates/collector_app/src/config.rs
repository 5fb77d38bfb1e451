//! Optional RON settings file, overlaid with command-line flags.
//!
//! Example `collector.ron`:
//!
//! ```ron
//! (
//!     output_dir: Some("lists"),
//!     politeness_delay_ms: Some(500),
//!     request_timeout_secs: Some(20),
//!     max_links_per_page: Some(2000),
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use collector_engine::{
    AnchorLinkExtractor, CrawlController, CrawlSettings, Crawler, FetchSettings, ReqwestFetcher,
};
use engine_logging::engine_info;
use serde::Deserialize;

use crate::cli::Cli;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub output_dir: Option<PathBuf>,
    pub politeness_delay_ms: Option<u64>,
    pub connect_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
    pub redirect_limit: Option<usize>,
    pub max_bytes: Option<u64>,
    pub max_links_per_page: Option<usize>,
    pub user_agent: Option<String>,
}

pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = ron::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    engine_info!("Loaded settings from {:?}", path);
    Ok(config)
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub fetch: FetchSettings,
    pub crawl: CrawlSettings,
    pub max_links_per_page: Option<usize>,
    pub output_dir: PathBuf,
}

impl Settings {
    /// Defaults, then the config file, then flags.
    pub fn resolve(config: AppConfig, cli: &Cli) -> Self {
        let mut fetch = FetchSettings::default();
        if let Some(secs) = config.connect_timeout_secs {
            fetch.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = cli.timeout_secs.or(config.request_timeout_secs) {
            fetch.request_timeout = Duration::from_secs(secs);
        }
        if let Some(limit) = config.redirect_limit {
            fetch.redirect_limit = limit;
        }
        if let Some(max_bytes) = config.max_bytes {
            fetch.max_bytes = max_bytes;
        }
        if let Some(user_agent) = config.user_agent {
            fetch.user_agent = user_agent;
        }

        let mut crawl = CrawlSettings::default();
        if let Some(ms) = cli.delay_ms.or(config.politeness_delay_ms) {
            crawl.politeness_delay = Duration::from_millis(ms);
        }

        let output_dir = cli
            .output_dir
            .clone()
            .or(config.output_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            fetch,
            crawl,
            max_links_per_page: config.max_links_per_page,
            output_dir,
        }
    }

    pub fn controller(&self) -> Result<CrawlController> {
        let fetcher = ReqwestFetcher::new(self.fetch.clone()).context("failed to set up HTTP client")?;
        let extractor = self
            .max_links_per_page
            .map_or_else(AnchorLinkExtractor::new, AnchorLinkExtractor::with_max_links);
        Ok(CrawlController::new(Crawler::new(
            Arc::new(fetcher),
            Arc::new(extractor),
            self.crawl.clone(),
        )))
    }
}
