use url::Url;

use crate::{normalize_url, NormalizedUrl};

const OUTPUT_EXTENSION: &str = ".txt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrawlMode {
    /// Collect the links of the start page only.
    #[default]
    SinglePage,
    /// Follow same-domain links breadth-first until nothing is left.
    DomainCrawl,
}

/// Validated input for one crawl run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRequest {
    /// Start URL as entered, with `https://` prepended when no scheme was given.
    pub start_url: String,
    pub mode: CrawlMode,
    /// Only keep links whose host matches the page they were found on.
    pub domain_only: bool,
    /// Output file name, always ending in `.txt`.
    pub output_filename: String,
}

impl CrawlRequest {
    /// The start URL in the same canonical form as every discovered link.
    pub fn normalized_start(&self) -> Option<NormalizedUrl> {
        normalize_url(&self.start_url, &self.start_url)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("please enter a name for the link list file")]
    MissingFilename,
    #[error("please enter a URL")]
    MissingUrl,
    #[error("invalid URL format: {0}")]
    InvalidUrl(String),
    /// Path separators or a bare `.`/`..`; the list is always written into the output directory.
    #[error("invalid file name: {0}")]
    InvalidFilename(String),
}

/// Check user input before a run may start.
pub fn validate_request(
    url: &str,
    filename: &str,
    mode: CrawlMode,
    domain_only: bool,
) -> Result<CrawlRequest, InputError> {
    let filename = filename.trim();
    if filename.is_empty() {
        return Err(InputError::MissingFilename);
    }
    if filename.contains(['/', '\\']) || filename == "." || filename == ".." {
        return Err(InputError::InvalidFilename(filename.to_string()));
    }
    let url = url.trim();
    if url.is_empty() {
        return Err(InputError::MissingUrl);
    }

    let start_url = with_default_scheme(url);
    let parsed = Url::parse(&start_url).map_err(|_| InputError::InvalidUrl(start_url.clone()))?;
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(InputError::InvalidUrl(start_url));
    }

    Ok(CrawlRequest {
        start_url,
        mode,
        domain_only,
        output_filename: with_txt_extension(filename),
    })
}

fn with_default_scheme(url: &str) -> String {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

pub fn with_txt_extension(filename: &str) -> String {
    if filename.ends_with(OUTPUT_EXTENSION) {
        filename.to_string()
    } else {
        format!("{filename}{OUTPUT_EXTENSION}")
    }
}
