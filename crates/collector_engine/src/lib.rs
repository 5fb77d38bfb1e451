//! Link collector engine: fetching, link extraction, the crawl worker and persistence.
mod controller;
mod crawl;
mod decode;
mod fetch;
mod links;
mod persist;
mod progress;
mod types;

pub use controller::{CrawlController, Shutdown, StartError};
pub use crawl::{CrawlSettings, Crawler};
pub use decode::{decode_html, DecodedHtml};
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher};
pub use links::{AnchorLinkExtractor, LinkExtractor};
pub use persist::{ensure_output_dir, save_link_list, AtomicFileWriter, PersistError};
pub use progress::{ChannelProgressSink, ProgressSink};
pub use types::{CrawlEvent, FailureKind, FetchError, FetchMetadata, FetchOutput};
