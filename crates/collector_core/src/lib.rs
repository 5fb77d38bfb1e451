//! Link collector core: URL normalization, crawl bookkeeping and the pure session state machine.
mod effect;
mod frontier;
mod msg;
mod normalize;
mod report;
mod request;
mod run;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use frontier::Frontier;
pub use msg::Msg;
pub use normalize::{domain_of, is_skipped_href, normalize_url, NormalizedUrl};
pub use report::{CrawlReport, CrawlSnapshot, CrawlState};
pub use request::{validate_request, with_txt_extension, CrawlMode, CrawlRequest, InputError};
pub use run::{CrawlRun, LinkDecision, SourcePage};
pub use state::{AppState, Outcome, SavedLinks, SessionState};
pub use update::{update, FORCE_STOP_GRACE};
pub use view_model::AppViewModel;
