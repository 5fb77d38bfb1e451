use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use collector_core::CrawlMode;
use engine_logging::LogDestination;

#[derive(Parser, Debug)]
#[command(
    name = "link-collector",
    version,
    about = "Collect the links of a web page or of a whole site into a text file",
    long_about = "link-collector fetches a start page, records every link it finds and, in \
                  domain mode, keeps following links on the same host until none are left. \
                  The sorted link list is written to <OUTPUT>.txt. Ctrl-C stops the crawl \
                  and still saves what was found."
)]
pub struct Cli {
    /// Start URL (https:// is assumed when no scheme is given)
    pub url: String,

    /// Name of the link list file; .txt is appended when missing
    #[arg(short, long)]
    pub output: String,

    /// Collect one page, or follow same-host links across the site
    #[arg(short, long, value_enum, default_value_t = ModeArg::Single)]
    pub mode: ModeArg,

    /// Only keep links on the same host as the page they were found on
    #[arg(long)]
    pub domain_only: bool,

    /// Directory for the link list [default: current directory]
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Pause between page fetches, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Per-request timeout, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// RON file with crawl and fetch settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogArg::File)]
    pub log: LogArg,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Single,
    Domain,
}

impl From<ModeArg> for CrawlMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Single => CrawlMode::SinglePage,
            ModeArg::Domain => CrawlMode::DomainCrawl,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(log: LogArg) -> Self {
        match log {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}
