use std::path::Path;
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use collector_core::{update, AppState, AppViewModel, Msg, Outcome, SessionState};
use engine_logging::{engine_info, engine_warn};
use log::LevelFilter;

use crate::cli::Cli;
use crate::config::{load_config, AppConfig, Settings};
use crate::effects::EffectRunner;

const LOG_FILE: &str = "./collector.log";
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const EXIT_OK: u8 = 0;
const EXIT_FAILED: u8 = 1;
const EXIT_INPUT_ERROR: u8 = 2;
const EXIT_STOPPED: u8 = 130;

pub fn run(cli: Cli) -> Result<ExitCode> {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    engine_logging::initialize(cli.log.into(), level, Path::new(LOG_FILE));

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    let settings = Settings::resolve(config, &cli);
    engine_info!(
        "Settings: delay={:?} timeout={:?} output_dir={:?}",
        settings.crawl.politeness_delay,
        settings.fetch.request_timeout,
        settings.output_dir
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    spawn_ctrl_c_listener(msg_tx.clone())?;

    let controller = settings.controller()?;
    let mut runner = EffectRunner::new(controller, settings.output_dir, msg_tx);
    let mut printer = StatusPrinter::default();
    let mut state = dispatch(
        AppState::new(),
        Msg::StartRequested {
            url: cli.url,
            filename: cli.output,
            mode: cli.mode.into(),
            domain_only: cli.domain_only,
        },
        &mut runner,
        &mut printer,
    );

    loop {
        if let Some(code) = exit_code(&state.view()) {
            return Ok(ExitCode::from(code));
        }
        match msg_rx.recv_timeout(POLL_INTERVAL) {
            Ok(msg) => state = dispatch(state, msg, &mut runner, &mut printer),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                anyhow::bail!("message channel closed while a crawl was active")
            }
        }
        runner.pump();
    }
}

fn dispatch(
    state: AppState,
    msg: Msg,
    runner: &mut EffectRunner,
    printer: &mut StatusPrinter,
) -> AppState {
    let (mut state, effects) = update(state, msg);
    if state.consume_dirty() {
        printer.render(&state.view());
    }
    runner.enqueue(effects);
    state
}

/// `None` while the session still has work to do.
fn exit_code(view: &AppViewModel) -> Option<u8> {
    if view.session != SessionState::Idle {
        return None;
    }
    if view.input_error.is_some() {
        return Some(EXIT_INPUT_ERROR);
    }
    match view.outcome.as_ref()? {
        Outcome::LinksSaved(_) | Outcome::NoLinksFound => Some(EXIT_OK),
        Outcome::StoppedByUser { .. } => Some(EXIT_STOPPED),
        Outcome::Error(_) => Some(EXIT_FAILED),
    }
}

fn spawn_ctrl_c_listener(msg_tx: mpsc::Sender<Msg>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build signal runtime")?;
    thread::Builder::new()
        .name("ctrl-c".to_string())
        .spawn(move || {
            runtime.block_on(async {
                while tokio::signal::ctrl_c().await.is_ok() {
                    engine_info!("Ctrl-C received, stopping crawl");
                    if msg_tx.send(Msg::CancelRequested).is_err() {
                        break;
                    }
                }
                engine_warn!("Ctrl-C listener stopped");
            });
        })
        .context("failed to spawn Ctrl-C listener")?;
    Ok(())
}

/// Prints one line per visible change, skipping repeats.
#[derive(Default)]
struct StatusPrinter {
    last: Option<String>,
}

impl StatusPrinter {
    fn render(&mut self, view: &AppViewModel) {
        if let Some(err) = &view.input_error {
            eprintln!("Error: {err}");
            return;
        }
        let line = match view.session {
            SessionState::Running if view.current_url.is_some() => {
                format!("{} ({} links found)", view.status_text, view.found_count)
            }
            _ => view.status_text.clone(),
        };
        if self.last.as_deref() == Some(line.as_str()) {
            return;
        }
        if matches!(view.outcome, Some(Outcome::Error(_))) {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
        self.last = Some(line);
    }
}
