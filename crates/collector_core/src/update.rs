use std::time::Duration;

use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::{
    validate_request, AppState, CrawlReport, CrawlState, Effect, Msg, Outcome, SavedLinks,
    SessionState,
};

/// How long a stop request may take before the front end gives up on the worker.
pub const FORCE_STOP_GRACE: Duration = Duration::from_secs(2);

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StartRequested {
            url,
            filename,
            mode,
            domain_only,
        } => {
            if state.is_busy() {
                return (state, Vec::new());
            }
            match validate_request(&url, &filename, mode, domain_only) {
                Ok(request) => {
                    engine_info!(
                        "Starting {:?} crawl of {} (domain_only={})",
                        request.mode,
                        request.start_url,
                        request.domain_only
                    );
                    state.begin_run(request.clone());
                    vec![Effect::StartCrawl(request)]
                }
                Err(err) => {
                    engine_warn!("Rejected crawl input: {}", err);
                    state.reject_input(err);
                    Vec::new()
                }
            }
        }
        Msg::CancelRequested => {
            if state.session() == SessionState::Running {
                state.begin_stop();
                vec![
                    Effect::CancelCrawl,
                    Effect::ScheduleForceStop {
                        grace: FORCE_STOP_GRACE,
                    },
                ]
            } else {
                Vec::new()
            }
        }
        Msg::Progress {
            current_url,
            found_count,
        } => {
            if matches!(
                state.session(),
                SessionState::Running | SessionState::Stopping
            ) {
                state.apply_progress(current_url, found_count);
            }
            Vec::new()
        }
        Msg::CrawlFinished(report) => match state.session() {
            SessionState::Running | SessionState::Stopping => apply_report(&mut state, report),
            SessionState::Idle | SessionState::Saving => {
                // Late report from an abandoned worker.
                engine_debug!("Ignoring crawl report in state {:?}", state.session());
                Vec::new()
            }
        },
        Msg::SaveFinished(result) => {
            if state.session() == SessionState::Saving {
                apply_save_result(&mut state, result);
            }
            Vec::new()
        }
        Msg::ForceStopElapsed => {
            if state.session() == SessionState::Stopping {
                engine_warn!("Crawl worker did not stop in time; abandoning it");
                state.finish(Outcome::StoppedByUser {
                    saved: None,
                    forced: true,
                });
                vec![Effect::AbandonCrawl]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn apply_report(state: &mut AppState, report: CrawlReport) -> Vec<Effect> {
    let stopped = report.state == CrawlState::Stopped || state.was_stopped();
    if report.state == CrawlState::Failed {
        let message = report
            .error
            .unwrap_or_else(|| "crawl failed".to_string());
        state.finish(Outcome::Error(message));
        return Vec::new();
    }
    if report.found.is_empty() {
        state.finish(if stopped {
            Outcome::StoppedByUser {
                saved: None,
                forced: false,
            }
        } else {
            Outcome::NoLinksFound
        });
        return Vec::new();
    }

    match state.begin_save(report.found.len(), stopped) {
        Some(filename) => vec![Effect::SaveLinks {
            links: report.found,
            filename,
        }],
        None => {
            state.finish(Outcome::Error("no output file for this run".to_string()));
            Vec::new()
        }
    }
}

fn apply_save_result(state: &mut AppState, result: Result<String, String>) {
    let count = state.found_count();
    let outcome = match result {
        Ok(path) => {
            let saved = SavedLinks { count, path };
            if state.was_stopped() {
                Outcome::StoppedByUser {
                    saved: Some(saved),
                    forced: false,
                }
            } else {
                Outcome::LinksSaved(saved)
            }
        }
        Err(message) => Outcome::Error(format!("failed to save file: {message}")),
    };
    state.finish(outcome);
}
