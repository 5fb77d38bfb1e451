use std::sync::Once;

use collector_core::{
    update, AppState, CrawlMode, CrawlReport, CrawlRequest, CrawlState, Effect, InputError, Msg,
    Outcome, SavedLinks, SessionState, FORCE_STOP_GRACE,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn start(state: AppState, url: &str, filename: &str) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::StartRequested {
            url: url.to_string(),
            filename: filename.to_string(),
            mode: CrawlMode::DomainCrawl,
            domain_only: false,
        },
    )
}

fn running() -> AppState {
    let (state, effects) = start(AppState::new(), "https://a.com/", "links");
    assert_eq!(effects.len(), 1);
    state
}

fn report(state: CrawlState, found: &[&str]) -> CrawlReport {
    CrawlReport {
        state,
        found: found.iter().map(|s| s.to_string()).collect(),
        visited: vec!["https://a.com".to_string()],
        error: None,
    }
}

#[test]
fn valid_start_moves_to_running_and_emits_request() {
    init_logging();
    let (mut state, effects) = start(AppState::new(), "  example.com/docs ", "links");

    assert_eq!(state.session(), SessionState::Running);
    assert!(state.consume_dirty());
    assert_eq!(
        effects,
        vec![Effect::StartCrawl(CrawlRequest {
            start_url: "https://example.com/docs".to_string(),
            mode: CrawlMode::DomainCrawl,
            domain_only: false,
            output_filename: "links.txt".to_string(),
        })]
    );
}

#[test]
fn invalid_input_stays_idle() {
    init_logging();
    let (state, effects) = start(AppState::new(), "https://a.com", "   ");
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);
    assert_eq!(state.view().input_error, Some(InputError::MissingFilename));

    let (state, effects) = start(state, "", "links");
    assert!(effects.is_empty());
    assert_eq!(state.view().input_error, Some(InputError::MissingUrl));
    assert_eq!(state.view().status_text, "Error: please enter a URL");

    let (state, effects) = start(state, "https://", "links");
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);

    let (state, effects) = start(state, "https://a.com", "sub/links");
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);
    assert_eq!(
        state.view().input_error,
        Some(InputError::InvalidFilename("sub/links".to_string()))
    );
    assert_eq!(state.view().status_text, "Error: invalid file name: sub/links");
}

#[test]
fn start_is_ignored_while_running() {
    init_logging();
    let (state, effects) = start(running(), "https://b.com", "other");

    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Running);
}

#[test]
fn cancel_emits_cancel_and_force_stop_timer() {
    init_logging();
    let (state, effects) = update(running(), Msg::CancelRequested);

    assert_eq!(state.session(), SessionState::Stopping);
    assert_eq!(state.view().status_text, "Stopping... Please wait.");
    assert_eq!(
        effects,
        vec![
            Effect::CancelCrawl,
            Effect::ScheduleForceStop {
                grace: FORCE_STOP_GRACE
            }
        ]
    );

    // Second cancel is a no-op.
    let (_state, effects) = update(state, Msg::CancelRequested);
    assert!(effects.is_empty());
}

#[test]
fn progress_updates_status_line() {
    init_logging();
    let (mut state, _) = update(
        running(),
        Msg::Progress {
            current_url: Some("https://a.com/p1".to_string()),
            found_count: 4,
        },
    );

    let view = state.view();
    assert_eq!(view.status_text, "Scraping: https://a.com/p1");
    assert_eq!(view.found_count, 4);
    assert!(state.consume_dirty());
}

#[test]
fn completed_with_links_saves_then_reports_saved() {
    init_logging();
    let links = ["https://a.com/p1", "https://a.com/p2"];
    let (state, effects) = update(
        running(),
        Msg::CrawlFinished(report(CrawlState::Completed, &links)),
    );

    assert_eq!(state.session(), SessionState::Saving);
    assert_eq!(
        effects,
        vec![Effect::SaveLinks {
            links: links.iter().map(|s| s.to_string()).collect(),
            filename: "links.txt".to_string(),
        }]
    );

    let (state, effects) = update(state, Msg::SaveFinished(Ok("out/links.txt".to_string())));
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);
    assert_eq!(
        state.outcome(),
        Some(&Outcome::LinksSaved(SavedLinks {
            count: 2,
            path: "out/links.txt".to_string(),
        }))
    );
    assert_eq!(
        state.view().status_text,
        "Completed! Saved 2 links to out/links.txt."
    );
}

#[test]
fn completed_without_links_is_no_links_found() {
    init_logging();
    let (state, effects) = update(running(), Msg::CrawlFinished(report(CrawlState::Completed, &[])));

    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);
    assert_eq!(state.outcome(), Some(&Outcome::NoLinksFound));
}

#[test]
fn stopped_with_links_still_saves_partial_result() {
    init_logging();
    let (state, _) = update(running(), Msg::CancelRequested);
    let (state, effects) = update(
        state,
        Msg::CrawlFinished(report(CrawlState::Stopped, &["https://a.com/p1"])),
    );
    assert!(matches!(effects.as_slice(), [Effect::SaveLinks { .. }]));

    let (state, _) = update(state, Msg::SaveFinished(Ok("links.txt".to_string())));
    assert_eq!(
        state.outcome(),
        Some(&Outcome::StoppedByUser {
            saved: Some(SavedLinks {
                count: 1,
                path: "links.txt".to_string(),
            }),
            forced: false,
        })
    );
}

#[test]
fn stopped_without_links_does_not_save() {
    init_logging();
    let (state, _) = update(running(), Msg::CancelRequested);
    let (state, effects) = update(state, Msg::CrawlFinished(report(CrawlState::Stopped, &[])));

    assert!(effects.is_empty());
    assert_eq!(
        state.outcome(),
        Some(&Outcome::StoppedByUser {
            saved: None,
            forced: false,
        })
    );
}

#[test]
fn failed_run_never_saves() {
    init_logging();
    let mut failed = report(CrawlState::Failed, &["https://a.com/p1"]);
    failed.error = Some("runtime unavailable".to_string());

    let (state, effects) = update(running(), Msg::CrawlFinished(failed));

    assert!(effects.is_empty());
    assert_eq!(
        state.outcome(),
        Some(&Outcome::Error("runtime unavailable".to_string()))
    );
}

#[test]
fn save_failure_is_an_error_outcome() {
    init_logging();
    let (state, _) = update(
        running(),
        Msg::CrawlFinished(report(CrawlState::Completed, &["https://a.com/p1"])),
    );
    let (state, _) = update(state, Msg::SaveFinished(Err("disk full".to_string())));

    assert_eq!(
        state.outcome(),
        Some(&Outcome::Error("failed to save file: disk full".to_string()))
    );
}

#[test]
fn force_stop_abandons_worker_and_ignores_late_report() {
    init_logging();
    let (state, _) = update(running(), Msg::CancelRequested);
    let (state, effects) = update(state, Msg::ForceStopElapsed);

    assert_eq!(effects, vec![Effect::AbandonCrawl]);
    assert_eq!(state.session(), SessionState::Idle);
    assert_eq!(state.view().status_text, "Scraping forcefully stopped.");

    let (state, effects) = update(
        state,
        Msg::CrawlFinished(report(CrawlState::Stopped, &["https://a.com/p1"])),
    );
    assert!(effects.is_empty());
    assert_eq!(state.session(), SessionState::Idle);
}

#[test]
fn force_stop_after_clean_exit_is_ignored() {
    init_logging();
    let (state, _) = update(running(), Msg::CancelRequested);
    let (state, _) = update(state, Msg::CrawlFinished(report(CrawlState::Stopped, &[])));
    let before = state.clone();

    let (state, effects) = update(state, Msg::ForceStopElapsed);
    assert!(effects.is_empty());
    assert_eq!(state, before);
}

#[test]
fn new_run_can_start_after_outcome() {
    init_logging();
    let (state, _) = update(running(), Msg::CrawlFinished(report(CrawlState::Completed, &[])));
    let (state, effects) = start(state, "https://b.com", "second.txt");

    assert_eq!(state.session(), SessionState::Running);
    assert_eq!(state.outcome(), None);
    assert!(matches!(
        effects.as_slice(),
        [Effect::StartCrawl(CrawlRequest { output_filename, .. })] if output_filename == "second.txt"
    ));
}

#[test]
fn idle_session_ignores_stray_messages() {
    init_logging();
    let state = AppState::new();
    for msg in [
        Msg::CancelRequested,
        Msg::ForceStopElapsed,
        Msg::SaveFinished(Ok("links.txt".to_string())),
        Msg::Progress {
            current_url: Some("https://a.com".to_string()),
            found_count: 3,
        },
    ] {
        let (next, effects) = update(state.clone(), msg);
        assert_eq!(next, state);
        assert!(effects.is_empty());
    }
}
