use crate::view_model::AppViewModel;
use crate::{CrawlRequest, InputError};

/// Where the front end is in one collect-links cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    /// Cancellation requested, waiting for the worker to unwind.
    Stopping,
    /// Worker done, link list being written.
    Saving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedLinks {
    pub count: usize,
    pub path: String,
}

/// How the last run ended. Exactly one of these per finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    LinksSaved(SavedLinks),
    /// `saved` holds the partial result if anything was found before the stop.
    StoppedByUser {
        saved: Option<SavedLinks>,
        forced: bool,
    },
    NoLinksFound,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    session: SessionState,
    request: Option<CrawlRequest>,
    current_url: Option<String>,
    found_count: usize,
    stopped: bool,
    outcome: Option<Outcome>,
    input_error: Option<InputError>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn is_busy(&self) -> bool {
        self.session != SessionState::Idle
    }

    pub fn found_count(&self) -> usize {
        self.found_count
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            session: self.session,
            status_text: self.status_text(),
            current_url: self.current_url.clone(),
            found_count: self.found_count,
            outcome: self.outcome.clone(),
            input_error: self.input_error.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn reject_input(&mut self, err: InputError) {
        self.input_error = Some(err);
        self.dirty = true;
    }

    pub(crate) fn begin_run(&mut self, request: CrawlRequest) {
        self.session = SessionState::Running;
        self.request = Some(request);
        self.current_url = None;
        self.found_count = 0;
        self.stopped = false;
        self.outcome = None;
        self.input_error = None;
        self.dirty = true;
    }

    pub(crate) fn begin_stop(&mut self) {
        self.session = SessionState::Stopping;
        self.stopped = true;
        self.dirty = true;
    }

    pub(crate) fn apply_progress(&mut self, current_url: Option<String>, found_count: usize) {
        if self.current_url != current_url || self.found_count != found_count {
            self.current_url = current_url;
            self.found_count = found_count;
            self.dirty = true;
        }
    }

    pub(crate) fn begin_save(&mut self, found_count: usize, stopped: bool) -> Option<String> {
        self.session = SessionState::Saving;
        self.found_count = found_count;
        self.stopped |= stopped;
        self.dirty = true;
        self.request.as_ref().map(|r| r.output_filename.clone())
    }

    pub(crate) fn was_stopped(&self) -> bool {
        self.stopped
    }

    pub(crate) fn finish(&mut self, outcome: Outcome) {
        self.session = SessionState::Idle;
        self.current_url = None;
        self.outcome = Some(outcome);
        self.dirty = true;
    }

    fn status_text(&self) -> String {
        match self.session {
            SessionState::Running => match &self.current_url {
                Some(url) => format!("Scraping: {url}"),
                None => "Starting...".to_string(),
            },
            SessionState::Stopping => "Stopping... Please wait.".to_string(),
            SessionState::Saving => format!("Saving {} links...", self.found_count),
            SessionState::Idle => match (&self.outcome, &self.input_error) {
                (_, Some(err)) => format!("Error: {err}"),
                (Some(outcome), None) => outcome_text(outcome),
                (None, None) => "Ready".to_string(),
            },
        }
    }
}

fn outcome_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::LinksSaved(saved) => {
            format!("Completed! Saved {} links to {}.", saved.count, saved.path)
        }
        Outcome::StoppedByUser { forced: true, .. } => "Scraping forcefully stopped.".to_string(),
        Outcome::StoppedByUser {
            saved: Some(saved), ..
        } => format!(
            "Scraping stopped by user. Saved {} links to {}.",
            saved.count, saved.path
        ),
        Outcome::StoppedByUser { saved: None, .. } => "Scraping stopped by user.".to_string(),
        Outcome::NoLinksFound => "No links found.".to_string(),
        Outcome::Error(message) => format!("Error: {message}"),
    }
}
