use crate::{InputError, Outcome, SessionState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionState,
    /// One-line progress or result text.
    pub status_text: String,
    pub current_url: Option<String>,
    pub found_count: usize,
    pub outcome: Option<Outcome>,
    pub input_error: Option<InputError>,
    pub dirty: bool,
}
