use chrono::{DateTime, Local};
use tracing::debug;

use crate::fetch::{FetchEvent, FetchUpdate};
use crate::models::{Headline, InputFocus, Mode, QueryDescriptor, Summary};

/// Everything the screen shows. Mutated by the input handler and by fetch
/// events; the renderer only reads it.
#[derive(Debug)]
pub struct ViewState {
    pub query: String,
    pub input_focus: InputFocus,
    pub active_category: Option<String>,
    pub current: Option<QueryDescriptor>,
    pub mode: Mode,
    pub headlines: Vec<Headline>,
    pub summary: Option<Summary>,
    pub summary_at: Option<DateTime<Local>>,
    pub loading: bool,
    pub selected: usize,
    pub dark_mode: bool,
    pub error: Option<String>,
    generation: u64,
}

impl ViewState {
    pub fn new(dark_mode: bool, mode: Mode) -> Self {
        Self {
            query: String::new(),
            input_focus: InputFocus::Normal,
            active_category: None,
            current: None,
            mode,
            headlines: Vec::new(),
            summary: None,
            summary_at: None,
            loading: false,
            selected: 0,
            dark_mode,
            error: None,
            generation: 0,
        }
    }

    /// Clears the previous results and returns the generation the new fetch
    /// must tag its events with.
    pub fn begin_fetch(&mut self, descriptor: QueryDescriptor) -> u64 {
        self.generation += 1;
        self.mode = descriptor.mode;
        self.current = Some(descriptor);
        self.loading = true;
        self.summary = None;
        self.summary_at = None;
        self.headlines.clear();
        self.selected = 0;
        self.error = None;
        self.generation
    }

    /// Commits an event if it belongs to the latest fetch.
    pub fn apply(&mut self, event: FetchEvent) {
        if event.generation != self.generation {
            debug!(stale = event.generation, current = self.generation, "dropping stale fetch event");
            return;
        }
        match event.update {
            FetchUpdate::Headlines(headlines) => {
                self.headlines = headlines;
                self.selected = 0;
            }
            FetchUpdate::Summary(summary) => {
                self.summary = Some(summary);
                self.summary_at = Some(Local::now());
            }
            FetchUpdate::Failed(e) => {
                self.error = Some(e.to_string());
            }
            FetchUpdate::Finished => {
                self.loading = false;
            }
        }
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(self.headlines.len().saturating_sub(1));
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_headline(&self) -> Option<&Headline> {
        self.headlines.get(self.selected)
    }

    /// Switches the display mode. Returns the descriptor to re-fetch when the
    /// mode actually changed and something is on screen.
    pub fn set_mode(&mut self, mode: Mode) -> Option<QueryDescriptor> {
        if mode == self.mode {
            return None;
        }
        self.mode = mode;
        self.current.as_ref().map(|d| d.with_mode(mode))
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    pub fn focus_search(&mut self) {
        self.input_focus = InputFocus::Editing;
    }

    /// Escape: empty the field, leave it, and dismiss any message.
    pub fn clear_search(&mut self) {
        self.query.clear();
        self.input_focus = InputFocus::Normal;
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::models::{QueryTarget, SummaryMeta};

    fn headline(n: usize) -> Headline {
        Headline { title: format!("h{n}"), link: format!("https://h/{n}") }
    }

    fn event(generation: u64, update: FetchUpdate) -> FetchEvent {
        FetchEvent { generation, update }
    }

    fn summary() -> Summary {
        Summary { meta: SummaryMeta { sources: 1 }, points: vec![] }
    }

    fn populated(count: usize) -> ViewState {
        let mut state = ViewState::new(false, Mode::Brief);
        let g = state.begin_fetch(QueryDescriptor::search("x", Mode::Brief).unwrap());
        state.apply(event(g, FetchUpdate::Headlines((0..count).map(headline).collect())));
        state.apply(event(g, FetchUpdate::Summary(summary())));
        state.apply(event(g, FetchUpdate::Finished));
        state
    }

    #[test]
    fn beginning_a_fetch_clears_previous_results() {
        let mut state = populated(3);
        state.select_next();
        state.error = Some("old".into());
        state.begin_fetch(QueryDescriptor::search("y", Mode::Brief).unwrap());
        assert!(state.loading);
        assert!(state.summary.is_none());
        assert!(state.headlines.is_empty());
        assert_eq!(state.selected, 0);
        assert!(state.error.is_none());
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut state = populated(3);
        for _ in 0..10 {
            state.select_next();
        }
        assert_eq!(state.selected, 2);
        for _ in 0..10 {
            state.select_previous();
        }
        assert_eq!(state.selected, 0);
        state.select_next();
        assert_eq!(state.selected_headline().map(|h| h.title.as_str()), Some("h1"));
    }

    #[test]
    fn selection_is_zero_without_headlines() {
        let mut state = ViewState::new(false, Mode::Brief);
        state.select_next();
        state.select_next();
        state.select_previous();
        state.select_next();
        assert_eq!(state.selected, 0);
        assert!(state.selected_headline().is_none());
    }

    #[test]
    fn stale_events_are_dropped() {
        let mut state = ViewState::new(false, Mode::Brief);
        let first = state.begin_fetch(QueryDescriptor::search("slow", Mode::Brief).unwrap());
        let second = state.begin_fetch(QueryDescriptor::search("fast", Mode::Brief).unwrap());
        state.apply(event(second, FetchUpdate::Headlines(vec![headline(9)])));
        state.apply(event(first, FetchUpdate::Headlines(vec![headline(1), headline(2)])));
        state.apply(event(first, FetchUpdate::Finished));
        assert_eq!(state.headlines, vec![headline(9)]);
        assert!(state.loading);
        state.apply(event(second, FetchUpdate::Finished));
        assert!(!state.loading);
    }

    #[test]
    fn failure_clears_loading_and_keeps_message() {
        let mut state = ViewState::new(false, Mode::Brief);
        let g = state.begin_fetch(QueryDescriptor::digest(Mode::Brief));
        state.apply(event(g, FetchUpdate::Headlines(vec![headline(0)])));
        state.apply(event(g, FetchUpdate::Failed(FetchError::MalformedSummary("bad".into()))));
        state.apply(event(g, FetchUpdate::Finished));
        assert!(!state.loading);
        assert_eq!(state.headlines.len(), 1);
        assert!(state.summary.is_none());
        assert!(state.error.as_deref().unwrap_or_default().contains("bad"));
    }

    #[test]
    fn mode_change_refetches_current_descriptor() {
        let mut state = populated(2);
        let next = state.set_mode(Mode::Why).expect("refetch");
        assert_eq!(next.target, QueryTarget::Search("x".into()));
        assert_eq!(next.mode, Mode::Why);
        assert!(state.set_mode(Mode::Why).is_none());
    }

    #[test]
    fn mode_change_without_history_only_switches() {
        let mut state = ViewState::new(false, Mode::Brief);
        assert!(state.set_mode(Mode::Why).is_none());
        assert_eq!(state.mode, Mode::Why);
    }

    #[test]
    fn escape_clears_query_and_focus() {
        let mut state = ViewState::new(true, Mode::Brief);
        state.focus_search();
        state.query.push_str("half typed");
        state.clear_search();
        assert!(state.query.is_empty());
        assert_eq!(state.input_focus, InputFocus::Normal);
    }
}
