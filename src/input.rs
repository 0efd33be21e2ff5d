use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::models::{Category, DIGEST_LABEL, InputFocus, Mode, QueryDescriptor};
use crate::state::ViewState;

/// Side effects the event loop carries out after a key press.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    None,
    Quit,
    Fetch(QueryDescriptor),
    OpenLink(String),
    SaveTheme(bool),
    CopySummary,
}

pub fn handle_key(key: KeyEvent, state: &mut ViewState, categories: &[Category]) -> Command {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Command::Quit;
    }
    match state.input_focus {
        InputFocus::Editing => handle_editing(key, state),
        InputFocus::Normal => handle_normal(key, state, categories),
    }
}

// Only Esc, Enter and Backspace are special while typing; every other
// character, `j`, `k` and `/` included, goes into the field.
fn handle_editing(key: KeyEvent, state: &mut ViewState) -> Command {
    match key.code {
        KeyCode::Esc => state.clear_search(),
        KeyCode::Enter => return submit_search(state),
        KeyCode::Backspace => {
            state.query.pop();
        }
        KeyCode::Char(c) if typed(key.modifiers) => state.query.push(c),
        _ => {}
    }
    Command::None
}

// Alt and Ctrl chords are not text.
fn typed(modifiers: KeyModifiers) -> bool {
    modifiers.difference(KeyModifiers::SHIFT).is_empty()
}

fn submit_search(state: &mut ViewState) -> Command {
    match QueryDescriptor::search(&state.query, state.mode) {
        Ok(descriptor) => {
            state.active_category = None;
            state.input_focus = InputFocus::Normal;
            Command::Fetch(descriptor)
        }
        Err(e) => {
            debug!(error = %e, "ignoring search");
            Command::None
        }
    }
}

fn handle_normal(key: KeyEvent, state: &mut ViewState, categories: &[Category]) -> Command {
    match key.code {
        KeyCode::Char('/') => state.focus_search(),
        KeyCode::Esc => state.clear_search(),
        KeyCode::Char('j') | KeyCode::Down => state.select_next(),
        KeyCode::Char('k') | KeyCode::Up => state.select_previous(),
        KeyCode::Enter => {
            if let Some(headline) = state.selected_headline() {
                return Command::OpenLink(headline.link.clone());
            }
        }
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            if let Some(category) = categories.get(index) {
                state.active_category = Some(category.label.clone());
                match QueryDescriptor::search(&category.query, state.mode) {
                    Ok(descriptor) => return Command::Fetch(descriptor),
                    Err(e) => debug!(error = %e, label = %category.label, "category has no query"),
                }
            }
        }
        KeyCode::Char('d') => {
            state.active_category = Some(DIGEST_LABEL.to_string());
            return Command::Fetch(QueryDescriptor::digest(state.mode));
        }
        KeyCode::Char('m') => {
            let mode = state.mode.toggled();
            return refetch_for_mode(state, mode);
        }
        KeyCode::Char('b') => return refetch_for_mode(state, Mode::Brief),
        KeyCode::Char('w') => return refetch_for_mode(state, Mode::Why),
        KeyCode::Char('r') => {
            if let Some(current) = state.current.clone() {
                return Command::Fetch(current);
            }
        }
        KeyCode::Char('t') => return Command::SaveTheme(state.toggle_dark_mode()),
        KeyCode::Char('c') => {
            if state.summary.is_some() {
                return Command::CopySummary;
            }
        }
        KeyCode::Char('q') => return Command::Quit,
        _ => {}
    }
    Command::None
}

fn refetch_for_mode(state: &mut ViewState, mode: Mode) -> Command {
    match state.set_mode(mode) {
        Some(descriptor) => Command::Fetch(descriptor),
        None => Command::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchEvent, FetchUpdate};
    use crate::models::{Headline, QueryTarget};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn categories() -> Vec<Category> {
        vec![
            Category { label: "India".into(), query: "India".into() },
            Category { label: "Tech".into(), query: "Technology".into() },
        ]
    }

    fn type_text(state: &mut ViewState, text: &str) {
        for c in text.chars() {
            handle_key(press(KeyCode::Char(c)), state, &categories());
        }
    }

    fn with_headlines(count: usize) -> ViewState {
        let mut state = ViewState::new(false, Mode::Brief);
        let g = state.begin_fetch(QueryDescriptor::search("x", Mode::Brief).unwrap());
        let headlines = (0..count)
            .map(|i| Headline { title: format!("t{i}"), link: format!("https://l/{i}") })
            .collect();
        state.apply(FetchEvent { generation: g, update: FetchUpdate::Headlines(headlines) });
        state
    }

    #[test]
    fn slash_focuses_and_enter_submits_search() {
        let mut state = ViewState::new(false, Mode::Brief);
        state.active_category = Some("India".into());
        assert_eq!(handle_key(press(KeyCode::Char('/')), &mut state, &categories()), Command::None);
        assert_eq!(state.input_focus, InputFocus::Editing);
        type_text(&mut state, "Technology");
        let cmd = handle_key(press(KeyCode::Enter), &mut state, &categories());
        assert_eq!(cmd, Command::Fetch(QueryDescriptor::search("Technology", Mode::Brief).unwrap()));
        assert_eq!(state.input_focus, InputFocus::Normal);
        assert!(state.active_category.is_none());
    }

    #[test]
    fn blank_search_is_a_no_op() {
        let mut state = ViewState::new(false, Mode::Brief);
        state.focus_search();
        type_text(&mut state, "   ");
        assert_eq!(handle_key(press(KeyCode::Enter), &mut state, &categories()), Command::None);
        assert!(!state.loading);
    }

    #[test]
    fn typing_vim_keys_does_not_move_selection() {
        let mut state = with_headlines(3);
        state.focus_search();
        type_text(&mut state, "jjk/");
        assert_eq!(state.query, "jjk/");
        assert_eq!(state.selected, 0);
        handle_key(press(KeyCode::Backspace), &mut state, &categories());
        assert_eq!(state.query, "jjk");
    }

    #[test]
    fn j_and_k_navigate_in_normal_focus() {
        let mut state = with_headlines(2);
        for _ in 0..5 {
            handle_key(press(KeyCode::Char('j')), &mut state, &categories());
        }
        assert_eq!(state.selected, 1);
        handle_key(press(KeyCode::Char('k')), &mut state, &categories());
        handle_key(press(KeyCode::Char('k')), &mut state, &categories());
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn enter_opens_selected_link() {
        let mut state = with_headlines(3);
        handle_key(press(KeyCode::Char('j')), &mut state, &categories());
        assert_eq!(
            handle_key(press(KeyCode::Enter), &mut state, &categories()),
            Command::OpenLink("https://l/1".into())
        );
        let mut empty = ViewState::new(false, Mode::Brief);
        assert_eq!(handle_key(press(KeyCode::Enter), &mut empty, &categories()), Command::None);
    }

    #[test]
    fn escape_clears_and_blurs() {
        let mut state = ViewState::new(false, Mode::Brief);
        state.focus_search();
        type_text(&mut state, "abc");
        handle_key(press(KeyCode::Esc), &mut state, &categories());
        assert!(state.query.is_empty());
        assert_eq!(state.input_focus, InputFocus::Normal);
    }

    #[test]
    fn category_digit_fetches_its_query() {
        let mut state = ViewState::new(false, Mode::Why);
        let cmd = handle_key(press(KeyCode::Char('2')), &mut state, &categories());
        assert_eq!(cmd, Command::Fetch(QueryDescriptor::search("Technology", Mode::Why).unwrap()));
        assert_eq!(state.active_category.as_deref(), Some("Tech"));
        assert_eq!(handle_key(press(KeyCode::Char('9')), &mut state, &categories()), Command::None);
    }

    #[test]
    fn digest_key_marks_digest_category() {
        let mut state = ViewState::new(false, Mode::Brief);
        let cmd = handle_key(press(KeyCode::Char('d')), &mut state, &categories());
        assert_eq!(cmd, Command::Fetch(QueryDescriptor::digest(Mode::Brief)));
        assert_eq!(state.active_category.as_deref(), Some(DIGEST_LABEL));
    }

    #[test]
    fn mode_toggle_reruns_last_query() {
        let mut state = with_headlines(1);
        let cmd = handle_key(press(KeyCode::Char('m')), &mut state, &categories());
        match cmd {
            Command::Fetch(d) => {
                assert_eq!(d.target, QueryTarget::Search("x".into()));
                assert_eq!(d.mode, Mode::Why);
            }
            other => panic!("expected fetch, got {other:?}"),
        }
        assert_eq!(handle_key(press(KeyCode::Char('w')), &mut state, &categories()), Command::None);
    }

    #[test]
    fn digest_mode_toggle_reruns_digest() {
        let mut state = ViewState::new(false, Mode::Brief);
        state.begin_fetch(QueryDescriptor::digest(Mode::Brief));
        assert_eq!(
            handle_key(press(KeyCode::Char('w')), &mut state, &categories()),
            Command::Fetch(QueryDescriptor::digest(Mode::Why))
        );
    }

    #[test]
    fn theme_toggle_asks_for_save() {
        let mut state = ViewState::new(false, Mode::Brief);
        assert_eq!(handle_key(press(KeyCode::Char('t')), &mut state, &categories()), Command::SaveTheme(true));
        assert!(state.dark_mode);
    }

    #[test]
    fn ctrl_c_quits_even_while_typing() {
        let mut state = ViewState::new(false, Mode::Brief);
        state.focus_search();
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(key, &mut state, &categories()), Command::Quit);
    }

    #[test]
    fn modifier_chords_are_not_typed() {
        let mut state = ViewState::new(false, Mode::Brief);
        state.focus_search();
        handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::ALT), &mut state, &categories());
        handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL), &mut state, &categories());
        assert!(state.query.is_empty());
        handle_key(KeyEvent::new(KeyCode::Char('N'), KeyModifiers::SHIFT), &mut state, &categories());
        assert_eq!(state.query, "N");
    }
}
