use anyhow::{Context, Result};
use arboard::Clipboard;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::path::PathBuf;

/// Opens a headline in the system browser.
pub fn open_link(url: &str) -> Result<()> {
    webbrowser::open(url).with_context(|| format!("could not open {url}"))
}

pub fn copy_to_clipboard(text: String) -> Result<()> {
    let mut clipboard = Clipboard::new().context("clipboard unavailable")?;
    clipboard.set_text(text).context("could not copy to clipboard")?;
    Ok(())
}

/// Expands `~` and environment variables in a user supplied path.
pub fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::full(raw).map(|s| s.into_owned()).unwrap_or_else(|_| raw.to_string()))
}

/// Centers a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r)[1];
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical)[1]
}
