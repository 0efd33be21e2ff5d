use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    layout::{Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Span, Line},
};
use crate::models::{Category, DIGEST_LABEL, InputFocus, Mode, Summary};
use crate::state::ViewState;
use crate::theme::Theme;
use crate::utils::centered_rect;

const PLACEHOLDER: &str = "Find coverage (press / to focus)";

/// Draws the whole screen from the view state.
pub fn render(f: &mut Frame, state: &ViewState, categories: &[Category], theme: &Theme) {
    let area = f.area();
    f.render_widget(Block::default().style(Style::default().bg(theme.root_bg).fg(theme.text)), area);

    let error_height = if state.error.is_some() { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),            // header
            Constraint::Length(1),            // categories
            Constraint::Length(3),            // search
            Constraint::Length(1),            // mode toggle
            Constraint::Length(error_height), // inline error
            Constraint::Min(3),               // body
            Constraint::Length(3),            // footer
        ])
        .split(area);

    render_header(f, chunks[0], state, theme);
    render_categories(f, chunks[1], state, categories, theme);
    render_search(f, chunks[2], state, theme);
    render_mode_toggle(f, chunks[3], state.mode, theme);
    if let Some(error) = &state.error {
        let line = Line::from(vec![
            Span::styled(format!("⚠ {error}"), theme.error),
            Span::styled("  (Esc to dismiss)", theme.footer),
        ]);
        f.render_widget(Paragraph::new(line), chunks[4]);
    }
    render_body(f, chunks[5], state, theme);
    render_footer(f, chunks[6], state, theme);
}

fn render_header(f: &mut Frame, area: Rect, state: &ViewState, theme: &Theme) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(24)])
        .split(area);
    let title = Paragraph::new(vec![
        Line::from(Span::styled("AI News Digest", theme.title)),
        Line::from(Span::styled(
            "Editorial briefings from today's headlines",
            Style::default().fg(theme.text_secondary),
        )),
    ]);
    f.render_widget(title, halves[0]);

    let mut right = vec![Line::from(Span::styled(
        format!("t: {}", Theme::toggle_glyph(state.dark_mode)),
        Style::default().fg(theme.text_secondary),
    ))];
    if state.loading {
        right.push(Line::from(Span::styled("Loading…", Style::default().fg(theme.focus_border))));
    }
    f.render_widget(Paragraph::new(right).alignment(Alignment::Right), halves[1]);
}

fn render_categories(f: &mut Frame, area: Rect, state: &ViewState, categories: &[Category], theme: &Theme) {
    let active = state.active_category.as_deref();
    let mut spans = Vec::new();
    let tabs = categories
        .iter()
        .enumerate()
        .map(|(i, c)| (format!("{} {}", i + 1, c.label), c.label.as_str()))
        .chain(std::iter::once(("d Today's Digest".to_string(), DIGEST_LABEL)));
    for (text, label) in tabs {
        let style = if active == Some(label) { theme.tab_active } else { theme.tab_inactive };
        spans.push(Span::styled(format!(" {text} "), style));
        spans.push(Span::raw(" "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_search(f: &mut Frame, area: Rect, state: &ViewState, theme: &Theme) {
    let editing = state.input_focus == InputFocus::Editing;
    let border = if editing { theme.focus_border } else { theme.blurred_border };
    let block = Block::default()
        .title("Search")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    // one cell stays free for the cursor
    let room = usize::from(area.width.saturating_sub(3));
    let visible = visible_tail(&state.query, room);
    let content = if state.query.is_empty() && !editing {
        Line::from(Span::styled(PLACEHOLDER, theme.placeholder))
    } else {
        Line::from(Span::styled(visible, Style::default().fg(theme.text)))
    };
    f.render_widget(Paragraph::new(content).block(block), area);

    if editing {
        let typed = u16::try_from(visible.chars().count()).unwrap_or(u16::MAX);
        let max_x = area.x.saturating_add(area.width.saturating_sub(2));
        let x = area.x.saturating_add(1).saturating_add(typed).min(max_x);
        f.set_cursor_position((x, area.y.saturating_add(1)));
    }
}

/// The last `room` characters of the query, so the end being typed stays visible.
fn visible_tail(query: &str, room: usize) -> &str {
    let skip = query.chars().count().saturating_sub(room);
    match query.char_indices().nth(skip) {
        Some((start, _)) => &query[start..],
        None => "",
    }
}

fn render_mode_toggle(f: &mut Frame, area: Rect, mode: Mode, theme: &Theme) {
    let style_for = |m: Mode| if m == mode { theme.mode_active } else { theme.mode_inactive };
    let line = Line::from(vec![
        Span::styled(Mode::Brief.label(), style_for(Mode::Brief)),
        Span::styled("  |  ", theme.footer),
        Span::styled(Mode::Why.label(), style_for(Mode::Why)),
        Span::styled("   (m to switch)", theme.footer),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_body(f: &mut Frame, area: Rect, state: &ViewState, theme: &Theme) {
    let nothing_yet = state.summary.is_none() && state.headlines.is_empty();
    if state.loading && nothing_yet {
        render_skeleton(f, area, theme);
        return;
    }
    if nothing_yet {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from("Pick a category with 1-9, press d for Today's Digest, or / to search."),
        ])
        .alignment(Alignment::Center)
        .style(theme.placeholder);
        f.render_widget(hint, area);
        return;
    }

    let show_card = state.summary.is_some() || state.loading;
    let sections = if show_card && !state.headlines.is_empty() {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1)])
            .split(area)
    };

    if show_card {
        render_briefing(f, sections[0], state, theme);
    }
    if !state.headlines.is_empty() {
        render_headlines(f, sections[sections.len() - 1], state, theme);
    }
}

fn render_skeleton(f: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.blurred_border));
    let inner = block.inner(area);
    f.render_widget(block, area);
    let width = inner.width as usize;
    let bar = |len: usize| Line::from(Span::styled(" ".repeat(len), Style::default().bg(theme.skeleton)));
    let lines = vec![
        bar(width * 2 / 3),
        Line::from(""),
        bar(width),
        Line::from(""),
        bar(width * 5 / 6),
    ];
    f.render_widget(Paragraph::new(lines), inner);
}

fn briefing_lines<'a>(summary: &'a Summary, mode: Mode, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![
        Line::from(Span::styled(mode.blurb(), Style::default().fg(theme.text_secondary))),
        Line::from(""),
    ];
    for point in &summary.points {
        if !point.title.is_empty() {
            lines.push(Line::from(Span::styled(point.title.as_str(), theme.point_title)));
        }
        lines.push(Line::from(Span::styled(point.summary.as_str(), Style::default().fg(theme.text))));
        lines.push(Line::from(""));
    }
    lines
}

fn render_briefing(f: &mut Frame, area: Rect, state: &ViewState, theme: &Theme) {
    let mut block = Block::default()
        .title(Line::from(Span::styled("Today's Briefing", theme.title)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.blurred_border));

    let body = match &state.summary {
        Some(summary) => {
            let at = state.summary_at.map(|t| t.format("%H:%M").to_string()).unwrap_or_default();
            block = block.title(
                Line::from(Span::styled(
                    format!("Based on {} headlines • {}", summary.meta.sources, at),
                    Style::default().fg(theme.text_secondary),
                ))
                .right_aligned(),
            );
            Paragraph::new(briefing_lines(summary, state.mode, theme))
        }
        None => Paragraph::new(Line::from(Span::styled(
            format!("Summarizing {} headlines…", state.headlines.len()),
            theme.placeholder,
        ))),
    };
    f.render_widget(body.block(block).wrap(Wrap { trim: true }), area);
}

fn render_headlines(f: &mut Frame, area: Rect, state: &ViewState, theme: &Theme) {
    let items: Vec<ListItem> = state
        .headlines
        .iter()
        .map(|h| ListItem::new(Line::from(Span::styled(h.title.as_str(), theme.headline_link))))
        .collect();

    let mut block = Block::default()
        .title(Line::from(Span::styled("Reporting from the field", theme.title)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.focus_border));
    if let Some(selected) = state.selected_headline() {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", selected.link),
            Style::default().fg(theme.text_secondary),
        )));
    }

    let list = List::new(items)
        .block(block)
        .highlight_symbol("▶ ")
        .highlight_style(
            Style::default()
                .bg(theme.selection_bg)
                .fg(theme.selection_fg)
                .add_modifier(Modifier::BOLD),
        );
    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));
    f.render_stateful_widget(list, area, &mut list_state);
}

fn render_footer(f: &mut Frame, area: Rect, state: &ViewState, theme: &Theme) {
    let hints = match state.input_focus {
        InputFocus::Editing => "Enter Search | Esc Clear | Ctrl+C Quit",
        InputFocus::Normal => {
            "/ Search | 1-9 Category | d Digest | j/k Move | Enter Open | m Mode | r Refresh | c Copy | t Theme | q Quit"
        }
    };
    let footer = Paragraph::new(hints)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.blurred_border)))
        .style(theme.footer);
    f.render_widget(footer, area);
}

/// Short-lived notice, e.g. after copying.
pub fn render_notice(f: &mut Frame, text: &str, theme: &Theme) {
    let area = centered_rect(50, 20, f.area());
    f.render_widget(Clear, area);
    let para = Paragraph::new(text.to_string())
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.focus_border)))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(theme.root_bg).fg(theme.text));
    f.render_widget(para, area);
}
