use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub root_bg: Color,
    pub focus_border: Color,
    pub blurred_border: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub selection_bg: Color,
    pub selection_fg: Color,
    pub skeleton: Color,

    // Specific components
    pub title: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub point_title: Style,
    pub headline_link: Style,
    pub mode_active: Style,
    pub mode_inactive: Style,
    pub error: Style,
    pub placeholder: Style,
    pub footer: Style,
}

impl Theme {
    pub fn for_mode(dark: bool) -> Self {
        if dark { Self::dark() } else { Self::light() }
    }

    pub fn dark() -> Self {
        Self {
            root_bg: Color::Rgb(17, 24, 39),
            focus_border: Color::Rgb(96, 165, 250),
            blurred_border: Color::DarkGray,
            text: Color::Rgb(243, 244, 246),
            text_secondary: Color::Rgb(156, 163, 175),
            selection_bg: Color::Rgb(31, 41, 55),
            selection_fg: Color::Rgb(147, 197, 253),
            skeleton: Color::Rgb(55, 65, 81),

            title: Style::default().fg(Color::Rgb(243, 244, 246)).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::White).bg(Color::Rgb(37, 99, 235)).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Rgb(209, 213, 219)),
            point_title: Style::default().fg(Color::Rgb(243, 244, 246)).add_modifier(Modifier::BOLD),
            headline_link: Style::default().fg(Color::Rgb(191, 219, 254)),
            mode_active: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            mode_inactive: Style::default().fg(Color::Gray),
            error: Style::default().fg(Color::Rgb(248, 113, 113)).add_modifier(Modifier::BOLD),
            placeholder: Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        }
    }

    pub fn light() -> Self {
        Self {
            root_bg: Color::Rgb(243, 244, 246),
            focus_border: Color::Rgb(37, 99, 235),
            blurred_border: Color::Gray,
            text: Color::Rgb(17, 24, 39),
            text_secondary: Color::Rgb(75, 85, 99),
            selection_bg: Color::Rgb(219, 234, 254),
            selection_fg: Color::Rgb(30, 64, 175),
            skeleton: Color::Rgb(209, 213, 219),

            title: Style::default().fg(Color::Rgb(17, 24, 39)).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::White).bg(Color::Rgb(37, 99, 235)).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Rgb(55, 65, 81)),
            point_title: Style::default().fg(Color::Rgb(17, 24, 39)).add_modifier(Modifier::BOLD),
            headline_link: Style::default().fg(Color::Rgb(29, 78, 216)),
            mode_active: Style::default().fg(Color::Rgb(17, 24, 39)).add_modifier(Modifier::BOLD),
            mode_inactive: Style::default().fg(Color::Rgb(107, 114, 128)),
            error: Style::default().fg(Color::Rgb(185, 28, 28)).add_modifier(Modifier::BOLD),
            placeholder: Style::default().fg(Color::Rgb(156, 163, 175)).add_modifier(Modifier::ITALIC),
            footer: Style::default().fg(Color::Rgb(75, 85, 99)).add_modifier(Modifier::DIM),
        }
    }

    /// Glyph for the theme toggle: offers the opposite scheme.
    pub fn toggle_glyph(dark: bool) -> &'static str {
        if dark { "☀ light" } else { "☾ dark" }
    }
}
