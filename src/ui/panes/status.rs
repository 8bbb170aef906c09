//! Status bar: step badge, last message and key hints, or the command line
//! while `:` is open.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Data needed to render the status bar
pub struct StatusRenderData<'a> {
    pub message: &'a str,
    pub step: usize,
    pub is_error: bool,
    pub is_finished: bool,
    pub is_playing: bool,
    /// Text typed after `:`, when the command line is open
    pub command: Option<&'a str>,
}

const KEY_HINTS: &[(&str, &str)] = &[
    ("→/↵", "step"),
    ("1-9", "skip"),
    ("⎵", "play"),
    ("r", "restart"),
    (":", "command"),
    ("q", "quit"),
];

fn badge(label: &str, color: Color) -> Span<'static> {
    Span::styled(
        format!(" {} ", label),
        Style::default()
            .bg(color)
            .fg(Color::Black)
            .add_modifier(Modifier::BOLD),
    )
}

fn on_bar(text: String, fg: Color) -> Span<'static> {
    Span::styled(text, Style::default().bg(DEFAULT_THEME.bar_bg).fg(fg))
}

pub fn render_status_bar(frame: &mut Frame, area: Rect, data: StatusRenderData) {
    let bar = Style::default().bg(DEFAULT_THEME.bar_bg);

    if let Some(command) = data.command {
        let line = Line::from(vec![
            badge(":", DEFAULT_THEME.playing),
            on_bar(format!(" {}▏", command), DEFAULT_THEME.text),
        ]);
        frame.render_widget(Paragraph::new(line).style(bar), area);
        return;
    }

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (badge_color, message_color) = if data.is_error {
        (DEFAULT_THEME.error, DEFAULT_THEME.error)
    } else {
        (DEFAULT_THEME.step_badge, DEFAULT_THEME.text)
    };
    let left = Line::from(vec![
        badge(&format!("Step {}", data.step), badge_color),
        on_bar(format!(" {} ", data.message), message_color),
    ]);
    frame.render_widget(
        Paragraph::new(left).style(bar).alignment(Alignment::Left),
        halves[0],
    );

    let key_style = Style::default().bg(DEFAULT_THEME.muted).fg(Color::Black);
    let mut right: Vec<Span> = Vec::with_capacity(KEY_HINTS.len() * 3 + 2);
    for (i, (key, action)) in KEY_HINTS.iter().enumerate() {
        if i > 0 {
            right.push(on_bar("│".to_string(), DEFAULT_THEME.muted));
        }
        right.push(Span::styled(format!(" {} ", key), key_style));
        right.push(on_bar(format!(" {} ", action), DEFAULT_THEME.text));
    }

    let state = if data.is_playing {
        Some(("▶ PLAYING", DEFAULT_THEME.playing))
    } else if data.is_finished {
        Some(("END", DEFAULT_THEME.error))
    } else if data.step == 1 {
        Some(("START", DEFAULT_THEME.resolved))
    } else {
        None
    };
    if let Some((label, color)) = state {
        right.push(on_bar("│".to_string(), DEFAULT_THEME.muted));
        right.push(badge(label, color));
    }

    frame.render_widget(
        Paragraph::new(Line::from(right))
            .style(bar)
            .alignment(Alignment::Right),
        halves[1],
    );
}
