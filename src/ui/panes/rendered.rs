//! Rendering pane: the source with the current branch's values spliced in

use super::utils::{clamp_scroll, highlight_marked, pane_block, wrapped_rows};
use crate::parser::ast::Span as SourceSpan;
use crate::stepper::Rendering;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Default)]
pub struct RenderedScrollState {
    pub offset: usize,
}

pub fn render_rendered_pane(
    frame: &mut Frame,
    area: Rect,
    rendering: Option<&Rendering>,
    step: usize,
    is_focused: bool,
    scroll_state: &mut RenderedScrollState,
) {
    let title = match rendering {
        Some(_) => format!(" Step {} ", step.saturating_sub(1)),
        None => " Rendering ".to_string(),
    };
    let block = pane_block(&title, is_focused);

    let Some(rendering) = rendering else {
        let paragraph = Paragraph::new("(press → to take the first step)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.muted));
        frame.render_widget(paragraph, area);
        return;
    };

    let marks: Vec<SourceSpan> = rendering.substitutions.iter().map(|s| s.rendered).collect();
    let mark_style = Style::default()
        .bg(DEFAULT_THEME.substituted_bg)
        .add_modifier(Modifier::BOLD);
    let lines = highlight_marked(&rendering.text, &marks, mark_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let rows = wrapped_rows(&lines, area.width.saturating_sub(2) as usize);
    clamp_scroll(&mut scroll_state.offset, rows, visible_height);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll_state.offset as u16, 0));
    frame.render_widget(paragraph, area);
}
