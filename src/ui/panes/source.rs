//! Source pane rendering
//!
//! Shows the original program with light syntax highlighting. The nodes of
//! the branch currently on display are shaded so the reader can see which
//! parts of the original the rendering below replaced.

use super::utils::{clamp_scroll, highlight_marked, pane_block, wrapped_rows};
use crate::parser::ast::Span as SourceSpan;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
}

/// Data needed to render the source pane
pub struct SourceRenderData<'a> {
    pub source: &'a str,
    /// Original spans of the branch on display
    pub marks: &'a [SourceSpan],
    /// Original spans of a branch waiting to be retried
    pub failed: &'a [SourceSpan],
}

pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    data: SourceRenderData,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let block = pane_block(" Source ", is_focused);

    let (marks, mark_style) = if data.failed.is_empty() {
        (data.marks, Style::default().bg(DEFAULT_THEME.substituted_bg))
    } else {
        (data.failed, Style::default().fg(DEFAULT_THEME.error))
    };
    let lines = highlight_marked(data.source, marks, mark_style);

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let rows = wrapped_rows(&lines, area.width.saturating_sub(2) as usize);
    clamp_scroll(&mut scroll_state.offset, rows, visible_height);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll_state.offset as u16, 0));
    frame.render_widget(paragraph, area);
}
