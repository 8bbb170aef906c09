//! Shared helpers for pane rendering
//!
//! - **Highlighting**: a light per-character classifier for JavaScript
//!   source, enough to tell brackets, literals and names apart in JSFuck
//! - **Marks**: overlaying a style on byte ranges (the substituted spans)
//! - **Borders**: the focused/unfocused block style every pane shares
//!
//! All functions in this module are `pub(super)`, making them accessible
//! only within the panes module.

use crate::parser::ast::Span as SourceSpan;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders},
};

/// Bordered block titled `title`, highlighted when focused
pub(super) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Highlight `text` and patch `mark_style` over every byte range in `marks`
pub(super) fn highlight_marked(
    text: &str,
    marks: &[SourceSpan],
    mark_style: Style,
) -> Vec<Line<'static>> {
    let styles = classify(text);
    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut run = String::new();
    let mut run_style = Style::default();

    for ((offset, c), style) in text.char_indices().zip(styles) {
        if c == '\n' {
            flush(&mut spans, &mut run, run_style);
            lines.push(Line::from(std::mem::take(&mut spans)));
            continue;
        }

        let style = if marks.iter().any(|m| m.start <= offset && offset < m.end) {
            style.patch(mark_style)
        } else {
            style
        };

        if style != run_style {
            flush(&mut spans, &mut run, run_style);
            run_style = style;
        }
        run.push(c);
    }

    flush(&mut spans, &mut run, run_style);
    lines.push(Line::from(spans));
    lines
}

fn flush(spans: &mut Vec<Span<'static>>, run: &mut String, style: Style) {
    if !run.is_empty() {
        spans.push(Span::styled(std::mem::take(run), style));
    }
}

/// One style per character of `text`
fn classify(text: &str) -> Vec<Style> {
    let chars: Vec<char> = text.chars().collect();
    let mut styles = vec![Style::default().fg(DEFAULT_THEME.text); chars.len()];
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Strings, including an unterminated tail
        if c == '"' || c == '\'' {
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                end += if chars[end] == '\\' { 2 } else { 1 };
            }
            let end = (end + 1).min(chars.len());
            fill(&mut styles, i, end, Style::default().fg(DEFAULT_THEME.string_literal));
            i = end;
            continue;
        }

        if c.is_ascii_digit() {
            let mut end = i;
            while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '.') {
                end += 1;
            }
            fill(&mut styles, i, end, Style::default().fg(DEFAULT_THEME.number_literal));
            i = end;
            continue;
        }

        if c.is_alphabetic() || c == '_' || c == '$' {
            let mut end = i;
            while end < chars.len()
                && (chars[end].is_alphanumeric() || chars[end] == '_' || chars[end] == '$')
            {
                end += 1;
            }
            let word: String = chars[i..end].iter().collect();
            let is_call = chars.get(end) == Some(&'(');
            fill(&mut styles, i, end, word_style(&word, is_call));
            i = end;
            continue;
        }

        if matches!(c, '(' | ')' | '[' | ']' | '{' | '}') {
            styles[i] = Style::default().fg(DEFAULT_THEME.step_badge);
        }
        i += 1;
    }

    styles
}

fn fill(styles: &mut [Style], start: usize, end: usize, style: Style) {
    for slot in &mut styles[start..end] {
        *slot = style;
    }
}

fn word_style(word: &str, is_call: bool) -> Style {
    match word {
        "true" | "false" | "null" | "undefined" | "NaN" | "Infinity" | "this" => {
            Style::default().fg(DEFAULT_THEME.number_literal)
        }
        "typeof" | "void" | "return" => Style::default()
            .fg(DEFAULT_THEME.keyword_literal)
            .add_modifier(Modifier::BOLD),
        _ if is_call => Style::default().fg(DEFAULT_THEME.callee),
        _ => Style::default().fg(DEFAULT_THEME.text),
    }
}

/// Cut `text` to `width` characters, marking the cut with `…`
pub(super) fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Rows `lines` take up when wrapped to `width` columns
pub(super) fn wrapped_rows(lines: &[Line], width: usize) -> usize {
    let width = width.max(1);
    lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

/// Clamp a scroll offset so the last page stays full
pub(super) fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(line: &Line) -> Vec<String> {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_groups_tokens() {
        let lines = highlight_marked("[]['flat']", &[], Style::default());
        assert_eq!(lines.len(), 1);
        assert_eq!(texts(&lines[0]), vec!["[][", "'flat'", "]"]);
    }

    #[test]
    fn test_marks_split_runs() {
        let mark = Style::default().bg(DEFAULT_THEME.substituted_bg);
        let lines = highlight_marked("1+22", &[SourceSpan::new(2, 4)], mark);

        let spans = &lines[0].spans;
        assert_eq!(spans.last().map(|s| s.content.as_ref()), Some("22"));
        assert_eq!(spans.last().and_then(|s| s.style.bg), Some(DEFAULT_THEME.substituted_bg));
    }

    #[test]
    fn test_newlines_start_lines() {
        let lines = highlight_marked("a\nb", &[], Style::default());
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_wrapped_rows() {
        let lines = highlight_marked("abcdefg\n\nxy", &[], Style::default());
        assert_eq!(wrapped_rows(&lines, 3), 3 + 1 + 1);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
