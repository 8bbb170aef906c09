//! Branch pane rendering
//!
//! Lists the nodes of the branch on display (or the one waiting to be
//! retried) with their category, their original text and, when rendered,
//! the value that replaced them.

use super::utils::{clamp_scroll, pane_block, truncate};
use crate::stepper::Rendering;
use crate::tree::branches::Branch;
use crate::tree::Tree;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

#[derive(Debug, Default)]
pub struct BranchScrollState {
    pub offset: usize,
}

/// Data needed to render the branch pane
pub struct BranchRenderData<'a> {
    pub tree: &'a Tree,
    pub current: Option<(&'a Branch, &'a Rendering)>,
    pub retry: Option<&'a Branch>,
}

pub fn render_branch_pane(
    frame: &mut Frame,
    area: Rect,
    data: BranchRenderData,
    is_focused: bool,
    scroll_state: &mut BranchScrollState,
) {
    let block = pane_block(" Branch ", is_focused);
    let width = area.width.saturating_sub(2) as usize;
    let mut all_items: Vec<ListItem> = Vec::new();

    if let Some(retry) = data.retry {
        all_items.push(ListItem::new(Line::from(Span::styled(
            "retrying:",
            Style::default()
                .fg(DEFAULT_THEME.retry)
                .add_modifier(Modifier::BOLD),
        ))));
        for id in retry.iter() {
            all_items.push(node_item(data.tree, id, None, width));
        }
    } else if let Some((branch, rendering)) = data.current {
        for id in branch.iter() {
            let value = rendering
                .substitutions
                .iter()
                .find(|s| s.node == id)
                .map(|s| s.rendered.text(&rendering.text));
            all_items.push(node_item(data.tree, id, value, width));
        }
    }

    if all_items.is_empty() {
        all_items.push(ListItem::new("(none)").style(Style::default().fg(DEFAULT_THEME.muted)));
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(&mut scroll_state.offset, all_items.len(), visible_height);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}

fn node_item<'a>(
    tree: &Tree,
    id: crate::tree::NodeId,
    value: Option<&str>,
    width: usize,
) -> ListItem<'a> {
    let node = tree.node(id);
    let label = format!("{:>5} {:<10} ", id.to_string(), node.kind.to_string());

    let mut spans = vec![Span::styled(
        label.clone(),
        Style::default().fg(DEFAULT_THEME.muted),
    )];
    let room = width.saturating_sub(label.chars().count());

    match value {
        Some(value) => {
            let value_room = room / 2;
            spans.push(Span::styled(
                truncate(tree.text(id), room.saturating_sub(value_room + 3)),
                Style::default().fg(DEFAULT_THEME.text),
            ));
            spans.push(Span::styled(" → ", Style::default().fg(DEFAULT_THEME.muted)));
            spans.push(Span::styled(
                truncate(value, value_room),
                Style::default().fg(DEFAULT_THEME.resolved),
            ));
        }
        None => spans.push(Span::styled(
            truncate(tree.text(id), room),
            Style::default().fg(DEFAULT_THEME.text),
        )),
    }

    ListItem::new(Line::from(spans))
}
