use crate::app::AppState;
use crate::model::{NodeId, TreeNode};
use crate::tree::Tree;
use crate::ui::text::{truncate, visible_field};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

const BRANCH: &str = "├─ ";
const LAST_BRANCH: &str = "└─ ";
const PIPE: &str = "│  ";
const GAP: &str = "   ";
const EMPTY_NODE: &str = "(empty)";

/// One visible line of the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineRow {
    pub id: NodeId,
    pub prefix: String,
    pub text: String,
}

/// Flattens the tree into rows with box-drawing prefixes, pre-order.
pub fn outline_rows(tree: &Tree) -> Vec<OutlineRow> {
    let mut rows = Vec::with_capacity(tree.node_count());
    collect_rows(tree, tree.root(), String::new(), String::new(), &mut rows);
    rows
}

fn collect_rows(
    tree: &Tree,
    node: &TreeNode,
    prefix: String,
    child_indent: String,
    rows: &mut Vec<OutlineRow>,
) {
    rows.push(OutlineRow {
        id: node.id.clone(),
        prefix,
        text: node.text(),
    });

    let children = tree.children(&node.id);
    let last = children.len().saturating_sub(1);
    for (index, child) in children.into_iter().enumerate() {
        let (branch, indent) = if index == last {
            (LAST_BRANCH, GAP)
        } else {
            (BRANCH, PIPE)
        };
        collect_rows(
            tree,
            child,
            format!("{child_indent}{branch}"),
            format!("{child_indent}{indent}"),
            rows,
        );
    }
}

pub struct OutlineRenderer;

impl OutlineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let rows = outline_rows(app.tree());
        let selected = app.selected_id();
        let selected_index = rows
            .iter()
            .position(|row| Some(&row.id) == selected)
            .unwrap_or(0);

        let height = area.height as usize;
        let offset = (selected_index + 1).saturating_sub(height);

        let lines: Vec<Line> = rows
            .iter()
            .skip(offset)
            .take(height)
            .map(|row| Self::render_row(app, row, area.width as usize))
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_row<'a>(app: &AppState, row: &'a OutlineRow, width: usize) -> Line<'a> {
        let available = width.saturating_sub(row.prefix.width());
        let prefix = Span::styled(row.prefix.as_str(), Style::default().fg(Color::DarkGray));

        if let Some(buffer) = app.inline_edit.as_ref().filter(|b| b.target == row.id) {
            let style = Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
            return Line::from(vec![
                prefix,
                Span::styled(visible_field(buffer, available), style),
            ]);
        }

        let is_placeholder = app
            .generation
            .as_ref()
            .is_some_and(|pending| pending.placeholder == row.id);
        let is_selected = app.selected_id() == Some(&row.id);

        let (text, mut style) = if row.text.is_empty() {
            (EMPTY_NODE, Style::default().fg(Color::DarkGray))
        } else {
            (row.text.as_str(), Style::default())
        };
        if is_placeholder {
            style = style.fg(Color::Magenta).add_modifier(Modifier::ITALIC);
        }
        if is_selected {
            style = style
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD);
        }

        Line::from(vec![prefix, Span::styled(truncate(text, available), style)])
    }
}
