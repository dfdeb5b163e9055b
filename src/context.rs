//! Plain-text outline of a mind map, used as the context handed to the
//! suggestion service.

use crate::model::{NodeId, TreeNode};
use crate::tree::Tree;

pub const INSERTION_MARKER: &str = "[New nodes will be added here]";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const GAP: &str = "    ";

/// Renders the whole tree as a box-drawing outline, with a marker line
/// right under `target`, ahead of its existing children.
pub fn mind_map_context(tree: &Tree, target: &NodeId) -> String {
    let mut out = String::new();
    write_node(tree, tree.root(), target, "", None, &mut out);
    out.trim_end().to_string()
}

fn write_node(
    tree: &Tree,
    node: &TreeNode,
    target: &NodeId,
    indent: &str,
    is_last: Option<bool>,
    out: &mut String,
) {
    let child_indent = match is_last {
        None => {
            out.push_str(&node.text());
            String::new()
        }
        Some(last) => {
            out.push_str(indent);
            out.push_str(if last { LAST_BRANCH } else { BRANCH });
            out.push_str(&node.text());
            format!("{indent}{}", if last { GAP } else { PIPE })
        }
    };
    out.push('\n');

    let children = tree.children(&node.id);
    if node.id == *target {
        out.push_str(&child_indent);
        out.push_str(if children.is_empty() { LAST_BRANCH } else { BRANCH });
        out.push_str(INSERTION_MARKER);
        out.push('\n');
    }

    let total = children.len();
    for (index, child) in children.into_iter().enumerate() {
        write_node(tree, child, target, &child_indent, Some(index + 1 == total), out);
    }
}
