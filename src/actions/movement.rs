use crate::app::AppState;
use crate::event::Direction;
use crate::model::NodeId;
use crate::tree::Tree;

/// Moves the selection. Up and down step between siblings and stop at the
/// ends, left goes to the parent, right to the first child.
pub fn navigate(app: &mut AppState, direction: Direction) {
    let Some(active) = app.selected_node().map(|node| node.id.clone()) else {
        return;
    };

    let tree = app.tree();
    let target = match direction {
        Direction::Up => sibling(tree, &active, false),
        Direction::Down => sibling(tree, &active, true),
        Direction::Left => Some(tree.parent_of(&active).id.clone()),
        Direction::Right => tree.child_ids(&active).into_iter().next(),
    };

    if let Some(target) = target.filter(|target| *target != active) {
        app.select(target);
    }
}

fn sibling(tree: &Tree, id: &NodeId, forward: bool) -> Option<NodeId> {
    let index = tree.index_of(id)?;
    let siblings = tree.child_ids(&tree.parent_of(id).id);
    let next = if forward {
        index + 1
    } else {
        index.checked_sub(1)?
    };
    siblings.get(next).cloned()
}
