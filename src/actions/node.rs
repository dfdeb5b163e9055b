use crate::app::AppState;
use crate::model::NodeId;
use crate::tree::Tree;
use tracing::debug;

/// Selected node for a structural command; none while a text field is open
/// or when the selection no longer resolves.
fn structural_target(app: &AppState) -> Option<NodeId> {
    if app.mind_map.is_editing() {
        return None;
    }
    app.selected_node().map(|node| node.id.clone())
}

pub fn insert_sibling(app: &mut AppState) {
    let Some(active) = structural_target(app) else {
        return;
    };
    // The root has no parent, so its "sibling" becomes a child.
    let parent = app.service.get_parent_node(&active).id.clone();
    if let Some(new_id) = app.service.insert_node(&parent, "") {
        app.select(new_id);
    }
}

pub fn insert_child(app: &mut AppState) {
    let Some(active) = structural_target(app) else {
        return;
    };
    if let Some(new_id) = app.service.insert_node(&active, "") {
        app.select(new_id);
    }
}

pub fn delete_node(app: &mut AppState) {
    let Some(active) = structural_target(app) else {
        return;
    };
    if active == *app.tree().root_id() {
        app.set_message("Cannot delete root node");
        return;
    }

    let next = selection_after_delete(app.tree(), &active);
    app.service.delete_node(&active);
    debug!(deleted = %active, selected = %next, "node deleted");
    app.select(next);
}

/// Node to select once `id` is deleted: the parent when `id` is an only
/// child, the next sibling when it is first, the previous sibling
/// otherwise. Falls back to the root.
pub fn selection_after_delete(tree: &Tree, id: &NodeId) -> NodeId {
    let root = tree.root_id().clone();
    let Some(index) = tree.index_of(id) else {
        return root;
    };

    let parent = tree.parent_of(id);
    let siblings = tree.child_ids(&parent.id);
    if siblings.len() == 1 {
        return parent.id.clone();
    }

    let neighbour = if index == 0 {
        siblings.get(1)
    } else {
        siblings.get(index - 1)
    };
    neighbour.cloned().unwrap_or(root)
}
