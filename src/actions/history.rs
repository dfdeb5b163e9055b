use crate::app::AppState;

fn history_locked(app: &mut AppState) -> bool {
    if app.mind_map.is_editing() || app.mind_map.is_generating() {
        app.set_message("Finish the current edit or generation first");
        return true;
    }
    false
}

pub fn undo(app: &mut AppState) {
    if history_locked(app) {
        return;
    }
    if app.service.undo() {
        keep_selection_valid(app);
        app.set_message("Undone");
    } else {
        app.set_message("Nothing to undo");
    }
}

pub fn redo(app: &mut AppState) {
    if history_locked(app) {
        return;
    }
    if app.service.redo() {
        keep_selection_valid(app);
        app.set_message("Redone");
    } else {
        app.set_message("Nothing to redo");
    }
}

fn keep_selection_valid(app: &mut AppState) {
    if app.selected_node().is_none() {
        let root = app.tree().root_id().clone();
        app.select(root);
    }
}
