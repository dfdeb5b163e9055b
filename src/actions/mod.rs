pub mod editing;
pub mod file;
pub mod generate;
pub mod help;
pub mod history;
pub mod movement;
pub mod node;

use crate::ai::GenerationRequest;
use crate::app::AppState;
use crate::event::Intent;

/// Runs the handler for one classified key. Returns a suggestion request
/// when the intent started an AI generation.
pub fn execute_intent(intent: Intent, app: &mut AppState) -> Option<GenerationRequest> {
    match intent {
        // Text field
        Intent::Commit => editing::confirm_edit(app),
        Intent::Cancel => editing::cancel_edit(app),
        Intent::StartInlineEdit(c) => editing::start_inline_edit(app, c),
        Intent::OpenEditor => editing::open_editor(app),

        // Structure
        Intent::DeleteNode => node::delete_node(app),
        Intent::CreateSibling => node::insert_sibling(app),
        Intent::CreateChild => node::insert_child(app),

        // Movement
        Intent::Navigate(direction) => movement::navigate(app, direction),

        // AI
        Intent::GenerateNodes => return generate::start_generation(app),
    }
    None
}

/// Ends the session's transient state: open text fields are discarded and a
/// pending generation is cancelled with its placeholder removed.
pub fn teardown(app: &mut AppState) {
    if app.inline_edit.is_some() {
        editing::cancel_edit(app);
    }
    if app.mind_map.editor_modal_open() {
        editing::close_editor(app);
    }
    generate::cancel_generation(app);
}
