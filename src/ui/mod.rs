pub mod editor;
pub mod help;
pub mod outline;
pub mod status_line;
pub mod text;


use crate::app::AppState;
use editor::EditorRenderer;
use help::HelpRenderer;
use outline::OutlineRenderer;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};
use status_line::StatusLineRenderer;

// Main render function
pub fn render(frame: &mut Frame, app: &AppState) {
    let size = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(size);

    OutlineRenderer::render(frame, app, chunks[0]);
    StatusLineRenderer::render(frame, app, chunks[1]);

    if app.mind_map.editor_modal_open() {
        EditorRenderer::render(frame, app, size);
    } else if app.show_help {
        HelpRenderer::render(frame, size);
    }
}
