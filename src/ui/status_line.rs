use crate::app::AppState;
use crate::ui::text::{truncate, visible_field};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

const STATUS_EDIT_PREFIX: &str = "Edit: ";
const KEY_HINTS: &str = "? help  ⏎ sibling  ⇥ child  ⌫ delete  e editor  Alt+␣ ideas  ^S save  ^Z undo  ^Q quit";

pub struct StatusLineRenderer;

impl StatusLineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let (content, style) = Self::get_content_and_style(app, area.width as usize);
        frame.render_widget(Paragraph::new(content).style(style), area);
    }

    pub fn get_content_and_style(app: &AppState, width: usize) -> (String, Style) {
        if app.mind_map.editor_modal_open() {
            return (
                truncate("Editing HTML: ⏎ save  Esc close", width),
                Self::highlight(Color::Cyan),
            );
        }

        if let Some(buffer) = &app.inline_edit {
            let field_width = width.saturating_sub(STATUS_EDIT_PREFIX.len());
            let content = format!("{STATUS_EDIT_PREFIX}{}", visible_field(buffer, field_width));
            return (content, Self::highlight(Color::Cyan));
        }

        if let Some(msg) = &app.message {
            return (truncate(msg, width), Self::highlight(Color::Magenta));
        }

        if app.mind_map.is_generating() {
            return (
                truncate("Generating ideas…", width),
                Self::highlight(Color::Blue),
            );
        }

        let name = app
            .filename
            .as_ref()
            .and_then(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string());
        let dirty = if app.is_dirty() { " [+]" } else { "" };
        let content = format!(
            "treemind | {name}{dirty} | {} nodes | {KEY_HINTS}",
            app.tree().node_count()
        );

        (
            truncate(&content, width),
            Style::default().fg(Color::Gray).bg(Color::Black),
        )
    }

    fn highlight(bg: Color) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::editing;
    use crate::config::AppConfig;
    use crate::tree::Tree;
    use std::path::PathBuf;

    fn create_test_app() -> AppState {
        let mut app = AppState::new(AppConfig::default(), Tree::default());
        app.filename = Some(PathBuf::from("/maps/ideas.json"));
        app
    }

    #[test]
    fn test_normal_status() {
        let app = create_test_app();
        let (content, _) = StatusLineRenderer::get_content_and_style(&app, 200);
        assert!(content.starts_with("treemind | ideas.json | 1 nodes"));
    }

    #[test]
    fn test_message_wins() {
        let mut app = create_test_app();
        app.set_message("Saved");
        let (content, _) = StatusLineRenderer::get_content_and_style(&app, 80);
        assert_eq!(content, "Saved");
    }

    #[test]
    fn test_edit_field_shown() {
        let mut app = create_test_app();
        editing::start_inline_edit(&mut app, 'h');
        let (content, _) = StatusLineRenderer::get_content_and_style(&app, 80);
        assert_eq!(content, "Edit: h▌");
    }
}
