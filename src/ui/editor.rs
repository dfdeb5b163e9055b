use crate::app::AppState;
use crate::ui::text::with_cursor;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Centred popup holding the raw-HTML editor.
pub struct EditorRenderer;

impl EditorRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let Some(buffer) = &app.modal_edit else {
            return;
        };

        let popup = Self::popup_area(area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Edit HTML ")
            .title_bottom(" ⏎ save · Esc close ");
        let paragraph = Paragraph::new(with_cursor(buffer))
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }

    fn popup_area(area: Rect) -> Rect {
        let [row] = Layout::vertical([Constraint::Percentage(40)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::horizontal([Constraint::Percentage(70)])
            .flex(Flex::Center)
            .areas(row);
        popup
    }
}
