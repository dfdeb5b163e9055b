use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub struct HelpSection {
    pub title: &'static str,
    pub items: &'static [(&'static str, &'static str)],
}

pub const SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Navigation",
        items: &[
            ("↑/↓", "Previous / next sibling"),
            ("←", "Parent"),
            ("→", "First child"),
        ],
    },
    HelpSection {
        title: "Nodes",
        items: &[
            ("⏎", "New sibling"),
            ("⇥", "New child"),
            ("⌫/Del", "Delete node and its children"),
            ("Alt+␣", "Suggest child nodes"),
        ],
    },
    HelpSection {
        title: "Editing",
        items: &[
            ("any key", "Replace text and start editing"),
            ("e", "Edit HTML in a popup"),
            ("⏎", "Save the edit"),
            ("Esc", "Discard the edit"),
        ],
    },
    HelpSection {
        title: "Map",
        items: &[
            ("^S", "Save"),
            ("^Z", "Undo"),
            ("^Y/^R", "Redo"),
            ("^Q/^C", "Quit"),
        ],
    },
];

const KEY_COLUMN: usize = 9;

/// Shortcut legend drawn over the outline.
pub struct HelpRenderer;

impl HelpRenderer {
    pub fn render(frame: &mut Frame, area: Rect) {
        let lines = Self::build_help_text();
        let popup = Self::popup_area(area, lines.len() as u16 + 2);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Shortcuts ")
            .title_bottom(" ? or Esc close ");
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }

    pub fn build_help_text() -> Vec<Line<'static>> {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let mut lines = Vec::new();

        for (index, section) in SECTIONS.iter().enumerate() {
            if index > 0 {
                lines.push(Line::from(""));
            }
            lines.push(Line::from(Span::styled(section.title, bold)));
            for (key, desc) in section.items {
                lines.push(Line::from(vec![
                    Span::styled(format!("  {key:<KEY_COLUMN$}"), Style::default().fg(Color::Cyan)),
                    Span::raw(*desc),
                ]));
            }
        }
        lines
    }

    fn popup_area(area: Rect, height: u16) -> Rect {
        let [row] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::horizontal([Constraint::Length(46)])
            .flex(Flex::Center)
            .areas(row);
        popup
    }
}
