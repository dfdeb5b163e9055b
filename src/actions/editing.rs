use crate::app::{AppState, EditBuffer};
use crate::html;
use crate::state::MindMapEvent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

/// Opens the inline field on the selected node. The typed character
/// replaces the node's text.
pub fn start_inline_edit(app: &mut AppState, c: char) {
    let Some(target) = app.selected_node().map(|node| node.id.clone()) else {
        return;
    };
    if !app.mind_map.send(MindMapEvent::StartEditing) {
        return;
    }

    let mut buffer = EditBuffer::new(target, String::new());
    type_char(&mut buffer, c);
    app.inline_edit = Some(buffer);
}

/// Writes the inline field back as `<div>text</div>`, skipping the edit
/// when the content would not change.
pub fn confirm_edit(app: &mut AppState) {
    if let Some(buffer) = app.inline_edit.take() {
        let html = html::wrap_text(&buffer.text);
        let unchanged = app
            .service
            .get_node_by_id(&buffer.target)
            .map_or(true, |node| node.html() == html);
        if unchanged {
            debug!(id = %buffer.target, "inline edit left content unchanged");
        } else {
            app.service.edit_node_html(&buffer.target, html);
        }
    }
    app.mind_map.send(MindMapEvent::FinishEditing);
}

pub fn cancel_edit(app: &mut AppState) {
    app.inline_edit = None;
    app.mind_map.send(MindMapEvent::CancelEditing);
}

/// Opens the editor modal on the selected node's raw HTML.
pub fn open_editor(app: &mut AppState) {
    let Some(node) = app.selected_node() else {
        return;
    };
    let buffer = EditBuffer::new(node.id.clone(), node.html());
    app.modal_edit = Some(buffer);
    app.mind_map.set_editor_modal_open(true);
}

pub fn save_editor(app: &mut AppState) {
    if let Some(buffer) = app.modal_edit.take() {
        let changed = app
            .service
            .get_node_by_id(&buffer.target)
            .is_some_and(|node| node.html() != buffer.text);
        if changed {
            app.service.edit_node_html(&buffer.target, buffer.text);
        }
    }
    app.mind_map.set_editor_modal_open(false);
}

pub fn close_editor(app: &mut AppState) {
    app.modal_edit = None;
    app.mind_map.set_editor_modal_open(false);
}

/// Applies a text-editing key to a field. Returns false when the key has
/// no meaning for a text field.
pub fn edit_text(buffer: &mut EditBuffer, key: &KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let word = ctrl || key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('w') if ctrl => delete_word_backward(buffer),
        KeyCode::Char('u') if ctrl => delete_to_start(buffer),
        KeyCode::Char('k') if ctrl => delete_to_end(buffer),
        KeyCode::Char('a') if ctrl => buffer.cursor = 0,
        KeyCode::Char('e') if ctrl => buffer.cursor = buffer.len(),
        KeyCode::Char(_) if ctrl => return false,
        KeyCode::Char(c) => type_char(buffer, c),
        KeyCode::Backspace if word => delete_word_backward(buffer),
        KeyCode::Backspace => backspace(buffer),
        KeyCode::Delete if word => delete_word_forward(buffer),
        KeyCode::Delete => delete_char(buffer),
        KeyCode::Left if word => move_cursor_word_left(buffer),
        KeyCode::Left => buffer.cursor = buffer.cursor.saturating_sub(1),
        KeyCode::Right if word => move_cursor_word_right(buffer),
        KeyCode::Right => buffer.cursor = (buffer.cursor + 1).min(buffer.len()),
        KeyCode::Home => buffer.cursor = 0,
        KeyCode::End => buffer.cursor = buffer.len(),
        _ => return false,
    }
    true
}

pub fn type_char(buffer: &mut EditBuffer, c: char) {
    let at = buffer.byte_index(buffer.cursor);
    buffer.text.insert(at, c);
    buffer.cursor += 1;
}

pub fn backspace(buffer: &mut EditBuffer) {
    if buffer.cursor > 0 {
        buffer.cursor -= 1;
        let at = buffer.byte_index(buffer.cursor);
        buffer.text.remove(at);
    }
}

pub fn delete_char(buffer: &mut EditBuffer) {
    if buffer.cursor < buffer.len() {
        let at = buffer.byte_index(buffer.cursor);
        buffer.text.remove(at);
    }
}

pub fn move_cursor_word_left(buffer: &mut EditBuffer) {
    buffer.cursor = word_start(buffer);
}

pub fn move_cursor_word_right(buffer: &mut EditBuffer) {
    buffer.cursor = word_end(buffer);
}

pub fn delete_word_backward(buffer: &mut EditBuffer) {
    let start = word_start(buffer);
    let range = buffer.byte_index(start)..buffer.byte_index(buffer.cursor);
    buffer.text.replace_range(range, "");
    buffer.cursor = start;
}

pub fn delete_word_forward(buffer: &mut EditBuffer) {
    let end = word_end(buffer);
    let range = buffer.byte_index(buffer.cursor)..buffer.byte_index(end);
    buffer.text.replace_range(range, "");
}

pub fn delete_to_start(buffer: &mut EditBuffer) {
    let at = buffer.byte_index(buffer.cursor);
    buffer.text.replace_range(..at, "");
    buffer.cursor = 0;
}

pub fn delete_to_end(buffer: &mut EditBuffer) {
    let at = buffer.byte_index(buffer.cursor);
    buffer.text.truncate(at);
}

// Start of the word before the cursor, skipping spaces first.
fn word_start(buffer: &EditBuffer) -> usize {
    let chars: Vec<char> = buffer.text.chars().collect();
    let mut pos = buffer.cursor.min(chars.len());
    while pos > 0 && chars[pos - 1] == ' ' {
        pos -= 1;
    }
    while pos > 0 && chars[pos - 1] != ' ' {
        pos -= 1;
    }
    pos
}

// End of the current word plus the spaces after it.
fn word_end(buffer: &EditBuffer) -> usize {
    let chars: Vec<char> = buffer.text.chars().collect();
    let mut pos = buffer.cursor.min(chars.len());
    while pos < chars.len() && chars[pos] != ' ' {
        pos += 1;
    }
    while pos < chars.len() && chars[pos] == ' ' {
        pos += 1;
    }
    pos
}
