//! Key routing. Raw key events are classified into at most one [`Intent`]
//! before anything is mutated; whether a key is consumed is decided by the
//! classification alone.

use crate::actions::{self, editing, file, help, history};
use crate::ai::GenerationRequest;
use crate::app::AppState;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Commit,
    Cancel,
    DeleteNode,
    CreateSibling,
    CreateChild,
    GenerateNodes,
    Navigate(Direction),
    OpenEditor,
    StartInlineEdit(char),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key was handled and must not reach any text field.
    Consumed,
    /// The key belongs to the active text field.
    PassThrough,
    /// Nothing recognised the key.
    Ignored,
    /// Consumed, and a suggestion request is waiting to be sent.
    Generate(GenerationRequest),
}

const AI_MODIFIERS: KeyModifiers = KeyModifiers::ALT
    .union(KeyModifiers::SUPER)
    .union(KeyModifiers::META);

const NON_TEXT_MODIFIERS: KeyModifiers = AI_MODIFIERS.union(KeyModifiers::CONTROL);

/// First-match-wins classification of a key press.
pub fn classify(editing: bool, key: &KeyEvent) -> Option<Intent> {
    use KeyCode::*;

    if editing {
        return match key.code {
            Enter => Some(Intent::Commit),
            Esc => Some(Intent::Cancel),
            _ => None,
        };
    }

    match key.code {
        Delete | Backspace => Some(Intent::DeleteNode),
        Enter => Some(Intent::CreateSibling),
        Tab => Some(Intent::CreateChild),
        Char(' ') if key.modifiers.intersects(AI_MODIFIERS) => Some(Intent::GenerateNodes),
        Up => Some(Intent::Navigate(Direction::Up)),
        Down => Some(Intent::Navigate(Direction::Down)),
        Left => Some(Intent::Navigate(Direction::Left)),
        Right => Some(Intent::Navigate(Direction::Right)),
        Char('e') | Char('E') => Some(Intent::OpenEditor),
        Char(c) if !c.is_control() && !key.modifiers.intersects(NON_TEXT_MODIFIERS) => {
            Some(Intent::StartInlineEdit(c))
        }
        _ => None,
    }
}

/// Mind-map keyboard dispatcher.
pub fn dispatch_key(app: &mut AppState, key: &KeyEvent) -> KeyOutcome {
    if !app.mind_map.keyboard_enabled() {
        return KeyOutcome::Ignored;
    }

    let editing = app.mind_map.is_editing();
    let Some(intent) = classify(editing, key) else {
        return if editing {
            KeyOutcome::PassThrough
        } else {
            KeyOutcome::Ignored
        };
    };

    match actions::execute_intent(intent, app) {
        Some(request) => KeyOutcome::Generate(request),
        None => KeyOutcome::Consumed,
    }
}

/// Waits up to `timeout` for a key press. Releases and repeats reported by
/// some terminals are skipped.
pub fn next_key(timeout: Duration) -> io::Result<Option<KeyEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Full routing for the terminal: editor modal, help overlay, application
/// shortcuts, the dispatcher, then the inline text field.
pub fn handle_key_event(app: &mut AppState, key: KeyEvent) -> KeyOutcome {
    app.clear_message();

    if app.mind_map.editor_modal_open() {
        return handle_modal_key(app, &key);
    }

    if app.show_help {
        return handle_help_key(app, &key);
    }

    // `?` only opens the legend outside text fields, where it would
    // otherwise start an inline edit.
    if key.code == KeyCode::F(1)
        || (key.code == KeyCode::Char('?') && !app.mind_map.is_editing())
    {
        help::show_help(app);
        return KeyOutcome::Consumed;
    }

    if let Some(outcome) = handle_app_key(app, &key) {
        return outcome;
    }

    let outcome = dispatch_key(app, &key);
    if outcome == KeyOutcome::PassThrough {
        if let Some(buffer) = app.inline_edit.as_mut() {
            editing::edit_text(buffer, &key);
        }
    }
    outcome
}

fn handle_app_key(app: &mut AppState, key: &KeyEvent) -> Option<KeyOutcome> {
    if !key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') => {
            actions::teardown(app);
            app.running = false;
        }
        KeyCode::Char('s') => {
            if let Err(err) = file::save(app) {
                warn!(%err, "save failed");
                app.set_message(format!("Save failed: {err}"));
            }
        }
        KeyCode::Char('z') => history::undo(app),
        KeyCode::Char('y') | KeyCode::Char('r') => history::redo(app),
        _ => return None,
    }

    Some(KeyOutcome::Consumed)
}

// The legend swallows every key except the application shortcuts.
fn handle_help_key(app: &mut AppState, key: &KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::F(1) => {
            help::close_help(app);
            KeyOutcome::Consumed
        }
        _ => handle_app_key(app, key).unwrap_or(KeyOutcome::Consumed),
    }
}

fn handle_modal_key(app: &mut AppState, key: &KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Enter => editing::save_editor(app),
        KeyCode::Esc => editing::close_editor(app),
        _ => {
            let edited = app
                .modal_edit
                .as_mut()
                .is_some_and(|buffer| editing::edit_text(buffer, key));
            return if edited {
                KeyOutcome::PassThrough
            } else {
                KeyOutcome::Ignored
            };
        }
    }
    KeyOutcome::Consumed
}
