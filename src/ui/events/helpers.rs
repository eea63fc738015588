//! Helper functions for event handling
//!
//! This module contains utility functions used across event handlers:
//! - State locking helpers (apply actions)
//! - Editing key mapping
//! - Paste batching
//! - Yank flash

use crate::actions::{AppAction, apply_action};
use crate::state::{SharedState, write_state};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

/// Apply a single action to state
pub fn apply(state: &SharedState, action: AppAction) {
    let mut s = write_state(state);
    apply_action(action, &mut s);
}

/// Apply multiple actions to state under one lock
pub fn apply_many(state: &SharedState, actions: Vec<AppAction>) {
    let mut s = write_state(state);
    for action in actions {
        apply_action(action, &mut s);
    }
}

/// Map a key to a text editing action on the focused field
pub fn editing_action(key: KeyEvent) -> Option<AppAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let action = match key.code {
        KeyCode::Backspace => AppAction::Backspace,
        KeyCode::Delete => AppAction::Delete,
        KeyCode::Left => AppAction::CursorLeft,
        KeyCode::Right => AppAction::CursorRight,
        KeyCode::Home => AppAction::CursorHome,
        KeyCode::End => AppAction::CursorEnd,
        KeyCode::Char('a') if ctrl => AppAction::CursorHome,
        KeyCode::Char('e') if ctrl => AppAction::CursorEnd,
        KeyCode::Char('w') if ctrl => AppAction::DeleteWord,
        KeyCode::Char('l') if ctrl => AppAction::ClearInput,
        KeyCode::Char(c) if !ctrl => AppAction::InsertText(c.to_string()),
        _ => return None,
    };
    Some(action)
}

/// Collect a batch of characters for paste support
///
/// When a character is typed, this function checks for any immediately available
/// character events and batches them together. This enables fast paste operations
/// in terminals.
pub fn collect_paste_batch(initial_char: char) -> String {
    let mut chars = vec![initial_char];

    // Drain any immediately available character events
    while let Ok(true) = event::poll(Duration::from_millis(0)) {
        if let Ok(Event::Key(next_key)) = event::read() {
            match next_key.code {
                KeyCode::Char(next_c) if !next_key.modifiers.contains(KeyModifiers::CONTROL) => {
                    chars.push(next_c);
                }
                _ => {
                    // Non-character or control key, stop batching
                    break;
                }
            }
        } else {
            break;
        }
    }

    chars.into_iter().collect()
}

/// Highlight the results border briefly after a copy
pub fn flash_yank(state: &SharedState) {
    write_state(state).ui.yank_flash = true;

    let state = state.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        write_state(&state).ui.yank_flash = false;
    });
}
