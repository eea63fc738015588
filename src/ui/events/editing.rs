//! Text input handling for the active tab
//!
//! In the admin form Enter and Tab move between fields; elsewhere Enter
//! sends what was typed.

use super::execution::submit_active;
use super::helpers::{apply, collect_paste_batch, editing_action};
use crate::actions::AppAction;
use crate::app::Services;
use crate::state::{SharedState, read_state};
use crate::types::ActiveTab;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_editing_input(key: KeyEvent, state: &SharedState, services: &Services) {
    let tab = read_state(state).ui.active_tab;
    let in_admin = tab == ActiveTab::Admin;

    match key.code {
        KeyCode::Esc => apply(state, AppAction::StopEditing),
        KeyCode::Enter if in_admin => apply(state, AppAction::NextAdminField),
        KeyCode::Enter => {
            apply(state, AppAction::StopEditing);
            submit_active(state, services);
        }
        KeyCode::Tab | KeyCode::Down if in_admin => apply(state, AppAction::NextAdminField),
        KeyCode::BackTab | KeyCode::Up if in_admin => apply(state, AppAction::PreviousAdminField),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            apply(state, AppAction::InsertText(collect_paste_batch(c)));
        }
        _ => {
            if let Some(action) = editing_action(key) {
                apply(state, action);
            }
        }
    }
}
