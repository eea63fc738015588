//! Navigation handlers
//!
//! j/k move between admin form fields, or between result cards when the
//! results panel has focus. Enter on a result opens its detail.

use super::helpers::{apply, apply_many};
use crate::actions::AppAction;
use crate::state::{SharedState, read_state};
use crate::types::{ActiveTab, PanelFocus};

fn focus(state: &SharedState) -> (ActiveTab, PanelFocus) {
    let s = read_state(state);
    (s.ui.active_tab, s.ui.panel_focus)
}

pub fn handle_down(state: &SharedState) {
    let action = match focus(state) {
        (ActiveTab::Admin, PanelFocus::Form) => AppAction::NextAdminField,
        (ActiveTab::Admin, PanelFocus::Results) => AppAction::ScrollDown,
        _ => AppAction::SelectNext,
    };
    apply(state, action);
}

pub fn handle_up(state: &SharedState) {
    let action = match focus(state) {
        (ActiveTab::Admin, PanelFocus::Form) => AppAction::PreviousAdminField,
        (ActiveTab::Admin, PanelFocus::Results) => AppAction::ScrollUp,
        _ => AppAction::SelectPrevious,
    };
    apply(state, action);
}

/// Open the selected result (cached copy preferred) in the detail modal
pub fn open_selected_detail(state: &SharedState) {
    let item = read_state(state).selected_item_cached();
    match item {
        Some(item) => apply(state, AppAction::OpenDetail(item)),
        None => apply(state, AppAction::SetStatus("Nada seleccionado".to_string())),
    }
}

/// Copy the selected result into the admin form for editing
pub fn edit_selected_in_admin(state: &SharedState) {
    let item = {
        let s = read_state(state);
        s.detail.clone().or_else(|| s.selected_item_cached())
    };
    match item {
        Some(item) => {
            tracing::debug!(set_number = ?item.set_number, "loading record into admin form");
            apply_many(
                state,
                vec![AppAction::CloseDetail, AppAction::LoadItemIntoAdmin(item)],
            );
        }
        None => apply(state, AppAction::SetStatus("Nada seleccionado".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogItem, FormField};
    use crate::types::InputMode;

    fn state_with_assistant_items() -> SharedState {
        let state = SharedState::default();
        {
            let mut s = crate::state::write_state(&state);
            s.ui.active_tab = ActiveTab::Assistant;
            s.ui.panel_focus = PanelFocus::Results;
            s.assistant.items = vec![
                CatalogItem {
                    set_number: Some(1),
                    ..Default::default()
                },
                CatalogItem {
                    set_number: Some(2),
                    name: Some("Dos".into()),
                    ..Default::default()
                },
            ];
        }
        state
    }

    #[test]
    fn test_down_selects_next_result() {
        let state = state_with_assistant_items();
        handle_down(&state);
        assert_eq!(read_state(&state).assistant.selected, 1);
        handle_up(&state);
        assert_eq!(read_state(&state).assistant.selected, 0);
    }

    #[test]
    fn test_down_in_admin_form_moves_field() {
        let state = SharedState::default();
        crate::state::write_state(&state).ui.active_tab = ActiveTab::Admin;
        handle_down(&state);
        assert_eq!(read_state(&state).admin.selected(), FormField::Name);
    }

    #[test]
    fn test_open_detail_and_edit() {
        let state = state_with_assistant_items();
        handle_down(&state);
        open_selected_detail(&state);
        assert_eq!(read_state(&state).input.mode, InputMode::ViewingDetail);

        edit_selected_in_admin(&state);
        let s = read_state(&state);
        assert_eq!(s.input.mode, InputMode::Normal);
        assert!(s.detail.is_none());
        assert_eq!(s.ui.active_tab, ActiveTab::Admin);
        assert_eq!(s.admin.field(FormField::Name).content(), "Dos");
    }

    #[test]
    fn test_open_detail_without_results() {
        let state = SharedState::default();
        open_selected_detail(&state);
        assert_eq!(read_state(&state).ui.status.as_deref(), Some("Nada seleccionado"));
    }
}
