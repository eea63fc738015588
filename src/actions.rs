use crate::catalog::{CatalogItem, FormField};
use crate::state::AppState;
use crate::types::{ActiveTab, EndpointField, InputMode, PanelFocus};

/// Represents all possible state-changing actions in the application
/// Input handling produces actions; `apply_action` is the only place they
/// touch state, which keeps the mutations testable without a terminal
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    // Navigation actions
    NavigateToTab(ActiveTab),
    NavigateTabForward,
    NavigateTabBackward,
    NavigateToPanel(PanelFocus),
    SelectNext,
    SelectPrevious,

    // Scrolling actions
    ScrollUp,
    ScrollDown,

    // Text editing (applies to the focused editor)
    StartEditing,
    StopEditing,
    InsertText(String),
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    DeleteWord,
    ClearInput,

    // Admin form actions
    NextAdminField,
    PreviousAdminField,
    CycleAdminAction,
    ToggleFieldCleared,
    ClearAdminForm,
    LoadItemIntoAdmin(CatalogItem),

    // Modal actions
    OpenDetail(CatalogItem),
    CloseDetail,
    EnterConfirmAdmin,
    ExitConfirmAdmin,
    EnterEndpointsMode {
        search_url: Option<String>,
        admin_url: Option<String>,
        listing_url: Option<String>,
    },
    ExitEndpointsMode,
    NextEndpointField,
    SetEndpointError(String),

    // Footer status
    SetStatus(String),
    ClearStatus,
}

/// Apply an action to the application state
/// This is a pure state transformation; background tasks write their results
/// directly but every keystroke-driven mutation goes through here
pub fn apply_action(action: AppAction, state: &mut AppState) {
    match action {
        // Navigation
        AppAction::NavigateToTab(tab) => switch_tab(state, tab),
        AppAction::NavigateTabForward => {
            let tab = state.ui.active_tab.next();
            switch_tab(state, tab);
        }
        AppAction::NavigateTabBackward => {
            let tab = state.ui.active_tab.previous();
            switch_tab(state, tab);
        }
        AppAction::NavigateToPanel(panel) => {
            state.ui.panel_focus = panel;
        }
        AppAction::SelectNext => {
            let next = state.selected_result().saturating_add(1);
            state.set_selected_result(next);
            state.ui.results_scroll = 0;
        }
        AppAction::SelectPrevious => {
            let prev = state.selected_result().saturating_sub(1);
            state.set_selected_result(prev);
            state.ui.results_scroll = 0;
        }

        // Scrolling
        AppAction::ScrollUp => {
            if state.input.mode == InputMode::ViewingDetail {
                state.ui.detail_scroll = state.ui.detail_scroll.saturating_sub(5);
            } else {
                state.ui.results_scroll = state.ui.results_scroll.saturating_sub(5);
            }
        }
        AppAction::ScrollDown => {
            if state.input.mode == InputMode::ViewingDetail {
                state.ui.detail_scroll = state.ui.detail_scroll.saturating_add(5);
            } else {
                state.ui.results_scroll = state.ui.results_scroll.saturating_add(5);
            }
        }

        // Editing
        AppAction::StartEditing => {
            state.input.mode = InputMode::Editing;
            state.ui.panel_focus = PanelFocus::Form;
        }
        AppAction::StopEditing => {
            state.input.mode = InputMode::Normal;
        }
        AppAction::InsertText(text) => {
            if let Some(editor) = state.focused_editor_mut() {
                editor.insert_str(&text);
            }
        }
        AppAction::Backspace => {
            if let Some(editor) = state.focused_editor_mut() {
                editor.delete_char_before_cursor();
            }
        }
        AppAction::Delete => {
            if let Some(editor) = state.focused_editor_mut() {
                editor.delete_char_after_cursor();
            }
        }
        AppAction::CursorLeft => {
            if let Some(editor) = state.focused_editor_mut() {
                editor.move_cursor_left();
            }
        }
        AppAction::CursorRight => {
            if let Some(editor) = state.focused_editor_mut() {
                editor.move_cursor_right();
            }
        }
        AppAction::CursorHome => {
            if let Some(editor) = state.focused_editor_mut() {
                editor.move_cursor_to_start();
            }
        }
        AppAction::CursorEnd => {
            if let Some(editor) = state.focused_editor_mut() {
                editor.move_cursor_to_end();
            }
        }
        AppAction::DeleteWord => {
            if let Some(editor) = state.focused_editor_mut() {
                editor.delete_word_before_cursor();
            }
        }
        AppAction::ClearInput => {
            if let Some(editor) = state.focused_editor_mut() {
                editor.clear();
            }
        }

        // Admin form
        AppAction::NextAdminField => {
            let len = state.admin.fields.len();
            state.admin.selected_field = (state.admin.selected_field + 1) % len;
        }
        AppAction::PreviousAdminField => {
            let len = state.admin.fields.len();
            state.admin.selected_field = (state.admin.selected_field + len - 1) % len;
        }
        AppAction::CycleAdminAction => {
            state.admin.action = state.admin.action.next();
        }
        AppAction::ToggleFieldCleared => {
            let field = state.admin.selected();
            // the identifier addresses the record and cannot be cleared
            if field == FormField::SetNumber {
                return;
            }
            if !state.admin.cleared.remove(&field) {
                state.admin.cleared.insert(field);
            }
        }
        AppAction::ClearAdminForm => {
            state.admin.clear_form();
            state.admin.message = None;
        }
        AppAction::LoadItemIntoAdmin(item) => {
            state.admin.load_item(&item);
            state.admin.message = None;
            switch_tab(state, ActiveTab::Admin);
            state.input.mode = InputMode::Normal;
        }

        // Modals
        AppAction::OpenDetail(item) => {
            state.detail = Some(item);
            state.ui.detail_scroll = 0;
            state.input.mode = InputMode::ViewingDetail;
        }
        AppAction::CloseDetail => {
            state.detail = None;
            state.input.mode = InputMode::Normal;
        }
        AppAction::EnterConfirmAdmin => {
            state.input.mode = InputMode::ConfirmAdmin;
        }
        AppAction::ExitConfirmAdmin => {
            state.input.mode = InputMode::Normal;
        }
        AppAction::EnterEndpointsMode {
            search_url,
            admin_url,
            listing_url,
        } => {
            state.input.mode = InputMode::EditingEndpoints;
            let values = [search_url, admin_url, listing_url];
            for (editor, value) in state.input.endpoint_fields.iter_mut().zip(values) {
                editor.set_content(value.unwrap_or_default());
            }
            state.input.active_endpoint_field = EndpointField::Search;
            state.input.endpoint_error = None;
        }
        AppAction::ExitEndpointsMode => {
            state.input.mode = InputMode::Normal;
            for editor in &mut state.input.endpoint_fields {
                editor.clear();
            }
            state.input.endpoint_error = None;
        }
        AppAction::NextEndpointField => {
            state.input.active_endpoint_field = state.input.active_endpoint_field.next();
        }
        AppAction::SetEndpointError(message) => {
            state.input.endpoint_error = Some(message);
        }

        // Status
        AppAction::SetStatus(message) => {
            state.ui.status = Some(message);
        }
        AppAction::ClearStatus => {
            state.ui.status = None;
        }
    }
}

fn switch_tab(state: &mut AppState, tab: ActiveTab) {
    state.ui.active_tab = tab;
    state.ui.panel_focus = PanelFocus::Form;
    state.ui.results_scroll = 0;
}
