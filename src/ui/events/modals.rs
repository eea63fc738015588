//! Modal dialog handlers
//!
//! This module handles user input for modal dialogs:
//! - Endpoint configuration (search, admin and listing URLs)
//! - Admin operation confirmation
//! - Record detail view

use super::execution::send_admin;
use super::helpers::{apply, collect_paste_batch, editing_action};
use super::navigation::edit_selected_in_admin;
use super::yank::{YankFormat, handle_yank_record};
use crate::actions::AppAction;
use crate::app::Services;
use crate::config::{EndpointSubmission, validate_optional_url};
use crate::editor::LineEditor;
use crate::state::{SharedState, read_state};
use crate::types::EndpointField;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Open the endpoint modal prefilled with the current URLs
pub fn handle_endpoints_dialog(state: &SharedState, services: &Services) {
    let endpoints = services.catalog.endpoints();
    apply(
        state,
        AppAction::EnterEndpointsMode {
            search_url: endpoints.search_url.clone(),
            admin_url: endpoints.admin_url.clone(),
            listing_url: endpoints.listing_url.clone(),
        },
    );
}

/// Validate the three modal fields; empty means unset
pub fn endpoint_submission(fields: &[LineEditor]) -> Result<EndpointSubmission, String> {
    let value = |field: EndpointField| {
        let raw = fields.get(field.index()).map(LineEditor::content).unwrap_or("");
        validate_optional_url(raw).map_err(|e| format!("{}: {e}", field.label()))
    };

    Ok(EndpointSubmission {
        search_url: value(EndpointField::Search)?,
        admin_url: value(EndpointField::Admin)?,
        listing_url: value(EndpointField::Listing)?,
    })
}

/// Handle the endpoint modal (with paste batching support)
pub fn handle_endpoints_input(key: KeyEvent, state: &SharedState) -> Option<EndpointSubmission> {
    match key.code {
        KeyCode::Esc => apply(state, AppAction::ExitEndpointsMode),
        KeyCode::Tab | KeyCode::Down => apply(state, AppAction::NextEndpointField),
        KeyCode::Enter => {
            let result = endpoint_submission(&read_state(state).input.endpoint_fields);
            match result {
                Ok(submission) => {
                    tracing::info!(?submission, "endpoints submitted");
                    apply(state, AppAction::ExitEndpointsMode);
                    return Some(submission);
                }
                Err(e) => {
                    tracing::debug!(error = %e, "invalid endpoint URL");
                    apply(state, AppAction::SetEndpointError(e));
                }
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            apply(state, AppAction::InsertText(collect_paste_batch(c)));
        }
        _ => {
            if let Some(action) = editing_action(key) {
                apply(state, action);
            }
        }
    }
    None
}

pub fn handle_confirm_admin(key: KeyEvent, state: &SharedState, services: &Services) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => send_admin(state, services),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            apply(state, AppAction::ExitConfirmAdmin)
        }
        _ => {}
    }
}

pub fn handle_detail(key: KeyEvent, state: &SharedState) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => apply(state, AppAction::CloseDetail),
        KeyCode::Char('j') | KeyCode::Down => apply(state, AppAction::ScrollDown),
        KeyCode::Char('k') | KeyCode::Up => apply(state, AppAction::ScrollUp),
        KeyCode::Char('y') => handle_yank_record(state, YankFormat::Json),
        KeyCode::Char('Y') => handle_yank_record(state, YankFormat::Text),
        KeyCode::Char('m') => edit_selected_in_admin(state),
        _ => {}
    }
}
