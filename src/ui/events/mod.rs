//! Event handling system for catalog-tui
//!
//! This module processes user input and translates it into state-changing actions.
//! It handles multiple input modes:
//! - Normal: Navigation and commands
//! - Editing: Typing into the focused field of the active tab
//! - ConfirmAdmin: Confirming an admin operation
//! - EditingEndpoints: Modal for configuring endpoint URLs
//! - ViewingDetail: Full record view
//!
//! # Architecture
//!
//! The EventHandler uses an action pattern where input events generate AppActions
//! that are applied to AppState via the apply_action function in actions.rs.
//!
//! # Lock Management
//!
//! Handlers take short locks on the shared state and never hold one across a
//! call into another handler. Background tasks write results under their own
//! short locks.

mod editing;
mod execution;
mod helpers;
mod modals;
mod navigation;
mod yank;

use crate::actions::AppAction;
use crate::app::Services;
use crate::config::EndpointSubmission;
use crate::state::{SharedState, read_state};
use crate::types::{ActiveTab, InputMode, PanelFocus};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use helpers::apply;
use std::time::Duration;
use yank::YankFormat;

/// Event handler for managing user input and state updates
#[derive(Debug, Default)]
pub struct EventHandler {
    pub should_quit: bool,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Main event handling loop - dispatches to appropriate handlers based on input mode
    ///
    /// Returns the new endpoint URLs when the configuration modal was submitted.
    pub fn handle_events(
        &mut self,
        state: &SharedState,
        services: &Services,
    ) -> Result<Option<EndpointSubmission>> {
        if !event::poll(Duration::from_millis(50))? {
            return Ok(None);
        }

        let Event::Key(key) = event::read()? else {
            return Ok(None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(None);
        }

        let input_mode = read_state(state).input.mode.clone();
        match input_mode {
            InputMode::EditingEndpoints => {
                return Ok(modals::handle_endpoints_input(key, state));
            }
            InputMode::ConfirmAdmin => modals::handle_confirm_admin(key, state, services),
            InputMode::ViewingDetail => modals::handle_detail(key, state),
            InputMode::Editing => editing::handle_editing_input(key, state, services),
            InputMode::Normal => self.handle_normal(key, state, services),
        }

        Ok(None)
    }

    fn handle_normal(&mut self, key: KeyEvent, state: &SharedState, services: &Services) {
        let (tab, panel) = {
            let s = read_state(state);
            (s.ui.active_tab, s.ui.panel_focus)
        };
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // footer goes back to key help; handlers below may set a new status
        apply(state, AppAction::ClearStatus);

        match key.code {
            // QUIT
            KeyCode::Char('q') => self.should_quit = true,

            // tabs
            KeyCode::Tab => apply(state, AppAction::NavigateTabForward),
            KeyCode::BackTab => apply(state, AppAction::NavigateTabBackward),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                apply(state, AppAction::NavigateToTab(ActiveTab::ALL[index]));
            }

            // panels
            KeyCode::Char('h') | KeyCode::Left => {
                apply(state, AppAction::NavigateToPanel(PanelFocus::Form))
            }
            KeyCode::Char('l') | KeyCode::Right => {
                apply(state, AppAction::NavigateToPanel(PanelFocus::Results))
            }

            // scrolling
            KeyCode::Char('d') if ctrl => apply(state, AppAction::ScrollDown),
            KeyCode::Char('u') if ctrl => apply(state, AppAction::ScrollUp),

            // nav
            KeyCode::Char('j') | KeyCode::Down => navigation::handle_down(state),
            KeyCode::Char('k') | KeyCode::Up => navigation::handle_up(state),

            KeyCode::Enter if panel == PanelFocus::Results && tab != ActiveTab::Admin => {
                navigation::open_selected_detail(state)
            }
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('i') => {
                apply(state, AppAction::StartEditing)
            }

            // results
            KeyCode::Char('y') if tab != ActiveTab::Admin => {
                yank::handle_yank_record(state, YankFormat::Json)
            }
            KeyCode::Char('Y') if tab != ActiveTab::Admin => {
                yank::handle_yank_record(state, YankFormat::Text)
            }
            KeyCode::Char('m') if tab != ActiveTab::Admin => {
                navigation::edit_selected_in_admin(state)
            }
            KeyCode::Char('H') if tab != ActiveTab::Admin => {
                yank::handle_export_html(state, &services.export_dir)
            }

            // admin form
            KeyCode::Char('a') if tab == ActiveTab::Admin => {
                apply(state, AppAction::CycleAdminAction)
            }
            KeyCode::Char('x') if tab == ActiveTab::Admin => {
                apply(state, AppAction::ToggleFieldCleared)
            }
            KeyCode::Char('f') if tab == ActiveTab::Admin => {
                execution::autofill_admin(state, services)
            }
            KeyCode::Char('s') if tab == ActiveTab::Admin => {
                execution::request_admin_confirmation(state)
            }
            KeyCode::Char('C') if tab == ActiveTab::Admin => {
                apply(state, AppAction::ClearAdminForm)
            }

            // assistant
            KeyCode::Char('v') if tab == ActiveTab::Assistant => {
                execution::speak_last_answer(state, services)
            }

            // endpoint configuration
            KeyCode::Char(',') => modals::handle_endpoints_dialog(state, services),

            KeyCode::Esc => apply(state, AppAction::NavigateToPanel(PanelFocus::Form)),

            _ => {}
        }
    }
}
