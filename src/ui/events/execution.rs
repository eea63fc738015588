//! Request execution handlers
//!
//! Each handler checks preconditions against the current state, then hands
//! the request to a background task. Nothing here awaits the network.

use super::helpers::apply;
use crate::actions::AppAction;
use crate::app::Services;
use crate::assistant::ask_background;
use crate::catalog::FormField;
use crate::client::{QueryKind, execute_admin_background, execute_query_background};
use crate::scrape::autofill_background;
use crate::state::{SharedState, read_state, write_state};
use crate::types::ActiveTab;
use chrono::Utc;

fn status(state: &SharedState, message: impl Into<String>) {
    apply(state, AppAction::SetStatus(message.into()));
}

/// Send the text typed in the active tab
pub fn submit_active(state: &SharedState, services: &Services) {
    let (tab, busy) = {
        let s = read_state(state);
        (s.ui.active_tab, s.is_busy())
    };
    if busy {
        status(state, "Espera a que termine la consulta en curso");
        return;
    }

    match tab {
        ActiveTab::Search => submit_query(state, services, QueryKind::Search),
        ActiveTab::Listing => submit_query(state, services, QueryKind::Listing),
        ActiveTab::Assistant => submit_assistant(state, services),
        ActiveTab::Admin => request_admin_confirmation(state),
    }
}

fn submit_query(state: &SharedState, services: &Services, kind: QueryKind) {
    let text = {
        let s = read_state(state);
        let query = match kind {
            QueryKind::Search => &s.search,
            QueryKind::Listing => &s.listing,
        };
        query.input.content().trim().to_string()
    };

    if text.is_empty() {
        status(
            state,
            match kind {
                QueryKind::Search => "Escribe una pregunta",
                QueryKind::Listing => "Escribe un tema",
            },
        );
        return;
    }

    apply(state, AppAction::ClearStatus);
    tracing::info!(?kind, %text, "submitting query");
    execute_query_background(state.clone(), services.catalog.clone(), kind, text);
}

fn submit_assistant(state: &SharedState, services: &Services) {
    let input = {
        let mut s = write_state(state);
        let input = s.assistant.input.content().trim().to_string();
        if !input.is_empty() {
            s.assistant.input.clear();
        }
        input
    };

    if input.is_empty() {
        status(state, "Escribe una pregunta o @ruta/al/audio");
        return;
    }
    if !services.assistant.has_api_key() {
        status(state, "Falta OPENAI_API_KEY");
        return;
    }

    apply(state, AppAction::ClearStatus);
    ask_background(
        state.clone(),
        services.assistant.clone(),
        services.catalog.clone(),
        input,
    );
}

/// Validate the admin form and ask for confirmation
pub fn request_admin_confirmation(state: &SharedState) {
    let payload = read_state(state).admin.payload(Utc::now());
    match payload {
        Ok(_) => apply(state, AppAction::EnterConfirmAdmin),
        Err(e) => status(state, format!("⚠ {e}")),
    }
}

/// Send the confirmed admin operation
pub fn send_admin(state: &SharedState, services: &Services) {
    let (action, payload) = {
        let s = read_state(state);
        (s.admin.action, s.admin.payload(Utc::now()))
    };
    apply(state, AppAction::ExitConfirmAdmin);

    match payload {
        Ok(payload) => {
            tracing::info!(action = action.wire_name(), "submitting admin operation");
            execute_admin_background(state.clone(), services.catalog.clone(), action, payload);
        }
        Err(e) => status(state, format!("⚠ {e}")),
    }
}

/// Fill empty admin fields from the official product page
pub fn autofill_admin(state: &SharedState, services: &Services) {
    let (url, busy) = {
        let s = read_state(state);
        (
            s.admin.field(FormField::LegoWebUrl).content().trim().to_string(),
            s.admin.autofill.is_loading(),
        )
    };

    if busy {
        return;
    }
    if url.is_empty() {
        status(state, "Rellena primero la Página LEGO");
        return;
    }
    if let Err(e) = crate::config::validate_url(&url) {
        status(state, format!("Página LEGO: {e}"));
        return;
    }

    autofill_background(state.clone(), services.catalog.http().clone(), url);
}

/// Synthesize the last assistant answer
pub fn speak_last_answer(state: &SharedState, services: &Services) {
    let (answer, busy) = {
        let s = read_state(state);
        (
            s.assistant.last_answer().map(str::to_string),
            s.assistant.speech.is_loading(),
        )
    };

    if busy {
        return;
    }
    let Some(answer) = answer else {
        status(state, "Todavía no hay respuesta que leer");
        return;
    };
    if !services.assistant.has_api_key() {
        status(state, "Falta OPENAI_API_KEY");
        return;
    }

    crate::assistant::speak_background(
        state.clone(),
        services.assistant.clone(),
        answer,
        services.speech_path.clone(),
    );
}
