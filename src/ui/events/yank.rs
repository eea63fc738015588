//! Yank (copy) and export handlers
//!
//! `y` copies the selected record as pretty JSON to the system clipboard,
//! `Y` as the plain text of its card. `H` writes the current result list as a standalone HTML page.

use super::helpers::{apply, flash_yank};
use crate::actions::AppAction;
use crate::catalog::{CatalogItem, ItemCard};
use crate::catalog::html::render_page;
use crate::state::{AppState, SharedState, read_state};
use crate::types::ActiveTab;
use arboard::Clipboard;
use chrono::{DateTime, Local};
use color_eyre::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Pretty JSON of a record, as copied to the clipboard
pub fn record_json(item: &CatalogItem) -> String {
    serde_json::to_string_pretty(item).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YankFormat {
    Json,
    Text,
}

/// Card text of a record, one line per entry
pub fn record_text(item: &CatalogItem) -> String {
    ItemCard::from_item(item).to_text_lines().join("\n")
}

/// Yank the record in the detail modal, or the selected result
pub fn handle_yank_record(state: &SharedState, format: YankFormat) {
    let item = {
        let s = read_state(state);
        s.detail.clone().or_else(|| s.selected_item_cached())
    };
    let Some(item) = item else {
        apply(state, AppAction::SetStatus("Nada que copiar".to_string()));
        return;
    };

    let text = match format {
        YankFormat::Json => record_json(&item),
        YankFormat::Text => record_text(&item),
    };
    match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text)) {
        Ok(()) => {
            tracing::debug!(set_number = ?item.set_number, ?format, "record yanked");
            flash_yank(state);
            apply(
                state,
                AppAction::SetStatus(format!("Copiado: {}", item.display_name())),
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "clipboard unavailable");
            apply(
                state,
                AppAction::SetStatus(format!("No se pudo copiar: {e}")),
            );
        }
    }
}

/// Title, answer and records of what the active tab is showing
fn export_contents(state: &AppState) -> (String, String, Vec<CatalogItem>) {
    let (title, answer) = match state.ui.active_tab {
        ActiveTab::Search => (state.search.last_query.clone(), state.search.answer().to_string()),
        ActiveTab::Listing => (
            format!("Tema: {}", state.listing.last_query),
            state.listing.answer().to_string(),
        ),
        ActiveTab::Assistant => (
            "Asistente".to_string(),
            state.assistant.last_answer().unwrap_or_default().to_string(),
        ),
        ActiveTab::Admin => (String::new(), String::new()),
    };
    let title = if title.trim().is_empty() {
        "Catálogo LEGO".to_string()
    } else {
        title
    };
    (title, answer, state.current_items().to_vec())
}

pub fn export_file_name(now: DateTime<Local>) -> String {
    format!("catalogo-{}.html", now.format("%Y%m%d-%H%M%S"))
}

/// Write the page into `dir`, returning the file path
pub fn write_export(dir: &Path, html: &str, now: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(now));
    fs::write(&path, html)?;
    Ok(path)
}

pub fn handle_export_html(state: &SharedState, dir: &Path) {
    let (title, answer, items) = export_contents(&read_state(state));
    if items.is_empty() && answer.is_empty() {
        apply(state, AppAction::SetStatus("Nada que exportar".to_string()));
        return;
    }

    let html = render_page(&title, &answer, &items);
    match write_export(dir, &html, Local::now()) {
        Ok(path) => {
            tracing::info!(path = %path.display(), items = items.len(), "exported HTML");
            apply(
                state,
                AppAction::SetStatus(format!("Exportado a {}", path.display())),
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "HTML export failed");
            apply(state, AppAction::SetStatus(format!("Error al exportar: {e}")));
        }
    }
}
