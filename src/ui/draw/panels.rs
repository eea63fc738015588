//! Main panel rendering
//!
//! This module contains rendering functions for the two main panels:
//! - Form panel (left side) - inputs and answers for the active tab
//! - Results panel (right side) - result cards, or the admin payload preview

use super::components::card_lines;
use super::styling::{HELP_FG, border_style};
use super::tabs::{render_admin_tab, render_assistant_tab, render_query_tab};
use crate::catalog::ItemCard;
use crate::state::AppState;
use crate::types::{ActiveTab, InputMode, PanelFocus};
use chrono::Utc;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// Render the left panel for the active tab
pub fn render_form_panel(frame: &mut Frame, area: Rect, state: &AppState, spinner_index: usize) {
    let focused = state.ui.panel_focus == PanelFocus::Form;
    let editing = state.input.mode == InputMode::Editing;

    let block = Block::default()
        .title(format!("[{}] {}", state.ui.active_tab.index() + 1, state.ui.active_tab.title()))
        .borders(Borders::ALL)
        .border_style(border_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match state.ui.active_tab {
        ActiveTab::Search => {
            render_query_tab(frame, inner, &state.search, "Pregunta", editing, spinner_index)
        }
        ActiveTab::Listing => {
            render_query_tab(frame, inner, &state.listing, "Tema", editing, spinner_index)
        }
        ActiveTab::Admin => render_admin_tab(frame, inner, state, spinner_index),
        ActiveTab::Assistant => {
            render_assistant_tab(frame, inner, &state.assistant, editing, spinner_index)
        }
    }
}

/// Render the right panel: result cards or the admin payload preview
pub fn render_results_panel(frame: &mut Frame, area: Rect, state: &AppState) {
    if state.ui.active_tab == ActiveTab::Admin {
        render_payload_preview(frame, area, state);
        return;
    }

    let focused = state.ui.panel_focus == PanelFocus::Results;
    let items = state.current_items();
    let selected = state.selected_result();

    let title = if items.is_empty() {
        " Resultados ".to_string()
    } else {
        format!(" Resultados [{}/{}] ", selected + 1, items.len())
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if state.ui.yank_flash {
            Style::default().fg(Color::Green)
        } else {
            border_style(focused)
        });

    if items.is_empty() {
        let empty = Paragraph::new(Span::styled("Sin resultados todavía", Style::default().fg(HELP_FG)))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_start = 0;
    for (i, item) in items.iter().enumerate() {
        if i == selected {
            selected_start = lines.len();
        }
        lines.extend(card_lines(&ItemCard::from_item(item), i == selected && focused));
    }

    // The selected card starts at the top, then manual scrolling applies
    let scroll = selected_start + state.ui.results_scroll;

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll.min(u16::MAX as usize) as u16, 0));
    frame.render_widget(paragraph, area);
}

/// What will be sent to the admin endpoint, or why nothing can be
fn render_payload_preview(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .title(format!(" Payload ({}) ", state.admin.action.wire_name()))
        .borders(Borders::ALL)
        .border_style(border_style(state.ui.panel_focus == PanelFocus::Results));

    let paragraph = match state.admin.payload(Utc::now()) {
        Ok(payload) => {
            let text = serde_json::to_string_pretty(&payload).unwrap_or_default();
            Paragraph::new(text).style(Style::default().fg(Color::White))
        }
        Err(e) => Paragraph::new(format!("⚠ {e}")).style(Style::default().fg(Color::Red)),
    };

    frame.render_widget(
        paragraph
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((state.ui.results_scroll as u16, 0)),
        area,
    );
}
