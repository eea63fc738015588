//! Modal dialog rendering
//!
//! This module contains rendering functions for modal dialogs:
//! - Endpoint configuration modal (search, admin and listing URLs)
//! - Admin confirmation modal (shows the exact payload)
//! - Record detail modal

use super::components::{card_lines, editor_line};
use super::styling::{HELP_FG, MODAL_BG};
use crate::catalog::{AdminAction, ItemCard};
use crate::state::AppState;
use crate::types::EndpointField;
use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Centered rectangle of at most `max_width` columns
fn modal_rect(area: Rect, width_ratio: f32, max_width: u16, height: u16) -> Rect {
    let width = ((area.width as f32 * width_ratio) as u16).min(max_width);
    let height = height.min(area.height);
    Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

fn modal_block(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(MODAL_BG).fg(Color::White))
}

pub fn render_endpoints_modal(frame: &mut Frame, state: &AppState) {
    let modal_area = modal_rect(frame.area(), 0.7, 100, 12);
    frame.render_widget(Clear, modal_area);

    let block = modal_block(" Configurar endpoints ", Color::Yellow);
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Description
            Constraint::Length(1), // Search
            Constraint::Length(1), // Admin
            Constraint::Length(1), // Listing
            Constraint::Length(1), // Spacer
            Constraint::Length(2), // Error
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let desc = Paragraph::new("URLs de las funciones del catálogo. Deja un campo vacío para desactivarlo.")
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
    frame.render_widget(desc, chunks[0]);

    for field in EndpointField::ALL {
        let active = state.input.active_endpoint_field == field;
        let editor = &state.input.endpoint_fields[field.index()];
        let marker = if active { "► " } else { "  " };
        let mut line = editor_line(field.label(), editor, active);
        line.spans.insert(0, marker.into());
        frame.render_widget(Paragraph::new(line), chunks[1 + field.index()]);
    }

    if let Some(error) = &state.input.endpoint_error {
        let error = Paragraph::new(format!("❌ {error}"))
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true });
        frame.render_widget(error, chunks[5]);
    }

    let help = Paragraph::new("Tab: Cambiar campo  |  Ctrl+L: Limpiar  |  Enter: Guardar  |  Esc: Cancelar")
        .style(Style::default().fg(HELP_FG))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[6]);
}

/// Confirmation for an admin operation, showing what will be sent
pub fn render_confirm_admin_modal(frame: &mut Frame, state: &AppState) {
    let action = state.admin.action;
    let color = match action {
        AdminAction::Delete => Color::Red,
        AdminAction::Create | AdminAction::Update => Color::Yellow,
    };

    let payload = state
        .admin
        .payload(Utc::now())
        .map(|p| serde_json::to_string_pretty(&p).unwrap_or_default())
        .unwrap_or_else(|e| format!("⚠ {e}"));
    let payload_lines = payload.lines().count() as u16;

    let modal_area = modal_rect(frame.area(), 0.6, 80, payload_lines + 6);
    frame.render_widget(Clear, modal_area);

    let title = format!(" ¿Confirmar {}? ", action.label().to_lowercase());
    let block = modal_block(&title, color);
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(payload).wrap(Wrap { trim: false }),
        chunks[0],
    );

    let help = Paragraph::new("y/Enter: Confirmar  |  n/Esc: Cancelar")
        .style(Style::default().fg(HELP_FG))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[1]);
}

/// Full record: card plus the raw JSON
pub fn render_detail_modal(frame: &mut Frame, state: &AppState) {
    let Some(item) = &state.detail else {
        return;
    };

    let area = frame.area();
    let modal_area = modal_rect(area, 0.8, 120, area.height.saturating_sub(4));
    frame.render_widget(Clear, modal_area);

    let title = format!(" {} ", item.display_name());
    let block = modal_block(&title, Color::Cyan);

    let mut lines = card_lines(&ItemCard::from_item(item), false);
    let json = serde_json::to_string_pretty(item).unwrap_or_default();
    lines.extend(json.lines().map(|l| Line::from(l.to_string())));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.ui.detail_scroll as u16, 0));
    frame.render_widget(paragraph, modal_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_rect_centered() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = modal_rect(area, 0.5, 80, 10);
        assert_eq!(rect, Rect::new(25, 15, 50, 10));
    }

    #[test]
    fn test_modal_rect_clamped() {
        let area = Rect::new(0, 0, 200, 8);
        let rect = modal_rect(area, 0.9, 100, 20);
        assert_eq!(rect.width, 100);
        assert_eq!(rect.height, 8);
        assert_eq!(rect.y, 0);
    }
}
