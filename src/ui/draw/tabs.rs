//! Left-panel content for each tab
//!
//! - Search: question input, answer, timing
//! - Listing: theme input, answer, timing
//! - Admin: action selector and the field form
//! - Assistant: conversation and question input

use super::components::{editor_line, loading_line};
use super::styling::{HELP_FG, speaker_style};
use crate::catalog::FormField;
use crate::state::{AdminState, AppState, AssistantState, QueryState};
use crate::types::{InputMode, LoadingState};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

/// Shared layout for the search and listing tabs
pub fn render_query_tab(
    frame: &mut Frame,
    area: Rect,
    query: &QueryState,
    label: &str,
    editing: bool,
    spinner_index: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Input
            Constraint::Length(2), // Status
            Constraint::Min(0),    // Answer
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(editor_line(label, &query.input, editing)),
        chunks[0],
    );

    let done = query
        .outcome
        .as_ref()
        .map(|o| {
            format!(
                "✓ {} resultado(s) en {} ms",
                o.response.items.len(),
                o.duration.as_millis()
            )
        })
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(loading_line(&query.loading, spinner_index, &done)),
        chunks[1],
    );

    let answer = match &query.outcome {
        Some(outcome) if outcome.response.is_empty() => "Sin resultados".to_string(),
        Some(outcome) => outcome.response.answer.clone(),
        None => String::new(),
    };
    frame.render_widget(
        Paragraph::new(answer).wrap(Wrap { trim: false }),
        chunks[2],
    );
}

pub fn render_admin_tab(frame: &mut Frame, area: Rect, state: &AppState, spinner_index: usize) {
    let admin = &state.admin;
    let editing = state.input.mode == InputMode::Editing;

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Acción: ", Style::default().fg(Color::LightCyan)),
            Span::styled(
                format!("◀ {} ▶", admin.action.label()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (a para cambiar)", Style::default().fg(HELP_FG)),
        ]),
        Line::from(""),
    ];
    lines.extend(admin_field_lines(admin, editing));
    lines.push(Line::from(""));
    lines.push(loading_line(
        &admin.loading,
        spinner_index,
        admin.message.as_deref().unwrap_or("✓ Hecho"),
    ));
    if admin.autofill != LoadingState::Idle {
        lines.push(loading_line(&admin.autofill, spinner_index, "✓ Autocompletado"));
    }

    // keep the selected field visible on short terminals
    let height = area.height as usize;
    let selected_line = admin.selected_field + 2;
    let scroll = selected_line.saturating_sub(height.saturating_sub(4));

    frame.render_widget(
        Paragraph::new(lines).scroll((scroll as u16, 0)),
        area,
    );
}

fn admin_field_lines(admin: &AdminState, editing: bool) -> Vec<Line<'_>> {
    FormField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let selected = i == admin.selected_field;
            let mut line = editor_line(field.label(), admin.field(*field), selected && editing);
            if admin.cleared.contains(field) {
                line.spans.push(Span::styled(
                    "  ⌫ borrar",
                    Style::default().fg(Color::Red),
                ));
            }
            if selected {
                line.spans.insert(0, Span::styled("▶ ", Style::default().fg(Color::Yellow)));
            } else {
                line.spans.insert(0, Span::raw("  "));
            }
            line
        })
        .collect()
}

pub fn render_assistant_tab(
    frame: &mut Frame,
    area: Rect,
    assistant: &AssistantState,
    editing: bool,
    spinner_index: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Conversation
            Constraint::Length(1), // Status
            Constraint::Length(2), // Input
        ])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    for turn in &assistant.turns {
        let prefix = match turn.speaker {
            crate::types::Speaker::User => "Tú: ",
            crate::types::Speaker::Assistant => "🤖 ",
            crate::types::Speaker::System => "   ",
        };
        lines.push(Line::from(Span::styled(
            format!("{prefix}{}", turn.text),
            speaker_style(turn.speaker),
        )));
        lines.push(Line::from(""));
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Pregunta algo sobre tu colección. Usa @ruta/audio.wav para preguntar con voz.",
            Style::default().fg(HELP_FG),
        )));
    }

    // stick to the bottom of the conversation
    let height = chunks[0].height as usize;
    let scroll = lines.len().saturating_sub(height);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll as u16, 0)),
        chunks[0],
    );

    let status = match (&assistant.loading, &assistant.speech) {
        (_, LoadingState::Loading) => loading_line(&assistant.speech, spinner_index, ""),
        (_, LoadingState::Error(_)) => loading_line(&assistant.speech, spinner_index, ""),
        (loading, _) => loading_line(loading, spinner_index, ""),
    };
    frame.render_widget(Paragraph::new(status), chunks[1]);

    frame.render_widget(
        Paragraph::new(editor_line("Pregunta", &assistant.input, editing)),
        chunks[2],
    );
}
