//! Reusable UI components
//!
//! This module contains shared UI components used throughout the application:
//! - Header (endpoint, API key, cache size)
//! - Tab bar
//! - Footer (command help and status line)
//! - Single-line inputs with a cursor
//! - Result cards as styled lines

use super::styling::{HELP_FG, link_style, loading_color, title_style};
use crate::catalog::ItemCard;
use crate::editor::LineEditor;
use crate::state::AppState;
use crate::types::{ActiveTab, InputMode, LoadingState, PanelFocus};
use crate::utils::mask_token;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
};

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

/// Connection details shown in the header
#[derive(Debug, Clone, Copy)]
pub struct HeaderInfo<'a> {
    pub search_url: Option<&'a str>,
    pub api_key: Option<&'a str>,
}

/// Render the application header with endpoint and key info
pub fn render_header(frame: &mut Frame, area: Rect, info: HeaderInfo, state: &AppState) {
    let endpoint = info.search_url.unwrap_or("sin configurar (',')");
    let key = match info.api_key {
        Some(key) => format!("🔒 {}", mask_token(key)),
        None => "🔓 sin OPENAI_API_KEY".to_string(),
    };

    let header_text = format!(
        "catalog-tui - {endpoint} | {key} | {} en caché",
        state.cache.len()
    );

    let header = Paragraph::new(header_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

pub fn render_tab_bar(frame: &mut Frame, area: Rect, active: ActiveTab) {
    let titles: Vec<Line> = ActiveTab::ALL
        .iter()
        .map(|tab| Line::from(format!("[{}] {}", tab.index() + 1, tab.title())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(active.index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(tabs, area);
}

/// Render the footer with command help, or the status message when set
pub fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let (text, style) = match &state.ui.status {
        Some(status) => (status.clone(), Style::default().fg(Color::Green)),
        None => (footer_hint(state).to_string(), Style::default().fg(Color::Yellow)),
    };

    let footer = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title("Commands"));

    frame.render_widget(footer, area);
}

/// Key help for the current mode, tab and focus
pub fn footer_hint(state: &AppState) -> &'static str {
    match state.input.mode {
        InputMode::Editing if state.ui.active_tab == ActiveTab::Admin => {
            "Tab/↓:Next field ⇧Tab/↑:Prev Enter:Next Esc:Done Ctrl+W:Word Ctrl+L:Clear"
        }
        InputMode::Editing => "Enter:Send Esc:Done Ctrl+W:Word Ctrl+L:Clear ←/→:Cursor",
        InputMode::ConfirmAdmin => "y/Enter:Confirm n/Esc:Cancel",
        InputMode::EditingEndpoints => "Tab:Next field Enter:Save Esc:Cancel",
        InputMode::ViewingDetail => "j/k:Scroll y/Y:Yank JSON/text m:Edit in admin Esc:Close",
        InputMode::Normal => match (state.ui.active_tab, state.ui.panel_focus) {
            (ActiveTab::Admin, _) => {
                "j/k:Field e:Edit a:Action x:Clear field f:Autofill s:Send C:Reset | ,:URLs q:Quit"
            }
            (_, PanelFocus::Results) => {
                "j/k:Select Enter:Detail y/Y:Yank m:Edit H:Export h:Back | Tab:Tab ,:URLs q:Quit"
            }
            (ActiveTab::Assistant, PanelFocus::Form) => {
                "e:Ask (@file.wav for audio) v:Speak l:Results | Tab:Tab ,:URLs q:Quit"
            }
            (_, PanelFocus::Form) => "e/Enter:Type l:Results H:Export | Tab:Tab 1-4:Jump ,:URLs q:Quit",
        },
    }
}

/// A status line for a request: spinner, error, or completion note
pub fn loading_line(loading: &LoadingState, spinner_index: usize, done: &str) -> Line<'static> {
    let text = match loading {
        LoadingState::Idle => String::new(),
        LoadingState::Loading => format!("{} Consultando...", SPINNER[spinner_index % SPINNER.len()]),
        LoadingState::Complete => done.to_string(),
        LoadingState::Error(e) => format!("❌ {e}"),
    };
    Line::from(Span::styled(text, Style::default().fg(loading_color(loading))))
}

/// Single-line input with a visible cursor when active
pub fn editor_line<'a>(label: &'a str, editor: &'a LineEditor, active: bool) -> Line<'a> {
    let label_style = if active {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::LightCyan)
    };

    let mut spans = vec![Span::styled(format!("{label}: "), label_style)];
    if active {
        let (before, after) = editor.split_at_cursor();
        let mut rest = after.chars();
        let under = rest.next().map(String::from).unwrap_or_else(|| " ".to_string());
        spans.push(Span::raw(before));
        spans.push(Span::styled(
            under,
            Style::default().add_modifier(Modifier::REVERSED),
        ));
        spans.push(Span::raw(rest.as_str()));
    } else {
        spans.push(Span::raw(editor.content()));
    }
    Line::from(spans)
}

/// A result card as terminal lines
pub fn card_lines(card: &ItemCard, selected: bool) -> Vec<Line<'static>> {
    let marker = if selected { "▶ " } else { "  " };
    let mut lines = vec![
        Line::from(Span::styled(
            format!("{marker}{}", card.title),
            title_style(selected),
        )),
        Line::from(Span::styled(
            format!("  {}", card.caption),
            Style::default().fg(HELP_FG),
        )),
        Line::from(format!("  {}", card.detail)),
    ];

    for link in card.image.iter().chain(card.official_page.iter()) {
        if link.url.is_empty() {
            lines.push(Line::from(format!("  {}", link.label)));
        } else {
            lines.push(Line::from(vec![
                Span::raw(format!("  {} ", link.label)),
                Span::styled(link.url.clone(), link_style()),
            ]));
        }
    }

    if !card.manuals.is_empty() {
        let mut spans = vec![Span::raw("  📘 Manuales: ")];
        for (i, manual) in card.manuals.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" · "));
            }
            spans.push(Span::raw(format!("{} ", manual.label)));
            spans.push(Span::styled(manual.url.clone(), link_style()));
        }
        lines.push(Line::from(spans));
    }

    if let Some(minifigs) = &card.minifigs {
        lines.push(Line::from(format!("  🧍 {minifigs}")));
    }
    if !card.tags.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  🏷️ {}", card.tags.join(", ")),
            Style::default().fg(Color::Magenta),
        )));
    }

    lines.push(Line::from(""));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogItem;

    #[test]
    fn test_card_lines_plain_text() {
        let item = CatalogItem {
            set_number: Some(75192),
            name: Some("Millennium Falcon".into()),
            manuals: vec!["https://m/1.pdf".into()],
            ..Default::default()
        };
        let lines = card_lines(&ItemCard::from_item(&item), true);
        let text: Vec<String> = lines.iter().map(|l| l.to_string()).collect();
        assert_eq!(text[0], "▶ 75192 · Millennium Falcon");
        assert!(text.iter().any(|l| l.contains("1 · Ver https://m/1.pdf")));
        assert_eq!(text.last().map(String::as_str), Some(""));
    }

    #[test]
    fn test_editor_line_cursor() {
        let mut editor = LineEditor::with_content("abc");
        editor.move_cursor_left();
        let line = editor_line("Pregunta", &editor, true);
        assert_eq!(line.to_string(), "Pregunta: abc");

        let empty = LineEditor::new();
        assert_eq!(editor_line("Tema", &empty, true).to_string(), "Tema:  ");
    }

    #[test]
    fn test_footer_hint_by_mode() {
        let mut state = AppState::default();
        assert!(footer_hint(&state).contains("e/Enter:Type"));
        state.ui.active_tab = ActiveTab::Admin;
        assert!(footer_hint(&state).contains("s:Send"));
        state.input.mode = InputMode::ConfirmAdmin;
        assert_eq!(footer_hint(&state), "y/Enter:Confirm n/Esc:Cancel");
    }

    #[test]
    fn test_loading_line() {
        assert_eq!(loading_line(&LoadingState::Idle, 0, "ok").to_string(), "");
        assert_eq!(
            loading_line(&LoadingState::Error("Error 500: boom".into()), 0, "ok").to_string(),
            "❌ Error 500: boom"
        );
    }
}
