//! Styling utilities and color schemes
//!
//! This module contains color helpers and style constants used throughout the UI.

use crate::types::{LoadingState, Speaker};
use ratatui::style::{Color, Modifier, Style};

pub const MODAL_BG: Color = Color::Rgb(30, 30, 30);
pub const HELP_FG: Color = Color::Rgb(150, 150, 150);

/// Border style for a panel depending on focus
pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn loading_color(state: &LoadingState) -> Color {
    match state {
        LoadingState::Idle => Color::DarkGray,
        LoadingState::Loading => Color::Yellow,
        LoadingState::Complete => Color::Green,
        LoadingState::Error(_) => Color::Red,
    }
}

pub fn speaker_style(speaker: Speaker) -> Style {
    match speaker {
        Speaker::User => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        Speaker::Assistant => Style::default().fg(Color::White),
        Speaker::System => Style::default().fg(Color::DarkGray),
    }
}

pub fn title_style(selected: bool) -> Style {
    let style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    if selected {
        style.bg(Color::Rgb(40, 40, 60))
    } else {
        style
    }
}

pub fn link_style() -> Style {
    Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::UNDERLINED)
}
