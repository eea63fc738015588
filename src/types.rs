use crate::catalog::SearchResponse;
use std::time::Duration;

/// Top-level tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTab {
    Search,
    Listing,
    Admin,
    Assistant,
}

impl ActiveTab {
    pub const ALL: [ActiveTab; 4] = [
        ActiveTab::Search,
        ActiveTab::Listing,
        ActiveTab::Admin,
        ActiveTab::Assistant,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            ActiveTab::Search => "Buscar",
            ActiveTab::Listing => "Por tema",
            ActiveTab::Admin => "Administrar",
            ActiveTab::Assistant => "Asistente",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ActiveTab::Search => 0,
            ActiveTab::Listing => 1,
            ActiveTab::Admin => 2,
            ActiveTab::Assistant => 3,
        }
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Tracks which main panel has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    Form,    // Left panel
    Results, // Right panel
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    /// Typing into the focused field of the active tab
    Editing,
    ConfirmAdmin,
    EditingEndpoints,
    ViewingDetail,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
    Complete,
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }
}

/// Fields of the endpoint configuration modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointField {
    Search,
    Admin,
    Listing,
}

impl EndpointField {
    pub const ALL: [EndpointField; 3] = [
        EndpointField::Search,
        EndpointField::Admin,
        EndpointField::Listing,
    ];

    pub fn index(&self) -> usize {
        match self {
            EndpointField::Search => 0,
            EndpointField::Admin => 1,
            EndpointField::Listing => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EndpointField::Search => "Search URL",
            EndpointField::Admin => "Admin URL",
            EndpointField::Listing => "Listing URL",
        }
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

/// A completed call to one of the catalog endpoints
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub response: SearchResponse,
    /// Time taken to complete the request
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
    /// Notices such as transcription results
    System,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl ChatTurn {
    pub fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self {
            speaker,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycle_forward() {
        let mut tab = ActiveTab::Search;
        let mut seen = vec![];
        for _ in 0..4 {
            seen.push(tab);
            tab = tab.next();
        }
        assert_eq!(seen, ActiveTab::ALL.to_vec());
        assert_eq!(tab, ActiveTab::Search);
    }

    #[test]
    fn test_tab_cycle_backward() {
        assert_eq!(ActiveTab::Search.previous(), ActiveTab::Assistant);
        assert_eq!(ActiveTab::Admin.previous(), ActiveTab::Listing);
    }

    #[test]
    fn test_endpoint_field_cycle() {
        assert_eq!(EndpointField::Search.next(), EndpointField::Admin);
        assert_eq!(EndpointField::Listing.next(), EndpointField::Search);
    }

    #[test]
    fn test_loading_state() {
        assert!(LoadingState::Loading.is_loading());
        assert!(!LoadingState::Error("x".into()).is_loading());
    }
}
