use crate::assistant::AssistantClient;
use crate::client::CatalogClient;
use crate::config::{Config, EndpointSubmission};
use crate::state::{AppState, SharedState, read_state, write_state};
use crate::types::InputMode;
use crate::ui::{self, draw};
use color_eyre::Result;
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout},
};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Instant;

/// Clients and paths the event handlers need
#[derive(Debug, Clone)]
pub struct Services {
    pub catalog: CatalogClient,
    pub assistant: AssistantClient,
    pub export_dir: PathBuf,
    pub speech_path: PathBuf,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self> {
        let speech_path = config
            .speech_output_path()
            .unwrap_or_else(|_| PathBuf::from("respuesta.mp3"));
        Ok(Self {
            catalog: CatalogClient::new(&config.endpoints)?,
            assistant: AssistantClient::new(&config.assistant)
                .map_err(|e| color_eyre::eyre::eyre!("{e:#}"))?,
            export_dir: config.export_dir(),
            speech_path,
        })
    }
}

#[derive(Debug)]
pub struct App {
    state: SharedState,
    services: Services,
    config: Config,
    spinner_index: usize,
    last_tick: Instant,
    event_handler: ui::EventHandler,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let services = Services::from_config(&config)?;

        let mut state = AppState::default();
        // Show the endpoint modal on first run
        if !config.endpoints.is_configured() {
            crate::actions::apply_action(
                crate::actions::AppAction::EnterEndpointsMode {
                    search_url: None,
                    admin_url: None,
                    listing_url: None,
                },
                &mut state,
            );
        }

        Ok(Self {
            state: Arc::new(RwLock::new(state)),
            services,
            config,
            spinner_index: 0,
            last_tick: Instant::now(),
            event_handler: ui::EventHandler::new(),
        })
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        // Main UI loop
        while !self.event_handler.should_quit {
            // Update spinner animation
            if self.last_tick.elapsed().as_millis() > 100 {
                self.spinner_index = (self.spinner_index + 1) % 4;
                self.last_tick = Instant::now();
            }

            terminal.draw(|frame| self.draw(frame))?;

            if let Some(submission) = self
                .event_handler
                .handle_events(&self.state, &self.services)?
            {
                self.apply_endpoints(submission);
            }

            // let background tasks make progress between polls
            tokio::task::yield_now().await;
        }

        Ok(())
    }

    /// Save new endpoint URLs and rebuild the catalog client
    fn apply_endpoints(&mut self, submission: EndpointSubmission) {
        self.config.apply_endpoints(submission);

        let status = match self.config.save() {
            Ok(()) => "Endpoints guardados".to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to save config");
                format!("Endpoints aplicados, pero no se pudieron guardar: {e}")
            }
        };

        match CatalogClient::new(&self.config.endpoints) {
            Ok(client) => {
                self.services.catalog = client;
                write_state(&self.state).ui.status = Some(status);
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to rebuild HTTP client");
                write_state(&self.state).ui.status = Some(format!("Error: {e}"));
            }
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let state = read_state(&self.state);

        // Create main layout: Header, Tabs, Body, Footer
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Body
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let body_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(main_chunks[2]);

        draw::render_header(
            frame,
            main_chunks[0],
            draw::HeaderInfo {
                search_url: self.services.catalog.endpoints().search_url.as_deref(),
                api_key: self.services.assistant.api_key(),
            },
            &state,
        );
        draw::render_tab_bar(frame, main_chunks[1], state.ui.active_tab);
        draw::render_form_panel(frame, body_chunks[0], &state, self.spinner_index);
        draw::render_results_panel(frame, body_chunks[1], &state);
        draw::render_footer(frame, main_chunks[3], &state);

        // Render modals LAST - after everything else
        match state.input.mode {
            InputMode::EditingEndpoints => draw::render_endpoints_modal(frame, &state),
            InputMode::ConfirmAdmin => draw::render_confirm_admin_modal(frame, &state),
            InputMode::ViewingDetail => draw::render_detail_modal(frame, &state),
            InputMode::Normal | InputMode::Editing => {}
        }
    }
}
