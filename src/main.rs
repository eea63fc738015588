mod actions;
mod app;
mod assistant;
mod cache;
mod catalog;
mod client;
mod config;
mod editor;
mod logging;
mod scrape;
mod state;
mod types;
mod ui;
mod utils;

use app::App;
use color_eyre::Result;
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let _log_guard = logging::init_logging(&Config::config_dir()?)?;
    let config = Config::load()?;
    tracing::info!(configured = config.endpoints.is_configured(), "starting catalog-tui");

    let app = App::new(config)?;
    let terminal = ratatui::init();
    let app_result = app.run(terminal).await;
    ratatui::restore();
    app_result
}
