use color_eyre::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "catalog-tui";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub endpoints: EndpointConfig,
    pub assistant: AssistantConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    /// Natural-language search (`{"pregunta": ...}`)
    pub search_url: Option<String>,
    /// Create/update/delete (`{"accion": ...}`)
    pub admin_url: Option<String>,
    /// Listing filtered by theme (`{"tema": ...}`)
    pub listing_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            search_url: None,
            admin_url: None,
            listing_url: None,
            timeout_secs: 40,
        }
    }
}

impl EndpointConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn is_configured(&self) -> bool {
        self.search_url.is_some() || self.admin_url.is_some() || self.listing_url.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssistantConfig {
    pub api_base: String,
    /// Stored key; `OPENAI_API_KEY` takes precedence
    pub api_key: Option<String>,
    pub chat_model: String,
    pub transcription_model: String,
    pub speech_model: String,
    pub voice: String,
    /// Where synthesized speech is written; defaults to the config dir
    pub speech_output: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key: None,
            chat_model: "gpt-4o-mini".to_string(),
            transcription_model: "whisper-1".to_string(),
            speech_model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            speech_output: None,
            timeout_secs: 60,
        }
    }
}

impl AssistantConfig {
    /// API key from the environment, falling back to the config file
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|k| !k.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory for HTML exports; the current directory when unset
    pub dir: Option<PathBuf>,
}

/// Endpoint URLs entered in the configuration modal
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointSubmission {
    pub search_url: Option<String>,
    pub admin_url: Option<String>,
    pub listing_url: Option<String>,
}

impl Config {
    /// Directory holding config.toml and logs/
    pub fn config_dir() -> Result<PathBuf> {
        // Use ~/.config instead of platform-specific directory
        let home_dir = dirs::home_dir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Could not find home directory"))?;

        let app_dir = home_dir.join(".config").join(APP_DIR);

        if !app_dir.exists() {
            fs::create_dir_all(&app_dir)?;
        }

        Ok(app_dir)
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from file, or return default if file doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(path, toml_string)?;
        Ok(())
    }

    /// Replace endpoint URLs (empty strings unset them)
    pub fn apply_endpoints(&mut self, submission: EndpointSubmission) {
        self.endpoints.search_url = submission.search_url;
        self.endpoints.admin_url = submission.admin_url;
        self.endpoints.listing_url = submission.listing_url;
    }

    /// Speech output file, defaulting to the config directory
    pub fn speech_output_path(&self) -> Result<PathBuf> {
        match &self.assistant.speech_output {
            Some(path) => Ok(path.clone()),
            None => Ok(Self::config_dir()?.join("respuesta.mp3")),
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export.dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Simple URL validation
pub fn validate_url(url: &str) -> Result<(), String> {
    if url.is_empty() {
        return Err("URL cannot be empty".to_string());
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err("URL must start with http:// or https://".to_string());
    }

    let parsed = url::Url::parse(url).map_err(|e| format!("Invalid URL: {e}"))?;
    if parsed.host_str().is_none() {
        return Err("URL has no host".to_string());
    }

    Ok(())
}

/// Validate an optional URL field from a form: empty means "unset"
pub fn validate_optional_url(raw: &str) -> Result<Option<String>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    validate_url(trimmed)?;
    Ok(Some(trimmed.to_string()))
}
