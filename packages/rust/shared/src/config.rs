//! Application configuration for togglenote.
//!
//! User config lives at `~/.togglenote/togglenote.toml`.
//! CLI flags and the `PORT` env var override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, TogglenoteError};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "togglenote.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".togglenote";

/// Port the server listens on when nothing else is configured.
pub const DEFAULT_PORT: u16 = 80;

// ---------------------------------------------------------------------------
// Config structs (matching togglenote.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Notion API settings.
    #[serde(default)]
    pub notion: NotionConfig,

    /// Chat-completion classifier settings ("Use AI" mode).
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// `[notion]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    /// API root; block paths are joined onto it.
    #[serde(default = "default_notion_base_url")]
    pub base_url: String,

    /// Value sent in the `Notion-Version` header.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            base_url: default_notion_base_url(),
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl NotionConfig {
    /// Parse [`Self::base_url`], forcing a trailing slash so relative joins keep the path.
    pub fn base_url(&self) -> Result<Url> {
        parse_base_url(&self.base_url)
    }
}

fn default_notion_base_url() -> String {
    "https://api.notion.com/v1/".into()
}
fn default_api_version() -> String {
    "2022-06-28".into()
}
fn default_timeout_secs() -> u64 {
    30
}

/// `[classifier]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Name of the env var holding the API key (never store the key itself).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// OpenAI-compatible API root.
    #[serde(default = "default_classifier_base_url")]
    pub base_url: String,

    /// Chat model used for classification.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_api_key_env(),
            base_url: default_classifier_base_url(),
            model: default_model(),
        }
    }
}

impl ClassifierConfig {
    pub fn base_url(&self) -> Result<Url> {
        parse_base_url(&self.base_url)
    }

    /// Read the API key from the configured env var, if set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|v| !v.is_empty())
    }
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn default_classifier_base_url() -> String {
    "https://api.openai.com/v1/".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{raw}/")
    };
    Url::parse(&with_slash)
        .map_err(|e| TogglenoteError::config(format!("invalid base URL {raw:?}: {e}")))
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.togglenote/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| TogglenoteError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.togglenote/togglenote.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| TogglenoteError::io(path, e))?;

    let config: AppConfig = toml::from_str(&content).map_err(|e| {
        TogglenoteError::config(format!("failed to parse {}: {e}", path.display()))
    })?;

    // Both base URLs must parse before the config is accepted.
    config.notion.base_url()?;
    config.classifier.base_url()?;
    Ok(config)
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| TogglenoteError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| TogglenoteError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| TogglenoteError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}
