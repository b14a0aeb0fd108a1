//! Configuration system (layered: defaults < config file < env < code).

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConciergeError;
use crate::models::LanguageModel;

pub const DEFAULT_MODEL: &str = "ollama:llama3.2";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_FLIGHTS_MCP_URL: &str = "https://mcp.kiwi.com";
pub const DEFAULT_PLAYLIST_DB_PATH: &str = "resources/Chinook.db";
pub const DEFAULT_MAX_TOOL_ITERATIONS: usize = 20;

/// Environment variables understood by [`ConciergeConfig::apply_env`].
pub const ENV_VARS: [&str; 10] = [
    "CONCIERGE_MODEL",
    "OLLAMA_BASE_URL",
    "OPENAI_COMPAT_BASE_URL",
    "OPENAI_COMPAT_API_KEY",
    "TAVILY_API_KEY",
    "TAVILY_BASE_URL",
    "FLIGHTS_MCP_URL",
    "PLAYLIST_DB_PATH",
    "CONCIERGE_DELEGATION_TIMEOUT_SECS",
    "CONCIERGE_MAX_TOOL_ITERATIONS",
];

/// Runtime configuration for the assistants and their tool backends.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConciergeConfig {
    /// Model selector, `provider:model_id`.
    pub model: String,
    pub ollama_base_url: String,
    pub openai_compatible_base_url: Option<String>,
    pub openai_compatible_api_key: Option<String>,
    pub tavily_api_key: Option<String>,
    pub tavily_base_url: String,
    /// Streamable-HTTP endpoint of the MCP server exposing `search_flights`.
    pub flights_mcp_url: String,
    /// SQLite music database used for playlists. Opened read-only.
    pub playlist_db_path: PathBuf,
    /// Per-delegation timeout. Unset means wait indefinitely.
    pub delegation_timeout_secs: Option<u64>,
    pub max_tool_iterations: usize,
}

impl Default for ConciergeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            ollama_base_url: DEFAULT_OLLAMA_BASE_URL.to_string(),
            openai_compatible_base_url: None,
            openai_compatible_api_key: None,
            tavily_api_key: None,
            tavily_base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
            flights_mcp_url: DEFAULT_FLIGHTS_MCP_URL.to_string(),
            playlist_db_path: PathBuf::from(DEFAULT_PLAYLIST_DB_PATH),
            delegation_timeout_secs: None,
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
        }
    }
}

impl fmt::Debug for ConciergeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("ConciergeConfig")
            .field("model", &self.model)
            .field("ollama_base_url", &self.ollama_base_url)
            .field("openai_compatible_base_url", &self.openai_compatible_base_url)
            .field(
                "openai_compatible_api_key",
                &redact(&self.openai_compatible_api_key),
            )
            .field("tavily_api_key", &redact(&self.tavily_api_key))
            .field("tavily_base_url", &self.tavily_base_url)
            .field("flights_mcp_url", &self.flights_mcp_url)
            .field("playlist_db_path", &self.playlist_db_path)
            .field("delegation_timeout_secs", &self.delegation_timeout_secs)
            .field("max_tool_iterations", &self.max_tool_iterations)
            .finish()
    }
}

impl ConciergeConfig {
    /// Load the full layered configuration.
    ///
    /// Reads `.env` if present, then the TOML file (`path`, or the platform
    /// default location when it exists), then environment overrides.
    /// An explicit `path` that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConciergeError> {
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    /// Defaults plus environment overrides (and `.env`), no config file.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConciergeError> {
        toml::from_str(raw)
            .map_err(|e| ConciergeError::Configuration(format!("invalid config file: {e}")))
    }

    /// Read and parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConciergeError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ConciergeError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Platform config file location, e.g. `~/.config/concierge/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "concierge")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    ///
    /// Empty values are ignored. Unparseable numbers are logged and skipped.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("CONCIERGE_MODEL") {
            self.model = v;
        }
        if let Some(v) = get("OLLAMA_BASE_URL") {
            self.ollama_base_url = v;
        }
        if let Some(v) = get("OPENAI_COMPAT_BASE_URL") {
            self.openai_compatible_base_url = Some(v);
        }
        if let Some(v) = get("OPENAI_COMPAT_API_KEY") {
            self.openai_compatible_api_key = Some(v);
        }
        if let Some(v) = get("TAVILY_API_KEY") {
            self.tavily_api_key = Some(v);
        }
        if let Some(v) = get("TAVILY_BASE_URL") {
            self.tavily_base_url = v;
        }
        if let Some(v) = get("FLIGHTS_MCP_URL") {
            self.flights_mcp_url = v;
        }
        if let Some(v) = get("PLAYLIST_DB_PATH") {
            self.playlist_db_path = PathBuf::from(v);
        }
        if let Some(v) = get("CONCIERGE_DELEGATION_TIMEOUT_SECS") {
            match v.trim().parse() {
                Ok(secs) => self.delegation_timeout_secs = Some(secs),
                Err(_) => tracing::warn!(value = %v, "ignoring invalid CONCIERGE_DELEGATION_TIMEOUT_SECS"),
            }
        }
        if let Some(v) = get("CONCIERGE_MAX_TOOL_ITERATIONS") {
            match v.trim().parse() {
                Ok(n) => self.max_tool_iterations = n,
                Err(_) => tracing::warn!(value = %v, "ignoring invalid CONCIERGE_MAX_TOOL_ITERATIONS"),
            }
        }
    }

    /// Parse the configured model selector.
    pub fn language_model(&self) -> Result<LanguageModel, ConciergeError> {
        self.model.parse()
    }

    /// Per-delegation timeout, if configured.
    pub fn delegation_timeout(&self) -> Option<Duration> {
        self.delegation_timeout_secs.map(Duration::from_secs)
    }

    /// Tavily key, or a configuration error naming the variable to set.
    pub fn require_tavily_api_key(&self) -> Result<&str, ConciergeError> {
        self.tavily_api_key
            .as_deref()
            .ok_or_else(|| ConciergeError::Authentication("Missing TAVILY_API_KEY".into()))
    }
}
