//! Configuration module for the reload supervisor.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `APPRELOAD_` and use double
//! underscores to separate nested levels:
//! - `APPRELOAD_SERVER__BIND=0.0.0.0:8080` sets `server.bind`
//! - `APPRELOAD_FILE_WATCH__DEBOUNCE_MS=250` sets `file_watch.debounce_ms`
//! - `APPRELOAD_ENGINE__ROOT=fs:///opt/engine` sets `engine.root`

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::reload::Domain;

/// Directory holding the settings file, searched upward from the cwd.
pub const CONFIG_DIR: &str = ".appreload";
const ENV_PREFIX: &str = "APPRELOAD_";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Application root; user watch roots are resolved against it
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Engine built-in resources
    #[serde(default)]
    pub engine: EngineConfig,

    /// User application roots, one per domain
    #[serde(default)]
    pub paths: PathsConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// File watching settings
    #[serde(default)]
    pub file_watch: FileWatchConfig,

    /// Log levels
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    /// Engine root. Either a plain path, an `fs://` path, or a remote URI
    /// (remote roots are never watched).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    /// Prefix prepended to every engine resource name
    #[serde(default = "default_engine_prefix")]
    pub prefix: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PathsConfig {
    #[serde(default = "default_models")]
    pub models: PathBuf,
    #[serde(default = "default_apis")]
    pub apis: PathBuf,
    #[serde(default = "default_flows")]
    pub flows: PathBuf,
    #[serde(default = "default_plugins")]
    pub plugins: PathBuf,
    #[serde(default = "default_tables")]
    pub tables: PathBuf,
    #[serde(default = "default_charts")]
    pub charts: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FileWatchConfig {
    /// Watch roots after startup
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Quiet period before a write is reloaded
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default level for all targets
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-target overrides, e.g. `appreload::reload = "debug"`
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

// Default value functions
fn default_version() -> u32 { 1 }
fn default_root() -> PathBuf { PathBuf::from(".") }
fn default_engine_prefix() -> String { "xiang.".to_string() }
fn default_models() -> PathBuf { PathBuf::from("models") }
fn default_apis() -> PathBuf { PathBuf::from("apis") }
fn default_flows() -> PathBuf { PathBuf::from("flows") }
fn default_plugins() -> PathBuf { PathBuf::from("plugins") }
fn default_tables() -> PathBuf { PathBuf::from("tables") }
fn default_charts() -> PathBuf { PathBuf::from("charts") }
fn default_bind() -> String { "127.0.0.1:5099".to_string() }
fn default_true() -> bool { true }
fn default_debounce_ms() -> u64 { 100 }
fn default_log_level() -> String { "info".to_string() }

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            root: default_root(),
            engine: EngineConfig::default(),
            paths: PathsConfig::default(),
            server: ServerConfig::default(),
            file_watch: FileWatchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root: None,
            prefix: default_engine_prefix(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            models: default_models(),
            apis: default_apis(),
            flows: default_flows(),
            plugins: default_plugins(),
            tables: default_tables(),
            charts: default_charts(),
        }
    }
}

impl PathsConfig {
    /// Configured root for a domain, relative to the application root.
    pub fn for_domain(&self, domain: Domain) -> &Path {
        match domain {
            Domain::Model => &self.models,
            Domain::Api => &self.apis,
            Domain::Flow => &self.flows,
            Domain::Plugin => &self.plugins,
            Domain::Table => &self.tables,
            Domain::Chart => &self.charts,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

impl Default for FileWatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: default_debounce_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load configuration from all sources
    pub fn load() -> Result<Self, Box<figment::Error>> {
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        let mut settings = Self::load_from(&config_path)?;

        // A relative root is relative to the directory holding .appreload
        if settings.root.is_relative() {
            if let Some(workspace) = Self::workspace_root() {
                settings.root = workspace.join(&settings.root);
            }
        }
        Ok(settings)
    }

    /// Load configuration from a specific file, layering env vars on top
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            // Double underscore becomes a dot, single underscore stays in the field name
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str().to_lowercase().replace("__", ".").into()
            }))
            .extract()
            .map_err(Box::new)
    }

    /// Find the settings file by looking for the config directory.
    /// Searches from current directory up to root.
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join("settings.toml"))
    }

    /// Get the workspace root directory (where .appreload is located)
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// User watch root for a domain.
    pub fn domain_root(&self, domain: Domain) -> PathBuf {
        self.root.join(self.paths.for_domain(domain))
    }

    /// Save current configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn std::error::Error>> {
        let parent = path.as_ref().parent().ok_or("Invalid path")?;
        std::fs::create_dir_all(parent)?;

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;

        Ok(())
    }

    /// Create a default settings file in the current directory
    pub fn init_config_file(force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_path = PathBuf::from(CONFIG_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err("Configuration file already exists. Use --force to overwrite".into());
        }

        Settings::default().save(&config_path)?;
        Ok(config_path)
    }
}
