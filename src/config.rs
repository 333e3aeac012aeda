use std::fmt;
use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use clap::{Parser, ValueEnum};
use std::fs;
use tracing::{info, warn};
use toml;

/// Port the server listens on unless configured otherwise
pub const DEFAULT_PORT: u16 = 8080;

/// How log lines are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain text for terminals
    #[default]
    Human,
    /// One JSON object per line
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Human => f.write_str("human"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Configuration for the ShareIt server and CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// Address the server binds to
    pub host: String,
    /// Port the server listens on
    pub port: u16,
    /// Directory for daily-rolling log files; stdout only when unset
    pub log_dir: Option<PathBuf>,
    /// Rendering of log lines
    pub log_format: LogFormat,
    /// Base URL the CLI sends requests to
    pub server_url: Option<String>,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub log_format: Option<LogFormat>,
    #[serde(default)]
    pub server_url: Option<String>,
}

/// Command line arguments for the server
#[derive(Parser, Debug)]
#[clap(name = "shareit", about = "A peer-to-peer item rental service")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Address to bind to
    #[clap(long, env = "SHAREIT_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[clap(long, env = "SHAREIT_PORT")]
    pub port: Option<u16>,

    /// Directory to write daily log files to
    #[clap(long, env = "SHAREIT_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log output format
    #[clap(long, env = "SHAREIT_LOG_FORMAT", value_enum)]
    pub log_format: Option<LogFormat>,

    /// Debug mode
    #[clap(long, env = "SHAREIT_DEBUG", default_value_t = false)]
    pub debug: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            host: update.host.unwrap_or(self.host),
            port: update.port.unwrap_or(self.port),
            log_dir: update.log_dir.or(self.log_dir),
            log_format: update.log_format.unwrap_or(self.log_format),
            server_url: update.server_url.or(self.server_url),
        }
    }

    /// The `host:port` pair the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The URL the CLI should talk to
    ///
    /// Falls back to the local server on the configured port.
    pub fn client_url(&self) -> String {
        self.server_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }
}

/// Returns the base (default) configuration
///
/// With a config directory the database lives inside it; otherwise it is
/// created in the working directory.
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let database_url = config_path.map_or("shareit.db".to_string(), |path| path.join("shareit.db").to_string_lossy().to_string());

    Config {
        database_url,
        host: "127.0.0.1".to_string(),
        port: DEFAULT_PORT,
        log_dir: None,
        log_format: LogFormat::Human,
        server_url: None,
    }
}

/// Loads configuration from a TOML file
///
/// A missing path or file yields an empty update.
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            },
            Err(e) => Err(format!("Failed to parse config file: {}", e)),
        },
        Err(e) => Err(format!("Failed to read config file: {}", e)),
    }
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        host: args.host,
        port: args.port,
        log_dir: args.log_dir,
        log_format: args.log_format,
        server_url: None,
    }
}

/// Returns the platform config directory, if it exists
pub fn get_config_dir_path() -> Option<PathBuf> {
    let config_dir = match ProjectDirs::from("com", "shareit", "shareit") {
        Some(proj_dirs) => PathBuf::from(proj_dirs.config_dir()),
        None => {
            warn!("Could not determine XDG config directory, skipping config file");
            return None;
        }
    };

    if !config_dir.exists() {
        info!("Config path not found at {:?}, using defaults", config_dir);
        return None;
    }

    Some(config_dir)
}

/// Combines the defaults with the config file found in `config_dir`
///
/// ### Errors
///
/// Returns an error if `config.toml` exists but cannot be read or parsed.
pub fn file_config(config_dir: Option<PathBuf>) -> Result<Config, String> {
    let file_path = config_dir.as_ref().map(|dir| dir.join("config.toml"));
    let file_update = config_from_file(file_path.clone())
        .map_err(|e| format!("{} ({})", e, file_path.unwrap_or_default().display()))?;
    Ok(base_config(config_dir).apply_update(file_update))
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
///
/// Called before logging is set up.
pub fn get_config(args: CliArgs) -> Result<Config, String> {
    Ok(file_config(get_config_dir_path())?.apply_update(config_from_args(args)))
}

#[cfg(test)]
mod prop_tests;
