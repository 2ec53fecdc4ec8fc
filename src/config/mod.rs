mod file_config;

pub use file_config::{FileConfig, LookupConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use reqwest::Url;
use std::path::{Path, PathBuf};

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub lookup_url: Option<String>,
    pub lookup_timeout_sec: u64,
    pub request_timeout_sec: u64,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            port: 3000,
            logging_level: RequestsLoggingLevel::default(),
            lookup_url: None,
            lookup_timeout_sec: 10,
            request_timeout_sec: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub lookup_url: String,
    pub lookup_timeout_sec: u64,
    pub request_timeout_sec: u64,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();
        let lookup = file.lookup.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| anyhow!("db_path must be specified via --db-path or in config file"))?;
        validate_db_path(&db_path)?;

        let lookup_url = lookup
            .url
            .or_else(|| cli.lookup_url.clone())
            .ok_or_else(|| {
                anyhow!("lookup url must be specified via --lookup-url or in config file")
            })?;
        Url::parse(&lookup_url).with_context(|| format!("Invalid lookup url: {}", lookup_url))?;

        let port = file.port.unwrap_or(cli.port);

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let lookup_timeout_sec = lookup.timeout_sec.unwrap_or(cli.lookup_timeout_sec);
        let request_timeout_sec = file.request_timeout_sec.unwrap_or(cli.request_timeout_sec);
        if lookup_timeout_sec == 0 || request_timeout_sec == 0 {
            bail!("Timeouts must be at least one second");
        }

        Ok(Self {
            db_path,
            port,
            logging_level,
            lookup_url,
            lookup_timeout_sec,
            request_timeout_sec,
        })
    }
}

fn validate_db_path(db_path: &Path) -> Result<()> {
    if db_path.is_dir() {
        bail!("db_path is a directory: {:?}", db_path);
    }
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            bail!("Database directory does not exist: {:?}", parent)
        }
        _ => Ok(()),
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
