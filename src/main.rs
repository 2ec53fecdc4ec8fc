use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use song_library_server::config;
use song_library_server::server::{run_server, RequestsLoggingLevel, ServerConfig};
use song_library_server::song_service::{HttpSongDetailsLookup, SongService};
use song_library_server::song_store::{SongStore, SqliteSongStore};

const READ_POOL_SIZE: usize = 4;

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite song database file, created if missing.
    /// Can also be specified in config file.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// URL of the song details lookup endpoint (e.g. http://localhost:8081/info).
    #[clap(long)]
    pub lookup_url: Option<String>,

    /// Timeout in seconds for lookup service requests.
    #[clap(long, default_value_t = 10)]
    pub lookup_timeout_sec: u64,

    /// Time budget in seconds of a single request.
    #[clap(long, default_value_t = 10)]
    pub request_timeout_sec: u64,
}

/// Convert CLI args to CliConfig for config resolution
impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_path: args.db_path.clone(),
            port: args.port,
            logging_level: args.logging_level.clone(),
            lookup_url: args.lookup_url.clone(),
            lookup_timeout_sec: args.lookup_timeout_sec,
            request_timeout_sec: args.request_timeout_sec,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_path: {:?}", app_config.db_path);
    info!("  port: {}", app_config.port);
    info!("  lookup_url: {}", app_config.lookup_url);

    if !app_config.db_path.exists() {
        info!("Creating new song database at {:?}", app_config.db_path);
    }
    let song_store = Arc::new(SqliteSongStore::new(&app_config.db_path, READ_POOL_SIZE)?);
    info!("Song library holds {} songs", song_store.count_songs()?);

    let lookup = Arc::new(HttpSongDetailsLookup::new(
        app_config.lookup_url.clone(),
        app_config.lookup_timeout_sec,
    )?);
    let song_service = Arc::new(SongService::new(song_store, lookup));

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level,
        port: app_config.port,
        request_timeout_sec: app_config.request_timeout_sec,
    };

    info!("Ready to serve at port {}!", app_config.port);
    run_server(server_config, song_service).await
}
