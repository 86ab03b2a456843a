//! Hangman game server.
//!
//! Serves the game API over HTTP. Games live in PostgreSQL when a database
//! URL is configured and in memory otherwise.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Error};
use hangman::{
    GameService, WordList,
    db::{Database, GameRepository, InMemoryGameRepository},
};
use hm_server::{
    api::{self, AppState},
    config::ServerConfig,
    logging, metrics,
};
use pico_args::Arguments;
use tracing::{info, warn};

const HELP: &str = "\
Run a hangman game server

USAGE:
  hm_server [OPTIONS]

OPTIONS:
  --bind        IP:PORT    Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8080]
  --db-url      URL        Database connection string  [default: env DATABASE_URL, in-memory if unset]
  --words-file  PATH       Word list, one word per line [default: env WORDS_FILE or built-in list]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND                  Server bind address (e.g., 0.0.0.0:8080)
  DATABASE_URL                 PostgreSQL connection string
  GAME_DEFAULT_MAX_ATTEMPTS    Attempts when the client does not choose [default: 6]
  GAME_MAX_ALLOWED_ATTEMPTS    Largest attempt limit a client may choose [default: 26]
  WORD_SEED                    Seed for reproducible word picks
  METRICS_BIND                 Prometheus exporter address (e.g., 0.0.0.0:9090)
  CORS_ALLOWED_ORIGINS         Comma-separated origins, * for any
  (See .env file for all configuration options)
";

struct Args {
    bind: Option<SocketAddr>,
    database_url: Option<String>,
    words_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        words_file: pargs.opt_value_from_str("--words-file")?,
    };
    let remaining = pargs.finish();

    let config = ServerConfig::from_env(args.bind, args.database_url, args.words_file)?;
    config.validate()?;

    logging::init();
    if !remaining.is_empty() {
        warn!("Ignoring unrecognized arguments: {:?}", remaining);
    }
    info!("Starting hangman server at {}", config.bind);

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(anyhow::Error::msg)?;
        info!("Prometheus metrics available at http://{}/metrics", addr);
    }

    let mut database = None;
    let repository: Arc<dyn GameRepository> = match &config.database {
        Some(db_config) => {
            info!("Connecting to database");
            let db = Database::new(db_config)
                .await
                .context("Failed to connect to database")?;
            let repository = db.game_repository();
            repository
                .ensure_schema()
                .await
                .context("Failed to create games table")?;
            info!("Database connected successfully");
            database = Some(db);
            Arc::new(repository)
        }
        None => {
            warn!("DATABASE_URL not set, games are kept in memory only");
            Arc::new(InMemoryGameRepository::new())
        }
    };

    let words = match &config.game.words_file {
        Some(path) => WordList::from_file(path)
            .with_context(|| format!("Failed to load word list from {}", path.display()))?,
        None => WordList::default(),
    };
    let words = match config.game.word_seed {
        Some(seed) => words.with_seed(seed),
        None => words,
    };
    info!("Word list ready with {} word(s)", words.len());

    let settings = config.game.settings();
    info!(
        "Games default to {} attempts (clients may choose up to {})",
        settings.default_max_attempts, settings.max_allowed_attempts
    );

    let state = AppState {
        game_service: Arc::new(GameService::new(repository, Arc::new(words), settings)),
    };
    let app = api::create_router(state, api::cors_layer(&config));

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    if let Some(db) = database {
        db.close().await;
        info!("Database connections closed");
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
}
