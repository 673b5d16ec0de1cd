//! Vegas slot machine HTTP server.
//!
//! Serves the game API over PostgreSQL-backed or in-memory storage, plus the
//! browser front end from the static directory.

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Error};
use pico_args::Arguments;
use slots_server::{
    api,
    config::{CliOverrides, ServerConfig, StorageKind},
    logging, metrics,
};
use tracing::info;
use vegas_slots::{
    GameStore,
    auth::AuthManager,
    db::{Database, MemoryRepository, PgSpinRepository, PgUserRepository, SpinRepository, UserRepository},
};

const HELP: &str = "\
Run the Vegas slot machine server

USAGE:
  slots_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:8000]
  --db-url     URL         Database connection string  [default: env DATABASE_URL or postgres://postgres@localhost/slot_machine_db]

FLAGS:
  --in-memory              Keep users and spins in memory instead of PostgreSQL
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8000)
  SLOTS_STORAGE            postgres or memory
  DATABASE_URL             PostgreSQL connection string
  PASSWORD_PEPPER          Password hashing pepper (required, 16+ characters)
  SESSION_TTL_HOURS        Session lifetime in hours
  STARTING_BALANCE         Balance of a new game
  DEFAULT_BET              Bet used when a spin names none
  MIN_BET, MAX_BET         Accepted bet range
  STATIC_DIR               Directory holding index.html
  METRICS_BIND             Prometheus listener address
  (See .env file for all configuration options)
";

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

    let overrides = CliOverrides {
        in_memory: pargs.contains("--in-memory"),
        bind: pargs.opt_value_from_str::<_, SocketAddr>("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
    };

    let config = ServerConfig::from_env(overrides)?;
    config.validate()?;

    logging::init();
    info!("Starting slot machine server at {}", config.bind);

    if let Some(addr) = config.metrics_bind {
        metrics::init_metrics(addr).map_err(|e| anyhow::anyhow!(e))?;
        info!("Prometheus metrics listening on {}", addr);
    }

    let (users, spins, database): (Arc<dyn UserRepository>, Arc<dyn SpinRepository>, _) =
        match config.storage {
            StorageKind::Postgres => {
                info!("Connecting to database");
                let db = Database::new(&config.database)
                    .await
                    .context("Failed to connect to database")?;
                db.migrate().await.context("Failed to run migrations")?;
                info!("Database connected and migrated");

                let pool = db.pool().clone();
                (
                    Arc::new(PgUserRepository::new(pool.clone())),
                    Arc::new(PgSpinRepository::new(pool)),
                    Some(db),
                )
            }
            StorageKind::Memory => {
                info!("Using in-memory storage; nothing survives a restart");
                let repo = Arc::new(MemoryRepository::new());
                (repo.clone(), repo, None)
            }
        };

    let auth_manager = Arc::new(
        AuthManager::new(users, config.security.password_pepper.clone())
            .with_session_duration(chrono::Duration::hours(config.security.session_ttl_hours)),
    );
    let games = Arc::new(GameStore::new(config.game.settings()));

    let api_state = api::AppState {
        auth_manager: auth_manager.clone(),
        games: games.clone(),
        spins,
        database: database.clone(),
        default_bet: config.game.default_bet,
    };

    let app = api::with_static_files(api::create_router(api_state), &config.static_dir);

    // Expired sessions are only dropped lazily on lookup otherwise. Games of
    // users left without a session go with them.
    let sweeper = tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(600));
        loop {
            interval.tick().await;
            let released = api::auth::release_expired_sessions(&auth_manager, &games).await;
            if released > 0 {
                info!(released, "Released games of expired sessions");
            }
            metrics::active_sessions(auth_manager.active_sessions().await);
            metrics::active_games(games.active_games().await);
        }
    });

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{} ({} storage). Press Ctrl+C to stop.",
        config.bind,
        config.storage.as_str()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    sweeper.abort();
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
    }
}
