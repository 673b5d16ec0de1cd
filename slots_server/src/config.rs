//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::{net::SocketAddr, path::PathBuf, str::FromStr};
use vegas_slots::{BetLimits, GameSettings, db::DatabaseConfig, game::MAX_STARTING_BALANCE};

const DEFAULT_DATABASE_URL: &str = "postgres://postgres@localhost/slot_machine_db";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Where users and spins are kept
    pub storage: StorageKind,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Security configuration
    pub security: SecurityConfig,
    /// Game defaults configuration
    pub game: GameConfig,
    /// Directory holding `index.html` and static assets
    pub static_dir: PathBuf,
    /// Prometheus listener, disabled when unset
    pub metrics_bind: Option<SocketAddr>,
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    Memory,
}

impl StorageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKind::Postgres => "postgres",
            StorageKind::Memory => "memory",
        }
    }
}

impl FromStr for StorageKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageKind::Postgres),
            "memory" => Ok(StorageKind::Memory),
            other => Err(ConfigError::Invalid {
                var: "SLOTS_STORAGE".to_string(),
                reason: format!("Unknown storage '{other}', expected postgres or memory"),
            }),
        }
    }
}

/// Security-related configuration
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Password hashing pepper (required)
    pub password_pepper: String,
    /// Session token lifetime in hours
    pub session_ttl_hours: i64,
}

/// Game defaults configuration
#[derive(Debug, Clone, Copy)]
pub struct GameConfig {
    /// Balance of a fresh or reset game
    pub starting_balance: i64,
    /// Bet used when a spin request names none
    pub default_bet: i64,
    /// Smallest accepted bet
    pub min_bet: i64,
    /// Largest accepted bet, unlimited when unset
    pub max_bet: Option<i64>,
}

impl GameConfig {
    /// Settings handed to the game store
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            starting_balance: self.starting_balance,
            limits: BetLimits {
                min_bet: self.min_bet,
                max_bet: self.max_bet,
            },
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: 100,
            default_bet: 5,
            min_bet: 1,
            max_bet: None,
        }
    }
}

/// Values given on the command line, taking precedence over the environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind: Option<SocketAddr>,
    pub database_url: Option<String>,
    pub in_memory: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `overrides` - Values from CLI args
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(overrides: CliOverrides) -> Result<Self, ConfigError> {
        let bind = match overrides.bind {
            Some(bind) => bind,
            None => parse_env_or("SERVER_BIND", default_bind()),
        };

        let storage = if overrides.in_memory {
            StorageKind::Memory
        } else {
            match std::env::var("SLOTS_STORAGE") {
                Ok(value) => value.parse()?,
                Err(_) => StorageKind::Postgres,
            }
        };

        let database_url = overrides
            .database_url
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let database = DatabaseConfig::from_env(database_url);

        let password_pepper =
            std::env::var("PASSWORD_PEPPER").map_err(|_| ConfigError::MissingRequired {
                var: "PASSWORD_PEPPER".to_string(),
                hint: "Generate with: openssl rand -hex 16".to_string(),
            })?;

        let security = SecurityConfig {
            password_pepper,
            session_ttl_hours: parse_env_or("SESSION_TTL_HOURS", 24),
        };

        let defaults = GameConfig::default();
        let game = GameConfig {
            starting_balance: parse_env_or("STARTING_BALANCE", defaults.starting_balance),
            default_bet: parse_env_or("DEFAULT_BET", defaults.default_bet),
            min_bet: parse_env_or("MIN_BET", defaults.min_bet),
            max_bet: parse_env_opt("MAX_BET")?,
        };

        let static_dir = std::env::var("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("static"));

        let metrics_bind = parse_env_opt("METRICS_BIND")?;

        Ok(ServerConfig {
            bind,
            storage,
            database,
            security,
            game,
            static_dir,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.password_pepper.len() < 16 {
            return Err(ConfigError::Invalid {
                var: "PASSWORD_PEPPER".to_string(),
                reason: "Must be at least 16 characters (64-bit security)".to_string(),
            });
        }

        if self.security.session_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                var: "SESSION_TTL_HOURS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.game.starting_balance <= 0 {
            return Err(ConfigError::Invalid {
                var: "STARTING_BALANCE".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.game.starting_balance > MAX_STARTING_BALANCE {
            return Err(ConfigError::Invalid {
                var: "STARTING_BALANCE".to_string(),
                reason: format!("Must be at most {MAX_STARTING_BALANCE}"),
            });
        }

        if self.game.min_bet <= 0 {
            return Err(ConfigError::Invalid {
                var: "MIN_BET".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.game.max_bet.is_some_and(|max| max < self.game.min_bet) {
            return Err(ConfigError::Invalid {
                var: "MAX_BET".to_string(),
                reason: format!("Must be at least the minimum bet ({})", self.game.min_bet),
            });
        }

        if !self.game.settings().limits.allows(self.game.default_bet) {
            return Err(ConfigError::Invalid {
                var: "DEFAULT_BET".to_string(),
                reason: "Must lie within MIN_BET and MAX_BET".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Optional environment variable that must parse when present
fn parse_env_opt<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
{
    match std::env::var(key) {
        Ok(value) => value.parse().map(Some).map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("Cannot parse '{value}'"),
        }),
        Err(_) => Ok(None),
    }
}
