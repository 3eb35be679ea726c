use std::env;
use std::time::Duration;

use crate::error::AppError;

/// Tunable server settings, sourced from environment variables.
///
/// Environment variables must be set by the runtime environment (Docker
/// env_file, or sourced manually for local dev). Every knob has a default so
/// a bare `cargo run` works.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Bind address for the HTTP server.
    pub host: String,
    /// Bind port for the HTTP server.
    pub port: u16,
    /// How long a lone player waits in the matchmaking queue before a bot
    /// opponent is assigned.
    pub match_timeout: Duration,
    /// Grace period a mid-game player has to reconnect after a transport
    /// drop before the game is forfeited.
    pub disconnect_grace: Duration,
    /// Artificial pacing delay before the bot answers a human move.
    pub bot_move_delay: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            host: host(),
            port: port()?,
            match_timeout: secs_var("MATCH_TIMEOUT_SECS", 10)?,
            disconnect_grace: secs_var("DISCONNECT_GRACE_SECS", 30)?,
            bot_move_delay: millis_var("BOT_MOVE_DELAY_MS", 500)?,
        })
    }
}

fn host() -> String {
    env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string())
}

fn port() -> Result<u16, AppError> {
    match env::var("BACKEND_PORT") {
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|_| AppError::config(format!("BACKEND_PORT must be a port number, got '{raw}'"))),
        Err(_) => Ok(8080),
    }
}

fn secs_var(key: &str, default: u64) -> Result<Duration, AppError> {
    u64_var(key, default).map(Duration::from_secs)
}

fn millis_var(key: &str, default: u64) -> Result<Duration, AppError> {
    u64_var(key, default).map(Duration::from_millis)
}

fn u64_var(key: &str, default: u64) -> Result<u64, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map_err(|_| AppError::config(format!("{key} must be a non-negative integer, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}
