#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod ai;
pub mod archive;
pub mod config;
pub mod domain;
pub mod error;
pub mod events;
pub mod health;
pub mod matchmaking;
pub mod routes;
pub mod state;
pub mod ws;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use ai::{MinimaxBot, MovePlanner};
pub use archive::{CompletedGame, GameArchive, LogArchive};
pub use config::Settings;
pub use domain::{Board, MoveError, Outcome, Player};
pub use error::AppError;
pub use events::{EventSink, LogSink};
pub use state::app_state::AppState;
pub use ws::hub::GameHub;
pub use ws::session::WsSession;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
