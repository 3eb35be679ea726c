//! Game lifecycle notifications handed to a pluggable sink.
//!
//! The hub reports what happened and moves on; delivery, buffering, and any
//! fan-out to external systems are the sink's problem. The default sink just
//! writes structured log lines.

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

/// Seconds since the Unix epoch, stamped at emission time.
pub fn now_ts() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

#[derive(Debug, Clone)]
pub struct GameStarted {
    pub game_id: Uuid,
    pub timestamp: i64,
    pub player1: String,
    pub player2: String,
    pub is_bot: bool,
}

#[derive(Debug, Clone)]
pub struct MovePlayed {
    pub game_id: Uuid,
    pub timestamp: i64,
    pub player: u8,
    pub column: usize,
    pub row: usize,
}

#[derive(Debug, Clone)]
pub struct GameEnded {
    pub game_id: Uuid,
    pub timestamp: i64,
    /// Empty string on a draw.
    pub winner: String,
    pub is_draw: bool,
    pub duration_secs: i64,
    pub moves: usize,
}

/// Receives lifecycle events from the hub. Implementations must not block;
/// the hub calls these inline from its message loop.
pub trait EventSink: Send + Sync {
    fn game_started(&self, event: GameStarted);
    fn move_played(&self, event: MovePlayed);
    fn game_ended(&self, event: GameEnded);
}

/// Sink that emits each event as a structured log line.
pub struct LogSink;

impl EventSink for LogSink {
    fn game_started(&self, event: GameStarted) {
        info!(
            game_id = %event.game_id,
            player1 = %event.player1,
            player2 = %event.player2,
            is_bot = event.is_bot,
            "[EVENT] game_started"
        );
    }

    fn move_played(&self, event: MovePlayed) {
        info!(
            game_id = %event.game_id,
            player = event.player,
            column = event.column,
            row = event.row,
            "[EVENT] move_played"
        );
    }

    fn game_ended(&self, event: GameEnded) {
        info!(
            game_id = %event.game_id,
            winner = %event.winner,
            is_draw = event.is_draw,
            duration_secs = event.duration_secs,
            moves = event.moves,
            "[EVENT] game_ended"
        );
    }
}
