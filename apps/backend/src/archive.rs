//! Durable record of finished games.
//!
//! The hub hands a [`CompletedGame`] to the archive exactly once per game,
//! at teardown. A storage-backed implementation should treat the game id as
//! the dedupe key so a redelivered record is a no-op.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::domain::board::{MoveRecord, Player};
use crate::domain::game::Game;

#[derive(Debug, Clone, Serialize)]
pub struct CompletedGame {
    pub id: Uuid,
    pub player1: String,
    pub player2: String,
    /// Empty string on a draw.
    pub winner: String,
    pub is_draw: bool,
    pub is_bot: bool,
    pub moves: Vec<MoveRecord>,
    pub duration_secs: i64,
    pub completed_at: i64,
}

impl CompletedGame {
    pub fn from_game(game: &Game, winner: &str, is_draw: bool) -> Self {
        Self {
            id: game.id,
            player1: game.player_name(Player::One).to_string(),
            player2: game.player_name(Player::Two).to_string(),
            winner: winner.to_string(),
            is_draw,
            is_bot: game.is_bot,
            moves: game.board.moves().to_vec(),
            duration_secs: game
                .duration()
                .map(|d| d.whole_seconds())
                .unwrap_or_default(),
            completed_at: game
                .ended_at
                .map(|end| end.unix_timestamp())
                .unwrap_or_default(),
        }
    }
}

pub trait GameArchive: Send + Sync {
    fn save(&self, game: &CompletedGame);
}

/// Archive that logs the record instead of persisting it.
pub struct LogArchive;

impl GameArchive for LogArchive {
    fn save(&self, game: &CompletedGame) {
        info!(
            game_id = %game.id,
            player1 = %game.player1,
            player2 = %game.player2,
            winner = %game.winner,
            is_draw = game.is_draw,
            moves = game.moves.len(),
            duration_secs = game.duration_secs,
            "[ARCHIVE] game saved"
        );
    }
}
