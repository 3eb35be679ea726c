//! Wire messages exchanged with game clients.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::BoardCells;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    /// Claim a display name and enter matchmaking (or resume a live game
    /// registered under that name).
    Join { username: String },
    /// Drop a disc in `column` of the caller's current game.
    Move { column: usize },
    /// Resume a specific game after a transport drop.
    Reconnect { username: String, game_id: Uuid },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    Waiting {
        message: String,
    },

    GameStart {
        game_id: Uuid,
        opponent: String,
        your_turn: bool,
        is_bot: bool,
        /// Seat number of the recipient: 1 or 2. Player 1 always moves first.
        player: u8,
    },

    GameReconnected {
        game_id: Uuid,
        board: BoardCells,
        opponent: String,
        your_turn: bool,
        player: u8,
        is_bot: bool,
    },

    Move {
        game_id: Uuid,
        column: usize,
        row: usize,
        player: u8,
        board: BoardCells,
    },

    GameEnd {
        game_id: Uuid,
        /// Winner's display name; empty for a draw.
        winner: String,
        /// "connect4", "draw", or "abandoned".
        reason: String,
    },

    Error {
        message: String,
    },
}
