//! One match between two identities, human or bot.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::board::{Board, Outcome, Player};

/// Display name reserved for the bot opponent.
pub const BOT_NAME: &str = "Bot";

/// A player slot: the identity occupying one side of the board.
///
/// `session_id` is the currently-bound transport session and is rebound on
/// reconnect; `name` is the stable identity used for reconnect lookups.
#[derive(Debug, Clone)]
pub struct Seat {
    pub session_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Game {
    pub id: Uuid,
    pub board: Board,
    players: [Seat; 2],
    pub is_bot: bool,
    pub started_at: OffsetDateTime,
    pub ended_at: Option<OffsetDateTime>,
}

impl Game {
    pub fn new(id: Uuid, player1: Seat, player2: Seat, is_bot: bool) -> Self {
        Self {
            id,
            board: Board::new(),
            players: [player1, player2],
            is_bot,
            started_at: OffsetDateTime::now_utc(),
            ended_at: None,
        }
    }

    pub fn seat(&self, player: Player) -> &Seat {
        match player {
            Player::One => &self.players[0],
            Player::Two => &self.players[1],
        }
    }

    pub fn seat_of_session(&self, session_id: Uuid) -> Option<Player> {
        if self.players[0].session_id == session_id {
            Some(Player::One)
        } else if self.players[1].session_id == session_id {
            Some(Player::Two)
        } else {
            None
        }
    }

    pub fn seat_of_name(&self, name: &str) -> Option<Player> {
        if self.players[0].name == name {
            Some(Player::One)
        } else if self.players[1].name == name {
            Some(Player::Two)
        } else {
            None
        }
    }

    /// Rebinds a seat to a new transport session (reconnect).
    pub fn rebind_session(&mut self, player: Player, session_id: Uuid) {
        match player {
            Player::One => self.players[0].session_id = session_id,
            Player::Two => self.players[1].session_id = session_id,
        }
    }

    pub fn player_name(&self, player: Player) -> &str {
        &self.seat(player).name
    }

    pub fn opponent_name(&self, player: Player) -> &str {
        self.player_name(player.other())
    }

    pub fn is_over(&self) -> bool {
        self.board.is_over()
    }

    /// Winner's display name, `None` for a draw or an unfinished game.
    pub fn winner_name(&self) -> Option<&str> {
        match self.board.outcome() {
            Some(Outcome::Win(player)) => Some(self.player_name(player)),
            _ => None,
        }
    }

    /// Stamps the end time; idempotent.
    pub fn finish(&mut self) {
        if self.ended_at.is_none() {
            self.ended_at = Some(OffsetDateTime::now_utc());
        }
    }

    /// Wall-clock match length, once finished.
    pub fn duration(&self) -> Option<time::Duration> {
        self.ended_at.map(|end| end - self.started_at)
    }
}
