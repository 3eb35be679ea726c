//! Pure board state machine: grid, gravity, win/draw detection.
//!
//! No I/O and no concurrency live here. The hub owns the authoritative
//! instance; the search agent only ever works on clones.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;
/// Run length required to win.
pub const CONNECT: usize = 4;
/// Fallback column for the search agent; also the most valuable column.
pub const CENTER_COL: usize = 3;

/// Wire form of the grid: 0 = empty, 1/2 = player discs, row 0 at the top.
pub type BoardCells = [[u8; COLS]; ROWS];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Wire/persistence representation (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl Serialize for Player {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for Player {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match u8::deserialize(deserializer)? {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            n => Err(D::Error::custom(format!("invalid player number {n}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Player),
    Draw,
}

/// One applied move, in acceptance order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub player: Player,
    pub column: usize,
    pub row: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error("column {column} is out of range")]
    ColumnOutOfRange { column: usize },
    #[error("column {column} is full")]
    ColumnFull { column: usize },
    #[error("the game is already over")]
    GameOver,
}

/// 6x7 gravity-fill board plus turn, move history, and terminal outcome.
///
/// `Clone` is the simulation copy required by the search agent: the grid is
/// a plain array and the history a `Vec`, so a clone shares nothing with the
/// original.
#[derive(Debug, Clone)]
pub struct Board {
    grid: [[Option<Player>; COLS]; ROWS],
    turn: Player,
    moves: Vec<MoveRecord>,
    outcome: Option<Outcome>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            grid: [[None; COLS]; ROWS],
            turn: Player::One,
            moves: Vec::new(),
            outcome: None,
        }
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<Player> {
        self.grid[row][col]
    }

    /// Forces whose turn it is. Used by search simulation to probe "what if
    /// this side moved here" positions; the live board never needs it.
    pub fn set_turn(&mut self, player: Player) {
        self.turn = player;
    }

    /// Drops the current mover's disc into `column`, returning the row it
    /// landed in. The turn switches unless the move ended the game. No state
    /// changes on error.
    pub fn apply_move(&mut self, column: usize) -> Result<usize, MoveError> {
        if self.outcome.is_some() {
            return Err(MoveError::GameOver);
        }
        if column >= COLS {
            return Err(MoveError::ColumnOutOfRange { column });
        }
        let row = (0..ROWS)
            .rev()
            .find(|&r| self.grid[r][column].is_none())
            .ok_or(MoveError::ColumnFull { column })?;

        let player = self.turn;
        self.grid[row][column] = Some(player);
        self.moves.push(MoveRecord {
            player,
            column,
            row,
        });

        // Win before draw: a move that completes four while filling the
        // board is a win.
        if self.check_win(row, column) {
            self.outcome = Some(Outcome::Win(player));
        } else if self.is_full() {
            self.outcome = Some(Outcome::Draw);
        } else {
            self.turn = player.other();
        }

        Ok(row)
    }

    /// Scans the four axes through the just-played cell for a run of four.
    /// A local scan is sufficient: any older four-in-a-row would have ended
    /// the game on an earlier move.
    fn check_win(&self, row: usize, col: usize) -> bool {
        let Some(player) = self.grid[row][col] else {
            return false;
        };
        const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];
        for (dr, dc) in AXES {
            let (mut r, mut c) = (row as isize, col as isize);
            while in_bounds(r - dr, c - dc) {
                r -= dr;
                c -= dc;
            }
            let mut run = 0usize;
            while in_bounds(r, c) {
                if self.grid[r as usize][c as usize] == Some(player) {
                    run += 1;
                    if run >= CONNECT {
                        return true;
                    }
                } else {
                    run = 0;
                }
                r += dr;
                c += dc;
            }
        }
        false
    }

    /// The top row having no empty cell means no column can take a disc.
    pub fn is_full(&self) -> bool {
        self.grid[0].iter().all(|cell| cell.is_some())
    }

    /// Playable columns in ascending order.
    pub fn valid_moves(&self) -> Vec<usize> {
        (0..COLS).filter(|&c| self.grid[0][c].is_none()).collect()
    }

    /// Writes a cell directly, bypassing gravity and terminal evaluation.
    /// Test position setup only.
    #[cfg(test)]
    pub(crate) fn place_for_test(&mut self, row: usize, col: usize, player: Player) {
        self.grid[row][col] = Some(player);
    }

    pub fn cells(&self) -> BoardCells {
        let mut out = [[0u8; COLS]; ROWS];
        for (r, row) in self.grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                out[r][c] = cell.map_or(0, Player::number);
            }
        }
        out
    }
}

fn in_bounds(r: isize, c: isize) -> bool {
    (0..ROWS as isize).contains(&r) && (0..COLS as isize).contains(&c)
}
