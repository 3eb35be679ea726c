//! Domain layer: pure game logic types and helpers.

pub mod board;
pub mod game;

#[cfg(test)]
pub(crate) mod test_helpers;
#[cfg(test)]
mod tests_board;
#[cfg(test)]
mod tests_game;

// Re-exports for ergonomics
pub use board::{Board, BoardCells, MoveError, MoveRecord, Outcome, Player, COLS, CONNECT, ROWS};
pub use game::{Game, Seat, BOT_NAME};
