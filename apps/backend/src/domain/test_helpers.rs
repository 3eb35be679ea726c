//! Position builders for board and bot tests.

use crate::domain::board::{Board, Player, COLS, ROWS};

/// Builds a board from 6 rows of `.XO` text, row 0 first (the top).
///
/// `X` is player 1, `O` is player 2, `.` is empty. The resulting position is
/// not replayed through gravity, so callers are responsible for writing
/// physically sensible diagrams. `turn` is whose move it is.
pub(crate) fn board_from_rows(rows: [&str; ROWS], turn: Player) -> Board {
    let mut board = Board::new();
    for (r, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), COLS, "row {r} must have {COLS} cells");
        for (c, ch) in row.chars().enumerate() {
            match ch {
                '.' => {}
                'X' => board.place_for_test(r, c, Player::One),
                'O' => board.place_for_test(r, c, Player::Two),
                other => panic!("unexpected cell char {other:?}"),
            }
        }
    }
    board.set_turn(turn);
    board
}

/// Plays a sequence of columns through normal move application, panicking on
/// any rejection. Useful for building mid-game positions legally.
pub(crate) fn play_columns(board: &mut Board, columns: &[usize]) {
    for &col in columns {
        board
            .apply_move(col)
            .unwrap_or_else(|err| panic!("move on column {col} rejected: {err}"));
    }
}
