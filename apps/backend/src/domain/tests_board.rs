use crate::domain::board::{Board, MoveError, Outcome, Player, COLS, ROWS};
use crate::domain::test_helpers::{board_from_rows, play_columns};

/// Every column must be either empty above its topmost disc, with discs
/// packed solid below it.
fn assert_no_floating_discs(board: &Board) {
    for col in 0..COLS {
        let mut seen_disc = false;
        for row in 0..ROWS {
            let filled = board.cell(row, col).is_some();
            if seen_disc {
                assert!(filled, "gap below a disc in column {col} at row {row}");
            }
            seen_disc |= filled;
        }
    }
}

#[test]
fn gravity_stacks_from_the_bottom() {
    let mut board = Board::new();
    assert_eq!(board.apply_move(3), Ok(5));
    assert_eq!(board.apply_move(3), Ok(4));
    assert_eq!(board.apply_move(3), Ok(3));
    assert_eq!(board.cell(5, 3), Some(Player::One));
    assert_eq!(board.cell(4, 3), Some(Player::Two));
    assert_eq!(board.cell(3, 3), Some(Player::One));
    assert_no_floating_discs(&board);
}

#[test]
fn no_gaps_after_scattered_legal_play() {
    let mut board = Board::new();
    play_columns(&mut board, &[0, 3, 3, 6, 2, 2, 2, 5, 1, 0, 6, 6]);
    assert_no_floating_discs(&board);
    assert!(board.outcome().is_none());
}

#[test]
fn repeated_center_column_alternates_without_win() {
    // The scenario from the acceptance checklist: five straight drops on
    // column 3 alternate colors, so no win can trigger.
    let mut board = Board::new();
    for _ in 0..5 {
        board.apply_move(3).expect("column 3 still has room");
        assert!(board.outcome().is_none());
    }
}

#[test]
fn seventh_drop_on_a_column_is_rejected() {
    let mut board = Board::new();
    for _ in 0..6 {
        board.apply_move(3).expect("column 3 holds six discs");
    }
    assert!(board.outcome().is_none());
    let turn_before = board.turn();
    let moves_before = board.moves().len();
    assert_eq!(
        board.apply_move(3),
        Err(MoveError::ColumnFull { column: 3 })
    );
    // No side effects on rejection.
    assert_eq!(board.turn(), turn_before);
    assert_eq!(board.moves().len(), moves_before);
}

#[test]
fn out_of_range_column_is_rejected() {
    let mut board = Board::new();
    assert_eq!(
        board.apply_move(COLS),
        Err(MoveError::ColumnOutOfRange { column: COLS })
    );
    assert!(board.moves().is_empty());
}

#[test]
fn moves_after_game_over_are_rejected() {
    let mut board = Board::new();
    // Vertical win for player 1 in column 0.
    play_columns(&mut board, &[0, 1, 0, 1, 0, 1, 0]);
    assert_eq!(board.outcome(), Some(Outcome::Win(Player::One)));
    assert_eq!(board.apply_move(2), Err(MoveError::GameOver));
}

#[test]
fn horizontal_win_detected_on_completing_move_only() {
    let mut board = Board::new();
    play_columns(&mut board, &[0, 0, 1, 1, 2, 2]);
    assert!(board.outcome().is_none());
    assert_eq!(board.apply_move(3), Ok(5));
    assert_eq!(board.outcome(), Some(Outcome::Win(Player::One)));
}

#[test]
fn vertical_win_detected_on_completing_move_only() {
    let mut board = Board::new();
    play_columns(&mut board, &[4, 5, 4, 5, 4, 5]);
    assert!(board.outcome().is_none());
    assert_eq!(board.apply_move(4), Ok(2));
    assert_eq!(board.outcome(), Some(Outcome::Win(Player::One)));
}

#[test]
fn rising_diagonal_win_detected_on_completing_move_only() {
    let mut board = Board::new();
    // Player 1 builds (5,0)-(4,1)-(3,2) and finally (2,3).
    play_columns(&mut board, &[0, 1, 1, 2, 3, 2, 2, 3, 3, 6]);
    assert!(board.outcome().is_none());
    assert_eq!(board.apply_move(3), Ok(2));
    assert_eq!(board.outcome(), Some(Outcome::Win(Player::One)));
}

#[test]
fn falling_diagonal_win_detected_on_completing_move_only() {
    let mut board = Board::new();
    // Mirror image of the rising-diagonal game: (5,6)-(4,5)-(3,4)-(2,3).
    play_columns(&mut board, &[6, 5, 5, 4, 3, 4, 4, 3, 3, 0]);
    assert!(board.outcome().is_none());
    assert_eq!(board.apply_move(3), Ok(2));
    assert_eq!(board.outcome(), Some(Outcome::Win(Player::One)));
}

#[test]
fn full_board_without_a_run_is_a_draw() {
    let mut board = board_from_rows(
        [
            ".OXOXOX",
            "XOXOXOX",
            "OXOXOXO",
            "OXOXOXO",
            "XOXOXOX",
            "XOXOXOX",
        ],
        Player::One,
    );
    assert!(!board.is_full());
    assert_eq!(board.apply_move(0), Ok(0));
    assert!(board.is_full());
    assert_eq!(board.outcome(), Some(Outcome::Draw));
}

#[test]
fn move_that_wins_and_fills_the_board_is_a_win() {
    // Column 0 holds three player-1 discs below the last empty cell, so the
    // filling move simultaneously completes a vertical four.
    let mut board = board_from_rows(
        [
            ".OXOXOX",
            "XOXOXOX",
            "XXOXOXO",
            "XXOXOXO",
            "OOXOXOX",
            "XOXOXOX",
        ],
        Player::One,
    );
    assert_eq!(board.apply_move(0), Ok(0));
    assert!(board.is_full());
    assert_eq!(board.outcome(), Some(Outcome::Win(Player::One)));
}

#[test]
fn valid_moves_skip_full_columns() {
    let mut board = Board::new();
    for _ in 0..6 {
        board.apply_move(2).expect("filling column 2");
    }
    assert_eq!(board.valid_moves(), vec![0, 1, 3, 4, 5, 6]);
}

#[test]
fn clone_is_a_deep_copy() {
    let mut board = Board::new();
    play_columns(&mut board, &[3, 3, 4]);
    let valid_before = board.valid_moves();
    let moves_before = board.moves().len();

    let mut sim = board.clone();
    for _ in 0..4 {
        sim.apply_move(0).expect("clone accepts moves");
    }
    sim.set_turn(Player::One);

    assert_eq!(board.valid_moves(), valid_before);
    assert_eq!(board.moves().len(), moves_before);
    assert_eq!(board.turn(), Player::Two);
}

#[test]
fn cells_use_wire_numbering() {
    let mut board = Board::new();
    play_columns(&mut board, &[3, 4]);
    let cells = board.cells();
    assert_eq!(cells[5][3], 1);
    assert_eq!(cells[5][4], 2);
    assert_eq!(cells[0][0], 0);
}
