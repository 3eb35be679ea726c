//! Alpha-beta minimax bot with static heuristics.
//!
//! Decision procedure, in strict priority order: take an immediate win,
//! block the opponent's immediate win, otherwise search to a fixed depth
//! and break score ties with a center-weighted random pick.

use std::sync::Mutex;

use rand::prelude::*;

use super::trait_def::MovePlanner;
use crate::domain::board::{Board, Outcome, Player, CENTER_COL, COLS, CONNECT, ROWS};

const SEARCH_DEPTH: u32 = 6;
const WIN_SCORE: i32 = 100_000;
const THREE_SCORE: i32 = 100;
const TWO_SCORE: i32 = 10;
const CENTER_BONUS: i32 = 3;

pub struct MinimaxBot {
    player: Player,
    /// Interior mutability for the tie-break RNG; `plan_move` takes `&self`.
    rng: Mutex<StdRng>,
}

impl MinimaxBot {
    /// `seed` pins the tie-break RNG for reproducible play in tests; `None`
    /// draws from system entropy.
    pub fn new(player: Player, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            player,
            rng: Mutex::new(rng),
        }
    }

    fn minimax(&self, board: &Board, depth: u32, mut alpha: i32, mut beta: i32, maximizing: bool) -> i32 {
        if board.is_over() || depth == 0 {
            return self.evaluate(board);
        }
        let moves = board.valid_moves();
        if moves.is_empty() {
            return 0;
        }

        if maximizing {
            let mut best = i32::MIN;
            for col in moves {
                let mut sim = board.clone();
                sim.set_turn(self.player);
                if sim.apply_move(col).is_err() {
                    continue;
                }
                let score = self.minimax(&sim, depth - 1, alpha, beta, false);
                best = best.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut worst = i32::MAX;
            for col in moves {
                let mut sim = board.clone();
                sim.set_turn(self.player.other());
                if sim.apply_move(col).is_err() {
                    continue;
                }
                let score = self.minimax(&sim, depth - 1, alpha, beta, true);
                worst = worst.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            worst
        }
    }

    fn evaluate(&self, board: &Board) -> i32 {
        match board.outcome() {
            Some(Outcome::Win(player)) if player == self.player => return WIN_SCORE,
            Some(Outcome::Win(_)) => return -WIN_SCORE,
            Some(Outcome::Draw) => return 0,
            None => {}
        }

        let mut score = 0;
        for r in 0..ROWS {
            for c in 0..COLS {
                let bonus = CENTER_BONUS - (c as i32 - CENTER_COL as i32).abs();
                match board.cell(r, c) {
                    Some(player) if player == self.player => score += bonus,
                    Some(_) => score -= bonus,
                    None => {}
                }
            }
        }

        score + self.evaluate_lines(board)
    }

    /// Slides a 4-cell window along all four axes.
    fn evaluate_lines(&self, board: &Board) -> i32 {
        let mut score = 0;
        for r in 0..ROWS {
            for c in 0..=COLS - CONNECT {
                score += self.evaluate_window(board, r, c, 0, 1);
            }
        }
        for c in 0..COLS {
            for r in 0..=ROWS - CONNECT {
                score += self.evaluate_window(board, r, c, 1, 0);
            }
        }
        for r in 0..=ROWS - CONNECT {
            for c in 0..=COLS - CONNECT {
                score += self.evaluate_window(board, r, c, 1, 1);
            }
        }
        for r in 0..=ROWS - CONNECT {
            for c in CONNECT - 1..COLS {
                score += self.evaluate_window(board, r, c, 1, -1);
            }
        }
        score
    }

    fn evaluate_window(
        &self,
        board: &Board,
        start_row: usize,
        start_col: usize,
        row_dir: isize,
        col_dir: isize,
    ) -> i32 {
        let mut own = 0;
        let mut opp = 0;
        let mut empty = 0;
        for i in 0..CONNECT as isize {
            let r = (start_row as isize + i * row_dir) as usize;
            let c = (start_col as isize + i * col_dir) as usize;
            match board.cell(r, c) {
                Some(player) if player == self.player => own += 1,
                Some(_) => opp += 1,
                None => empty += 1,
            }
        }

        // A window containing both colors can never complete; worthless.
        if own > 0 && opp > 0 {
            return 0;
        }
        match (own, opp, empty) {
            (3, 0, 1) => THREE_SCORE,
            (2, 0, 2) => TWO_SCORE,
            // An opponent three demands a response, so it outweighs our own.
            (0, 3, 1) => -THREE_SCORE * 2,
            (0, 2, 2) => -TWO_SCORE,
            _ => 0,
        }
    }

    /// Center-weighted choice among equally-scored columns: the middle
    /// column is 3x as likely as an edge, its neighbors 2x.
    fn weighted_pick(&self, columns: &[usize]) -> usize {
        let mut pool = Vec::new();
        for &col in columns {
            let copies = match col {
                3 => 3,
                2 | 4 => 2,
                _ => 1,
            };
            pool.extend(std::iter::repeat(col).take(copies));
        }
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        pool.choose(&mut *rng).copied().unwrap_or(CENTER_COL)
    }
}

impl MovePlanner for MinimaxBot {
    fn plan_move(&self, board: &Board) -> usize {
        let opponent = self.player.other();

        // 1. Take an immediate win.
        for col in board.valid_moves() {
            let mut sim = board.clone();
            sim.set_turn(self.player);
            if sim.apply_move(col).is_ok() && sim.outcome() == Some(Outcome::Win(self.player)) {
                return col;
            }
        }

        // 2. Block the opponent's immediate win.
        for col in board.valid_moves() {
            let mut sim = board.clone();
            sim.set_turn(opponent);
            if sim.apply_move(col).is_ok() && sim.outcome() == Some(Outcome::Win(opponent)) {
                return col;
            }
        }

        // 3. Bounded search.
        let mut best_score = i32::MIN;
        let mut best_moves: Vec<usize> = Vec::new();
        for col in board.valid_moves() {
            let mut sim = board.clone();
            sim.set_turn(self.player);
            if sim.apply_move(col).is_err() {
                continue;
            }
            let score = self.minimax(&sim, SEARCH_DEPTH - 1, i32::MIN, i32::MAX, false);
            if score > best_score {
                best_score = score;
                best_moves.clear();
                best_moves.push(col);
            } else if score == best_score {
                best_moves.push(col);
            }
        }

        if best_moves.is_empty() {
            return CENTER_COL;
        }
        self.weighted_pick(&best_moves)
    }
}
