//! Move planner trait definition.

use crate::domain::Board;

/// A strategy that produces the next column for a server-driven seat.
///
/// Implementations receive a read-only snapshot of the live board and must
/// never mutate it; all simulation happens on clones. `plan_move` must
/// return a legal column whenever one exists, and is expected to fall back
/// to the center column on a board with no legal moves (which cannot occur
/// for a non-terminal board, but keeps the contract total).
///
/// Human seats are driven by inbound transport messages instead; only
/// bot-controlled seats get a planner registered with the hub.
pub trait MovePlanner: Send {
    fn plan_move(&self, board: &Board) -> usize;
}
