//! Adversarial search agent for server-driven seats.

pub mod minimax;
pub mod trait_def;

pub use minimax::MinimaxBot;
pub use trait_def::MovePlanner;
