//! WebSocket layer: wire protocol, per-connection session actors, and the
//! shared hub actor that owns all game state.

pub mod hub;
pub mod protocol;
pub mod session;

pub use hub::{GameHub, Outbound, PlayerKey};
pub use session::WsSession;
