use actix_web::web;

use crate::health;
use crate::ws::session;

/// Configure application routes for the server and for test harnesses.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.route("/health", web::get().to(health::health));

    // Game traffic: /ws upgrades to a session actor
    cfg.route("/ws", web::get().to(session::upgrade));
}
