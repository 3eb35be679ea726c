//! First-come-first-served pairing with a bot fallback.
//!
//! The matchmaker is its own actor so queue churn never competes with game
//! traffic for the hub's mailbox. Pairing rule: a new entrant matches the
//! oldest waiting player with a different session AND a different username,
//! so one identity on two tabs cannot be paired against itself. Anyone left
//! waiting past the timeout gets a bot opponent instead.

use std::time::{Duration, Instant};

use actix::prelude::*;
use tracing::{debug, info};
use uuid::Uuid;

use crate::ws::hub::{CreateGame, Deliver, GameHub};
use crate::ws::protocol::ServerMsg;

#[derive(Debug, Clone)]
pub struct QueuedPlayer {
    pub session_id: Uuid,
    pub username: String,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Enqueue {
    pub player: QueuedPlayer,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Dequeue {
    pub session_id: Uuid,
}

/// Queue depth, for tests and diagnostics.
#[derive(Message)]
#[rtype(result = "usize")]
pub struct WaitingCount;

struct Waiting {
    player: QueuedPlayer,
    enqueued_at: Instant,
    timeout: SpawnHandle,
}

pub struct Matchmaker {
    hub: Addr<GameHub>,
    queue: Vec<Waiting>,
    timeout: Duration,
}

impl Matchmaker {
    pub fn new(hub: Addr<GameHub>, timeout: Duration) -> Self {
        Self {
            hub,
            queue: Vec::new(),
            timeout,
        }
    }

    /// The one-shot fallback fired when a player has waited out the clock.
    fn expire(&mut self, session_id: Uuid) {
        let Some(idx) = self
            .queue
            .iter()
            .position(|entry| entry.player.session_id == session_id)
        else {
            return;
        };
        let entry = self.queue.remove(idx);
        info!(
            username = %entry.player.username,
            waited_ms = entry.enqueued_at.elapsed().as_millis() as u64,
            "[MATCH] timeout, starting bot game"
        );
        self.hub.do_send(CreateGame {
            player1: entry.player,
            player2: None,
        });
    }
}

impl Actor for Matchmaker {
    type Context = Context<Self>;
}

impl Handler<Enqueue> for Matchmaker {
    type Result = ();

    fn handle(&mut self, msg: Enqueue, ctx: &mut Self::Context) {
        let Enqueue { player } = msg;

        // A repeated join from a session already in line is a no-op.
        if self
            .queue
            .iter()
            .any(|entry| entry.player.session_id == player.session_id)
        {
            return;
        }

        let candidate = self.queue.iter().position(|entry| {
            entry.player.session_id != player.session_id
                && entry.player.username != player.username
        });
        if let Some(idx) = candidate {
            let waiting = self.queue.remove(idx);
            ctx.cancel_future(waiting.timeout);
            info!(
                player1 = %waiting.player.username,
                player2 = %player.username,
                "[MATCH] paired"
            );
            self.hub.do_send(CreateGame {
                player1: waiting.player,
                player2: Some(player),
            });
            return;
        }

        // No partner yet: park the player and arm the bot fallback.
        let session_id = player.session_id;
        let timeout = ctx.run_later(self.timeout, move |act, _ctx| {
            act.expire(session_id);
        });
        debug!(username = %player.username, "[MATCH] waiting for an opponent");
        self.hub.do_send(Deliver {
            session_id,
            msg: ServerMsg::Waiting {
                message: "Looking for an opponent...".to_string(),
            },
        });
        self.queue.push(Waiting {
            player,
            enqueued_at: Instant::now(),
            timeout,
        });
    }
}

impl Handler<Dequeue> for Matchmaker {
    type Result = ();

    fn handle(&mut self, msg: Dequeue, ctx: &mut Self::Context) {
        let Some(idx) = self
            .queue
            .iter()
            .position(|entry| entry.player.session_id == msg.session_id)
        else {
            return;
        };
        let entry = self.queue.remove(idx);
        ctx.cancel_future(entry.timeout);
        debug!(username = %entry.player.username, "[MATCH] left the queue");
    }
}

impl Handler<WaitingCount> for Matchmaker {
    type Result = usize;

    fn handle(&mut self, _msg: WaitingCount, _ctx: &mut Self::Context) -> usize {
        self.queue.len()
    }
}
