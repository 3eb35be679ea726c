//! The session hub: single owner of live sessions, games, and the
//! player-to-game index.
//!
//! The hub is one actor; its mailbox is the arbitration point. Every
//! registration, move, broadcast, and timer mutation is a typed message
//! processed one at a time, so concurrent sessions can never corrupt shared
//! state or observe a half-applied move.

use std::collections::HashMap;
use std::sync::Arc;

use actix::prelude::*;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::ai::{MinimaxBot, MovePlanner};
use crate::archive::{CompletedGame, GameArchive};
use crate::config::Settings;
use crate::domain::board::{MoveError, Player};
use crate::domain::game::{Game, Seat, BOT_NAME};
use crate::events::{self, EventSink, GameEnded, GameStarted, MovePlayed};
use crate::matchmaking::{Dequeue, Enqueue, Matchmaker, QueuedPlayer};
use crate::ws::protocol::ServerMsg;

/// Pre-serialized frame pushed to a session's outbound mailbox.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Outbound(pub String);

/// Index key for the player-to-game mapping. Live sessions are tracked by
/// id; display names survive a transport drop and drive reconnection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlayerKey {
    Session(Uuid),
    Name(String),
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub session_id: Uuid,
    pub recipient: Recipient<Outbound>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub session_id: Uuid,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Join {
    pub session_id: Uuid,
    pub username: String,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct PlaceMove {
    pub session_id: Uuid,
    pub column: usize,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct ReconnectGame {
    pub session_id: Uuid,
    pub username: String,
    pub game_id: Uuid,
}

/// Sent by the matchmaker once two parties (or one party and the bot
/// fallback) have been paired.
#[derive(Message)]
#[rtype(result = "()")]
pub struct CreateGame {
    pub player1: QueuedPlayer,
    pub player2: Option<QueuedPlayer>,
}

/// Best-effort direct delivery to one session.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Deliver {
    pub session_id: Uuid,
    pub msg: ServerMsg,
}

/// Scheduled bot reply, enqueued after a human move in a bot game.
#[derive(Message)]
#[rtype(result = "()")]
struct BotTurn {
    game_id: Uuid,
}

/// Registry accessor: snapshot of one game, mainly for tests and tooling.
#[derive(Message)]
#[rtype(result = "GameView")]
pub struct InspectGame {
    pub game_id: Uuid,
}

#[derive(MessageResponse)]
pub struct GameView(pub Option<Game>);

/// Registry accessor: which game a player key is bound to.
#[derive(Message)]
#[rtype(result = "IndexedGame")]
pub struct PlayerGame {
    pub key: PlayerKey,
}

#[derive(MessageResponse)]
pub struct IndexedGame(pub Option<Uuid>);

struct SessionEntry {
    recipient: Recipient<Outbound>,
    username: Option<String>,
    game_id: Option<Uuid>,
}

enum EndReason {
    /// The board reached a terminal outcome.
    Finished,
    /// A disconnected player's grace period expired.
    Abandoned { winner: Player },
}

pub struct GameHub {
    settings: Settings,
    sessions: HashMap<Uuid, SessionEntry>,
    games: HashMap<Uuid, Game>,
    player_games: HashMap<PlayerKey, Uuid>,
    /// One-shot grace timers keyed by display name; arming replaces.
    disconnect_timers: HashMap<String, SpawnHandle>,
    /// Planner per bot game, dropped on game teardown.
    bots: HashMap<Uuid, Box<dyn MovePlanner>>,
    matchmaker: Option<Addr<Matchmaker>>,
    events: Arc<dyn EventSink>,
    archive: Arc<dyn GameArchive>,
}

impl GameHub {
    pub fn new(settings: Settings, events: Arc<dyn EventSink>, archive: Arc<dyn GameArchive>) -> Self {
        Self {
            settings,
            sessions: HashMap::new(),
            games: HashMap::new(),
            player_games: HashMap::new(),
            disconnect_timers: HashMap::new(),
            bots: HashMap::new(),
            matchmaker: None,
            events,
            archive,
        }
    }

    fn send_to_session(&self, session_id: Uuid, msg: &ServerMsg) {
        let Some(entry) = self.sessions.get(&session_id) else {
            return;
        };
        let payload = match serde_json::to_string(msg) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "[HUB] failed to serialize outbound message");
                return;
            }
        };
        if entry.recipient.try_send(Outbound(payload)).is_err() {
            debug!(session_id = %session_id, "[HUB] dropping direct message, session queue unavailable");
        }
    }

    fn send_error(&self, session_id: Uuid, message: impl Into<String>) {
        self.send_to_session(
            session_id,
            &ServerMsg::Error {
                message: message.into(),
            },
        );
    }

    /// Fans a message out to every registered session bound to `game_id`.
    /// A recipient whose queue is full or closed is dropped from the
    /// registry rather than blocking everyone else.
    fn broadcast_to_game(&mut self, game_id: Uuid, msg: &ServerMsg) {
        let payload = match serde_json::to_string(msg) {
            Ok(payload) => payload,
            Err(err) => {
                warn!(error = %err, "[HUB] failed to serialize broadcast");
                return;
            }
        };
        let mut dropped = Vec::new();
        for (id, entry) in &self.sessions {
            if entry.game_id != Some(game_id) {
                continue;
            }
            if entry.recipient.try_send(Outbound(payload.clone())).is_err() {
                dropped.push(*id);
            }
        }
        for id in dropped {
            self.sessions.remove(&id);
            warn!(session_id = %id, game_id = %game_id, "[HUB] dropped slow session during broadcast");
        }
    }

    fn cancel_disconnect_timer(&mut self, name: &str, ctx: &mut Context<Self>) {
        if let Some(handle) = self.disconnect_timers.remove(name) {
            ctx.cancel_future(handle);
        }
    }

    /// Re-binds a live session as the current transport for a named player
    /// in a known non-terminal game and replays the full game state to it.
    fn rebind_session(
        &mut self,
        session_id: Uuid,
        username: &str,
        game_id: Uuid,
        ctx: &mut Context<Self>,
    ) {
        self.cancel_disconnect_timer(username, ctx);

        let Some(game) = self.games.get_mut(&game_id) else {
            return;
        };
        let Some(seat) = game.seat_of_name(username) else {
            return;
        };
        game.rebind_session(seat, session_id);

        let reply = ServerMsg::GameReconnected {
            game_id,
            board: game.board.cells(),
            opponent: game.opponent_name(seat).to_string(),
            your_turn: game.board.turn() == seat,
            player: seat.number(),
            is_bot: game.is_bot,
        };

        if let Some(entry) = self.sessions.get_mut(&session_id) {
            entry.game_id = Some(game_id);
        }
        self.player_games
            .insert(PlayerKey::Session(session_id), game_id);
        self.player_games
            .insert(PlayerKey::Name(username.to_string()), game_id);

        self.send_to_session(session_id, &reply);
        info!(username, game_id = %game_id, "[HUB] player reconnected");
    }

    /// Applies a move for whoever's turn it is and fans out the result.
    /// Callers have already verified the game exists, is not over, and that
    /// the mover is authorized.
    fn advance_game(
        &mut self,
        game_id: Uuid,
        column: usize,
        ctx: &mut Context<Self>,
    ) -> Result<(), MoveError> {
        let (seat, row, cells, over, bot_replies) = match self.games.get_mut(&game_id) {
            Some(game) => {
                let seat = game.board.turn();
                let row = game.board.apply_move(column)?;
                let over = game.is_over();
                let bot_replies = game.is_bot && !over && game.board.turn() == Player::Two;
                (seat, row, game.board.cells(), over, bot_replies)
            }
            None => return Ok(()),
        };

        self.events.move_played(MovePlayed {
            game_id,
            timestamp: events::now_ts(),
            player: seat.number(),
            column,
            row,
        });
        self.broadcast_to_game(
            game_id,
            &ServerMsg::Move {
                game_id,
                column,
                row,
                player: seat.number(),
                board: cells,
            },
        );

        if over {
            self.end_game(game_id, EndReason::Finished, ctx);
        } else if bot_replies {
            ctx.notify_later(BotTurn { game_id }, self.settings.bot_move_delay);
        }
        Ok(())
    }

    /// Terminal teardown: notify, hand off to collaborators, and clear every
    /// piece of bookkeeping tied to the game.
    fn end_game(&mut self, game_id: Uuid, reason: EndReason, ctx: &mut Context<Self>) {
        let Some(mut game) = self.games.remove(&game_id) else {
            return;
        };
        game.finish();

        let (winner, reason_label, is_draw) = match reason {
            EndReason::Finished => match game.winner_name() {
                Some(name) => (name.to_string(), "connect4", false),
                None => (String::new(), "draw", true),
            },
            EndReason::Abandoned { winner } => {
                (game.player_name(winner).to_string(), "abandoned", false)
            }
        };

        self.broadcast_to_game(
            game_id,
            &ServerMsg::GameEnd {
                game_id,
                winner: winner.clone(),
                reason: reason_label.to_string(),
            },
        );

        let duration_secs = game
            .duration()
            .map(|d| d.whole_seconds())
            .unwrap_or_default();
        self.events.game_ended(GameEnded {
            game_id,
            timestamp: events::now_ts(),
            winner: winner.clone(),
            is_draw,
            duration_secs,
            moves: game.board.moves().len(),
        });
        self.archive.save(&CompletedGame::from_game(&game, &winner, is_draw));

        self.bots.remove(&game_id);

        // Clear the index for both identities on every termination path so a
        // stale mapping can never block a future join under the same name.
        for player in [Player::One, Player::Two] {
            let seat = game.seat(player);
            self.player_games
                .remove(&PlayerKey::Session(seat.session_id));
            if !(game.is_bot && player == Player::Two) {
                self.player_games.remove(&PlayerKey::Name(seat.name.clone()));
                self.cancel_disconnect_timer(&seat.name.clone(), ctx);
            }
        }
        for entry in self.sessions.values_mut() {
            if entry.game_id == Some(game_id) {
                entry.game_id = None;
            }
        }

        info!(game_id = %game_id, %winner, reason = reason_label, "[HUB] game ended");
    }

    /// Fires when a mid-game player's reconnect grace period expires: the
    /// remaining player wins by forfeit.
    fn abandon_game(&mut self, username: &str, ctx: &mut Context<Self>) {
        let Some(&game_id) = self.player_games.get(&PlayerKey::Name(username.to_string())) else {
            return;
        };
        let Some(game) = self.games.get(&game_id) else {
            return;
        };
        if game.is_over() {
            return;
        }
        let Some(seat) = game.seat_of_name(username) else {
            return;
        };
        info!(username, game_id = %game_id, "[HUB] reconnect grace expired, forfeiting");
        self.end_game(
            game_id,
            EndReason::Abandoned {
                winner: seat.other(),
            },
            ctx,
        );
    }
}

impl Actor for GameHub {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        ctx.set_mailbox_capacity(256);
        let matchmaker = Matchmaker::new(ctx.address(), self.settings.match_timeout).start();
        self.matchmaker = Some(matchmaker);
        info!("[HUB] started");
    }
}

impl Handler<Connect> for GameHub {
    type Result = ();

    fn handle(&mut self, msg: Connect, _ctx: &mut Self::Context) {
        info!(session_id = %msg.session_id, "[HUB] session registered");
        self.sessions.insert(
            msg.session_id,
            SessionEntry {
                recipient: msg.recipient,
                username: None,
                game_id: None,
            },
        );
    }
}

impl Handler<Disconnect> for GameHub {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, ctx: &mut Self::Context) {
        let Some(entry) = self.sessions.remove(&msg.session_id) else {
            return;
        };
        info!(
            session_id = %msg.session_id,
            username = entry.username.as_deref().unwrap_or(""),
            "[HUB] session unregistered"
        );

        if let Some(matchmaker) = &self.matchmaker {
            matchmaker.do_send(Dequeue {
                session_id: msg.session_id,
            });
        }
        self.player_games
            .remove(&PlayerKey::Session(msg.session_id));

        // Mid-game drop: give the identity a grace period to come back
        // before the opponent wins by forfeit.
        let (Some(username), Some(game_id)) = (entry.username, entry.game_id) else {
            return;
        };
        let live = self
            .games
            .get(&game_id)
            .map(|game| !game.is_over())
            .unwrap_or(false);
        if !live {
            return;
        }

        let timer_name = username.clone();
        let handle = ctx.run_later(self.settings.disconnect_grace, move |act, ctx| {
            act.disconnect_timers.remove(&timer_name);
            act.abandon_game(&timer_name, ctx);
        });
        if let Some(previous) = self.disconnect_timers.insert(username.clone(), handle) {
            ctx.cancel_future(previous);
        }
        info!(%username, game_id = %game_id, "[HUB] armed disconnect grace timer");
    }
}

impl Handler<Join> for GameHub {
    type Result = ();

    fn handle(&mut self, msg: Join, ctx: &mut Self::Context) {
        let Join {
            session_id,
            username,
        } = msg;
        if username.trim().is_empty() {
            self.send_error(session_id, "Username is required");
            return;
        }
        match self.sessions.get_mut(&session_id) {
            Some(entry) => entry.username = Some(username.clone()),
            // Raced its own disconnect; nothing to do.
            None => return,
        }

        // A name already bound to a live game means this is a reconnect,
        // not a fresh matchmaking request.
        if let Some(&game_id) = self.player_games.get(&PlayerKey::Name(username.clone())) {
            let live = self
                .games
                .get(&game_id)
                .map(|game| !game.is_over())
                .unwrap_or(false);
            if live {
                self.rebind_session(session_id, &username, game_id, ctx);
                return;
            }
        }

        if let Some(matchmaker) = &self.matchmaker {
            matchmaker.do_send(Enqueue {
                player: QueuedPlayer {
                    session_id,
                    username,
                },
            });
        }
    }
}

impl Handler<PlaceMove> for GameHub {
    type Result = ();

    fn handle(&mut self, msg: PlaceMove, ctx: &mut Self::Context) {
        let PlaceMove { session_id, column } = msg;
        let Some(entry) = self.sessions.get(&session_id) else {
            return;
        };
        let Some(game_id) = entry.game_id else {
            self.send_error(session_id, "Not in a game");
            return;
        };
        let username = entry.username.clone();

        let Some(game) = self.games.get(&game_id) else {
            self.send_error(session_id, "Game not found or already over");
            return;
        };
        if game.is_over() {
            self.send_error(session_id, "Game not found or already over");
            return;
        }
        let seat = game.seat_of_session(session_id).or_else(|| {
            username
                .as_deref()
                .and_then(|name| game.seat_of_name(name))
        });
        let Some(seat) = seat else {
            self.send_error(session_id, "You are not a player in this game");
            return;
        };
        // Re-read the current mover here, under the hub's serialization, so
        // two stale clients racing a move resolve cleanly.
        if game.board.turn() != seat {
            self.send_error(session_id, "Not your turn");
            return;
        }

        if let Err(err) = self.advance_game(game_id, column, ctx) {
            self.send_error(session_id, format!("Invalid move: {err}"));
        }
    }
}

impl Handler<BotTurn> for GameHub {
    type Result = ();

    fn handle(&mut self, msg: BotTurn, ctx: &mut Self::Context) {
        let BotTurn { game_id } = msg;
        // The game may have ended or been torn down while this was queued.
        let Some(game) = self.games.get(&game_id) else {
            return;
        };
        if game.is_over() || !game.is_bot || game.board.turn() != Player::Two {
            return;
        }
        let Some(planner) = self.bots.get(&game_id) else {
            warn!(game_id = %game_id, "[HUB] bot game has no planner");
            return;
        };

        let column = planner.plan_move(&game.board);
        if let Err(err) = self.advance_game(game_id, column, ctx) {
            warn!(game_id = %game_id, column, error = %err, "[HUB] bot chose an invalid move");
        }
    }
}

impl Handler<ReconnectGame> for GameHub {
    type Result = ();

    fn handle(&mut self, msg: ReconnectGame, ctx: &mut Self::Context) {
        let ReconnectGame {
            session_id,
            username,
            game_id,
        } = msg;
        if username.trim().is_empty() {
            self.send_error(
                session_id,
                "Game ID and username are required for reconnection",
            );
            return;
        }

        let Some(game) = self.games.get(&game_id) else {
            self.send_error(session_id, "Game not found");
            return;
        };
        if game.is_over() {
            self.send_error(session_id, "Game is already over");
            return;
        }
        if game.seat_of_name(&username).is_none() {
            self.send_error(session_id, "You are not a player in this game");
            return;
        }

        if let Some(entry) = self.sessions.get_mut(&session_id) {
            entry.username = Some(username.clone());
        }
        self.rebind_session(session_id, &username, game_id, ctx);
    }
}

impl Handler<CreateGame> for GameHub {
    type Result = ();

    fn handle(&mut self, msg: CreateGame, _ctx: &mut Self::Context) {
        let CreateGame { player1, player2 } = msg;
        let game_id = Uuid::new_v4();
        let is_bot = player2.is_none();

        let seat1 = Seat {
            session_id: player1.session_id,
            name: player1.username.clone(),
        };
        let seat2 = match &player2 {
            Some(queued) => Seat {
                session_id: queued.session_id,
                name: queued.username.clone(),
            },
            None => Seat {
                session_id: Uuid::new_v4(),
                name: BOT_NAME.to_string(),
            },
        };

        let game = Game::new(game_id, seat1.clone(), seat2.clone(), is_bot);
        self.games.insert(game_id, game);
        if is_bot {
            self.bots
                .insert(game_id, Box::new(MinimaxBot::new(Player::Two, None)));
        }

        self.player_games
            .insert(PlayerKey::Session(seat1.session_id), game_id);
        self.player_games
            .insert(PlayerKey::Name(seat1.name.clone()), game_id);
        if let Some(entry) = self.sessions.get_mut(&seat1.session_id) {
            entry.game_id = Some(game_id);
        }
        if player2.is_some() {
            self.player_games
                .insert(PlayerKey::Session(seat2.session_id), game_id);
            self.player_games
                .insert(PlayerKey::Name(seat2.name.clone()), game_id);
            if let Some(entry) = self.sessions.get_mut(&seat2.session_id) {
                entry.game_id = Some(game_id);
            }
        }

        self.send_to_session(
            seat1.session_id,
            &ServerMsg::GameStart {
                game_id,
                opponent: seat2.name.clone(),
                your_turn: true,
                is_bot,
                player: Player::One.number(),
            },
        );
        if player2.is_some() {
            self.send_to_session(
                seat2.session_id,
                &ServerMsg::GameStart {
                    game_id,
                    opponent: seat1.name.clone(),
                    your_turn: false,
                    is_bot: false,
                    player: Player::Two.number(),
                },
            );
        }

        self.events.game_started(GameStarted {
            game_id,
            timestamp: events::now_ts(),
            player1: seat1.name.clone(),
            player2: seat2.name.clone(),
            is_bot,
        });
        info!(
            game_id = %game_id,
            player1 = %seat1.name,
            player2 = %seat2.name,
            is_bot,
            "[HUB] game started"
        );
    }
}

impl Handler<Deliver> for GameHub {
    type Result = ();

    fn handle(&mut self, msg: Deliver, _ctx: &mut Self::Context) {
        self.send_to_session(msg.session_id, &msg.msg);
    }
}

impl Handler<InspectGame> for GameHub {
    type Result = GameView;

    fn handle(&mut self, msg: InspectGame, _ctx: &mut Self::Context) -> GameView {
        GameView(self.games.get(&msg.game_id).cloned())
    }
}

impl Handler<PlayerGame> for GameHub {
    type Result = IndexedGame;

    fn handle(&mut self, msg: PlayerGame, _ctx: &mut Self::Context) -> IndexedGame {
        IndexedGame(self.player_games.get(&msg.key).copied())
    }
}
