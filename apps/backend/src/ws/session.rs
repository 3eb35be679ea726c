//! Per-connection WebSocket actor: parses inbound frames, forwards typed
//! messages to the hub, and relays the hub's outbound frames.

use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;
use crate::ws::hub::{Connect, Disconnect, GameHub, Join, Outbound, PlaceMove, ReconnectGame};
use crate::ws::protocol::{ClientMsg, ServerMsg};

/// How often the server pings an idle socket.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);
/// How long a silent client is tolerated before the socket is closed.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(60);

pub struct WsSession {
    conn_id: Uuid,
    hub: Addr<GameHub>,
    last_heartbeat: Instant,
}

impl WsSession {
    pub fn new(hub: Addr<GameHub>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            hub,
            last_heartbeat: Instant::now(),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |act, ctx| {
            if Instant::now().duration_since(act.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %act.conn_id, "[WS] client heartbeat timed out, closing");
                ctx.stop();
                return;
            }
            ctx.ping(b"");
        });
    }

    fn send_local_error(&self, ctx: &mut ws::WebsocketContext<Self>, message: &str) {
        let msg = ServerMsg::Error {
            message: message.to_string(),
        };
        if let Ok(payload) = serde_json::to_string(&msg) {
            ctx.text(payload);
        }
    }

    fn dispatch(&self, msg: ClientMsg) {
        match msg {
            ClientMsg::Join { username } => self.hub.do_send(Join {
                session_id: self.conn_id,
                username,
            }),
            ClientMsg::Move { column } => self.hub.do_send(PlaceMove {
                session_id: self.conn_id,
                column,
            }),
            ClientMsg::Reconnect { username, game_id } => self.hub.do_send(ReconnectGame {
                session_id: self.conn_id,
                username,
                game_id,
            }),
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        debug!(conn_id = %self.conn_id, "[WS] session connected");
        self.hub.do_send(Connect {
            session_id: self.conn_id,
            recipient: ctx.address().recipient(),
        });
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        debug!(conn_id = %self.conn_id, "[WS] session disconnected");
        self.hub.do_send(Disconnect {
            session_id: self.conn_id,
        });
    }
}

impl Handler<Outbound> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: Outbound, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        let msg = match msg {
            Ok(msg) => msg,
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS] protocol error, closing");
                ctx.stop();
                return;
            }
        };
        match msg {
            ws::Message::Ping(payload) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            ws::Message::Pong(_) => {
                self.last_heartbeat = Instant::now();
            }
            ws::Message::Text(text) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(parsed) => self.dispatch(parsed),
                    Err(err) => {
                        debug!(conn_id = %self.conn_id, error = %err, "[WS] malformed frame");
                        self.send_local_error(ctx, "Malformed request");
                    }
                }
            }
            ws::Message::Binary(_) => {
                self.send_local_error(ctx, "Malformed request");
            }
            ws::Message::Close(reason) => {
                ctx.close(reason);
                ctx.stop();
            }
            ws::Message::Continuation(_) => {
                ctx.stop();
            }
            ws::Message::Nop => {}
        }
    }
}

/// HTTP entry point: upgrades `GET /ws` to a live session actor.
pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    ws::start(WsSession::new(state.hub().clone()), &req, stream)
        .map_err(|err| AppError::bad_request(format!("websocket upgrade failed: {err}")))
}
