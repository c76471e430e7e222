use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::client::connection::{Connection, ServerInfo};
use crate::client::events::{ClientAction, ClientEvent, ClientSystemEvent, GameEvent};
use crate::client::session::{Account, ClientSession, SessionState};
use crate::error::{ClientError, ProtoError};
use crate::proto::chat::plain_text;
use crate::proto::{
    ClientboundLogin, ClientboundPlay, Serverbound, MAX_CHAT_LEN, PROTOCOL_VERSION,
};

/// How a session ended. `reason` carries the flattened disconnect text when
/// the server sent one; the supervisor classifies it for the backoff delay.
#[derive(Debug, Clone, Default)]
pub struct SessionEnd {
    pub reason: Option<String>,
}

enum LoopControl {
    Continue,
    End(SessionEnd),
}

/// One connection attempt against one server. At most one connection is
/// active per client; the supervisor constructs a fresh `Client` per attempt.
pub struct Client {
    pub id: u32,
    server: ServerInfo,
    account: Account,
    pub session: ClientSession,
    raw_event_tx: mpsc::Sender<ClientEvent>,
    action_rx: mpsc::UnboundedReceiver<ClientAction>,
}

impl Client {
    pub fn new(
        id: u32,
        server: ServerInfo,
        account: Account,
        raw_event_tx: mpsc::Sender<ClientEvent>,
    ) -> (Client, mpsc::UnboundedSender<ClientAction>) {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let client = Client {
            id,
            server,
            account,
            session: ClientSession::new(),
            raw_event_tx,
            action_rx,
        };
        (client, action_tx)
    }

    fn emit(&self, event: ClientEvent) {
        // Dropped events only mean the bus is gone during teardown.
        let _ = self.raw_event_tx.try_send(event);
    }

    /// Run the session to completion: connect, log in, then pump frames and
    /// actions until the server disconnects us or shutdown is signaled.
    pub async fn run(
        mut self,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<SessionEnd, ClientError> {
        info!(
            target: "net",
            "Connecting to {} as {}", self.server, self.account.username
        );
        let mut conn = Connection::open(&self.server).await?;

        self.login(&mut conn).await?;

        let mut actions_open = true;
        loop {
            tokio::select! {
                frame = conn.read_frame() => {
                    match frame {
                        Ok((packet_id, data)) => {
                            match self.handle_play_packet(&mut conn, packet_id, &data).await? {
                                LoopControl::Continue => {}
                                LoopControl::End(end) => return Ok(end),
                            }
                        }
                        Err(ProtoError::ConnectionClosed) => {
                            info!(target: "net", "Server closed the connection");
                            return Ok(SessionEnd {
                                reason: self.session.last_disconnect_reason.take(),
                            });
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                action = self.action_rx.recv(), if actions_open => {
                    match action {
                        Some(action) => {
                            match self.handle_action(&mut conn, action).await? {
                                LoopControl::Continue => {}
                                LoopControl::End(end) => return Ok(end),
                            }
                        }
                        // All senders gone; nothing left to drive the session
                        // besides the server itself.
                        None => {
                            debug!(target: "net", "Action channel closed");
                            actions_open = false;
                        }
                    }
                }
                _ = shutdown_rx.changed() => {
                    info!(target: "net", "Shutdown signal received, closing session");
                    return Ok(SessionEnd::default());
                }
            }
        }
    }

    /// Handshake + login. Leaves the session in Play state on success.
    async fn login(&mut self, conn: &mut Connection) -> Result<(), ClientError> {
        conn.send(&Serverbound::Handshake {
            protocol_version: PROTOCOL_VERSION,
            server_address: self.server.host.clone(),
            server_port: self.server.port,
            next_state: 2,
        })
        .await?;
        self.session.transition_to(SessionState::Login);

        conn.send(&Serverbound::LoginStart {
            name: self.account.username.clone(),
        })
        .await?;

        loop {
            let (packet_id, data) = conn.read_frame().await?;
            match ClientboundLogin::decode(packet_id, &data)? {
                ClientboundLogin::SetCompression { threshold } => {
                    conn.enable_compression(threshold);
                }
                ClientboundLogin::LoginSuccess { uuid, username } => {
                    info!(target: "net", "Logged in as {} ({})", username, uuid);
                    self.session.transition_to(SessionState::Play);
                    self.emit(ClientEvent::System(ClientSystemEvent::Connected));
                    self.emit(ClientEvent::Game(GameEvent::LoginSucceeded {
                        username,
                        uuid,
                    }));
                    return Ok(());
                }
                ClientboundLogin::Disconnect { reason } => {
                    let text = plain_text(&reason);
                    warn!(target: "net", "Login refused: {}", text);
                    return Err(ClientError::LoginRejected(text));
                }
                ClientboundLogin::EncryptionRequest => {
                    return Err(ClientError::LoginRejected(
                        "server requires online-mode authentication".into(),
                    ));
                }
                ClientboundLogin::Unknown { packet_id } => {
                    debug!(target: "net", "Ignoring login packet 0x{:02X}", packet_id);
                }
            }
        }
    }

    async fn handle_play_packet(
        &mut self,
        conn: &mut Connection,
        packet_id: i32,
        data: &[u8],
    ) -> Result<LoopControl, ClientError> {
        let packet = match ClientboundPlay::decode(packet_id, data) {
            Ok(packet) => packet,
            Err(e) => {
                // A single undecodable frame is not worth a reconnect cycle.
                warn!(target: "net", "Skipping malformed packet 0x{:02X}: {}", packet_id, e);
                return Ok(LoopControl::Continue);
            }
        };

        match packet {
            ClientboundPlay::KeepAlive { id } => {
                debug!(target: "net", "KeepAlive {} answered", id);
                conn.send(&Serverbound::KeepAlive { id }).await?;
            }
            ClientboundPlay::JoinGame {
                entity_id,
                gamemode,
                dimension,
            } => {
                info!(target: "net", "Spawned into the world (entity {})", entity_id);
                self.session.spawned = true;
                self.emit(ClientEvent::Game(GameEvent::Spawned {
                    entity_id,
                    gamemode,
                    dimension,
                }));
            }
            ClientboundPlay::Chat { json, position } => {
                let message = plain_text(&json);
                info!(target: "events", "[server] {}", message);
                self.emit(ClientEvent::Game(GameEvent::ChatMessageReceived {
                    message,
                    position,
                }));
            }
            ClientboundPlay::PositionAndLook {
                x,
                y,
                z,
                yaw,
                pitch,
                flags,
            } => {
                let p = self.session.apply_position_update(x, y, z, yaw, pitch, flags);
                // Echo the accepted position so the server treats the
                // teleport as confirmed.
                conn.send(&Serverbound::PositionLook {
                    x: p.x,
                    feet_y: p.y,
                    z: p.z,
                    yaw: p.yaw,
                    pitch: p.pitch,
                    on_ground: true,
                })
                .await?;
                debug!(
                    target: "net",
                    "Position set to ({:.1}, {:.1}, {:.1}) yaw {:.1}", p.x, p.y, p.z, p.yaw
                );
                self.emit(ClientEvent::Game(GameEvent::PositionUpdated {
                    x: p.x,
                    y: p.y,
                    z: p.z,
                    yaw: p.yaw,
                    pitch: p.pitch,
                }));
            }
            ClientboundPlay::Disconnect { reason } => {
                let text = plain_text(&reason);
                warn!(target: "net", "Disconnected by server: {}", text);
                self.session.last_disconnect_reason = Some(text.clone());
                return Ok(LoopControl::End(SessionEnd { reason: Some(text) }));
            }
            ClientboundPlay::Unknown { .. } => {}
        }
        Ok(LoopControl::Continue)
    }

    async fn handle_action(
        &mut self,
        conn: &mut Connection,
        action: ClientAction,
    ) -> Result<LoopControl, ClientError> {
        match action {
            ClientAction::SendChat { mut message } => {
                if message.chars().count() > MAX_CHAT_LEN {
                    warn!(
                        target: "net",
                        "Chat line over {} characters, truncating", MAX_CHAT_LEN
                    );
                    message = message.chars().take(MAX_CHAT_LEN).collect();
                }
                info!(target: "net", "Chat sent: {}", redact_credentials(&message));
                if let Err(e) = conn.send(&Serverbound::Chat { message }).await {
                    error!(target: "net", "Failed to send chat message: {}", e);
                    return Err(e.into());
                }
            }
            ClientAction::Look { yaw, pitch } => {
                if let Some(p) = self.session.position.as_mut() {
                    p.yaw = yaw;
                    p.pitch = pitch;
                }
                conn.send(&Serverbound::Look {
                    yaw,
                    pitch,
                    on_ground: true,
                })
                .await?;
            }
            ClientAction::Disconnect => {
                info!(target: "net", "Disconnect requested");
                return Ok(LoopControl::End(SessionEnd::default()));
            }
        }
        Ok(LoopControl::Continue)
    }
}

/// Keep auth commands out of the logs.
fn redact_credentials(message: &str) -> String {
    let lower = message.to_lowercase();
    if lower.starts_with("/login") || lower.starts_with("/register") {
        let command = message.split_whitespace().next().unwrap_or(message);
        format!("{} ***", command)
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::redact_credentials;

    #[test]
    fn credentials_never_reach_logs() {
        assert_eq!(redact_credentials("/login hunter2"), "/login ***");
        assert_eq!(redact_credentials("/register hunter2 hunter2"), "/register ***");
        assert_eq!(redact_credentials("hello there"), "hello there");
    }
}
