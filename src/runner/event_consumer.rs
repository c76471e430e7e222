use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, warn};

use crate::client::events::{ClientAction, ClientSystemEvent, GameEvent};
use crate::runner::event_bus::{EventEnvelope, EventType};

/// Consumer of bus events. `tick` fires on a fixed cadence so consumers can
/// run time-based logic while the connection is quiet.
pub trait EventConsumer: Send + 'static {
    fn handle_event(&mut self, envelope: EventEnvelope);

    fn tick(&mut self) {}
}

/// Context handed to consumer factories when a session is assembled.
pub struct ConsumerContext {
    pub client_id: u32,
    /// Channel for sending actions back to the client.
    pub action_tx: UnboundedSender<ClientAction>,
}

/// Factory for per-session consumers. Sessions are rebuilt on every reconnect
/// attempt, so consumers are created lazily once the action channel exists.
pub trait ConsumerFactory: Send + Sync + 'static {
    fn create(&self, ctx: &ConsumerContext) -> Box<dyn EventConsumer>;
}

impl<F> ConsumerFactory for F
where
    F: Fn(&ConsumerContext) -> Box<dyn EventConsumer> + Send + Sync + 'static,
{
    fn create(&self, ctx: &ConsumerContext) -> Box<dyn EventConsumer> {
        (self)(ctx)
    }
}

/// Consumer that renders events through tracing. The console surface.
pub struct LoggingConsumer {
    _action_tx: UnboundedSender<ClientAction>,
}

impl LoggingConsumer {
    pub fn new(action_tx: UnboundedSender<ClientAction>) -> Self {
        Self {
            _action_tx: action_tx,
        }
    }

    pub fn from_factory() -> impl ConsumerFactory {
        |ctx: &ConsumerContext| {
            Box::new(LoggingConsumer::new(ctx.action_tx.clone())) as Box<dyn EventConsumer>
        }
    }
}

impl EventConsumer for LoggingConsumer {
    fn handle_event(&mut self, envelope: EventEnvelope) {
        match envelope.event {
            EventType::Game(game_event) => match game_event {
                GameEvent::ChatMessageReceived { .. } => {
                    // Chat lines are already logged at receive time with the
                    // `events` target; avoid printing them twice.
                }
                GameEvent::Spawned { entity_id, .. } => {
                    info!(target: "events", "Spawn complete (entity {}), watching for auth prompts", entity_id);
                }
                GameEvent::PositionUpdated { x, y, z, .. } => {
                    info!(target: "events", "Position confirmed at ({:.1}, {:.1}, {:.1})", x, y, z);
                }
                GameEvent::LoginSucceeded { username, .. } => {
                    info!(target: "events", "Login succeeded as {}", username);
                }
            },
            EventType::System(system_event) => match system_event {
                ClientSystemEvent::Connected => {
                    info!(target: "events", "Connected to server");
                }
                ClientSystemEvent::Disconnected {
                    reason,
                    will_reconnect,
                    delay_secs,
                } => {
                    let reason = reason.unwrap_or_else(|| "connection lost".into());
                    if will_reconnect {
                        warn!(
                            target: "events",
                            "Disconnected ({}), reconnecting in {}s", reason, delay_secs
                        );
                    } else {
                        warn!(target: "events", "Disconnected ({})", reason);
                    }
                }
                ClientSystemEvent::Reconnecting { attempt, delay_secs } => {
                    info!(
                        target: "events",
                        "Reconnect attempt {} starting after {}s wait", attempt, delay_secs
                    );
                }
                ClientSystemEvent::ConnectionFailed { reason } => {
                    error!(target: "events", "Connection failed: {}", reason);
                }
                ClientSystemEvent::Shutdown => {}
            },
        }
    }
}
