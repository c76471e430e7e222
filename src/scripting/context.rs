use std::time::Instant;

use tokio::sync::mpsc::UnboundedSender;

use crate::client::events::ClientAction;

/// Handle scripts use to act on the client.
pub struct ScriptContext {
    action_tx: UnboundedSender<ClientAction>,
    event_time: Instant,
}

impl ScriptContext {
    pub(crate) fn new(action_tx: UnboundedSender<ClientAction>, event_time: Instant) -> Self {
        Self {
            action_tx,
            event_time,
        }
    }

    /// Send a chat line (or command) to the server.
    pub fn send_chat(&self, message: impl Into<String>) {
        let _ = self.action_tx.send(ClientAction::SendChat {
            message: message.into(),
        });
    }

    pub fn send_action(&self, action: ClientAction) {
        let _ = self.action_tx.send(action);
    }

    /// When the event being handled occurred.
    pub fn event_time(&self) -> Instant {
        self.event_time
    }
}
