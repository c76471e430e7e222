use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::client::events::ClientEvent;
use crate::runner::event_bus::{EventBus, EventEnvelope};

/// Bridges raw client events onto the bus, stamping each with the client id
/// and a per-session sequence number.
pub struct EventWrapper {
    client_id: u32,
    sequence_counter: u64,
    event_bus: Arc<EventBus>,
}

impl EventWrapper {
    pub fn new(client_id: u32, event_bus: Arc<EventBus>) -> Self {
        Self {
            client_id,
            sequence_counter: 0,
            event_bus,
        }
    }

    /// Drains the raw channel until the client drops its sender.
    pub async fn run(mut self, mut raw_rx: mpsc::Receiver<ClientEvent>) {
        while let Some(raw_event) = raw_rx.recv().await {
            let envelope = match raw_event {
                ClientEvent::Game(game) => {
                    EventEnvelope::game_event(game, self.client_id, self.sequence_counter)
                }
                ClientEvent::System(sys) => {
                    EventEnvelope::system_event(sys, self.client_id, self.sequence_counter)
                }
            };
            self.event_bus.publish(envelope);
            self.sequence_counter += 1;
        }
        debug!(target: "events", "Event wrapper for client {} drained", self.client_id);
    }
}
