//! Broadcast event bus. The runner owns the bus; the client publishes through
//! a wrapper task and any number of consumers subscribe.

use std::time::Instant;

use tokio::sync::broadcast;

use crate::client::events::{ClientSystemEvent, GameEvent};

/// Where an event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// Server message.
    Network,
    /// Lifecycle (connect, disconnect, reconnect scheduling).
    System,
}

/// Context attached to every published event.
#[derive(Debug, Clone)]
pub struct EventContext {
    pub client_id: u32,
    /// Per-client monotonic sequence number.
    pub client_sequence: u64,
}

impl EventContext {
    pub fn new(client_id: u32, client_sequence: u64) -> Self {
        Self {
            client_id,
            client_sequence,
        }
    }
}

#[derive(Debug, Clone)]
pub enum EventType {
    Game(GameEvent),
    System(ClientSystemEvent),
}

/// Complete event envelope.
#[derive(Debug, Clone)]
pub struct EventEnvelope {
    pub event: EventType,
    pub context: EventContext,
    pub timestamp: Instant,
    pub source: EventSource,
}

impl EventEnvelope {
    pub fn new(event: EventType, context: EventContext, source: EventSource) -> Self {
        Self {
            event,
            context,
            timestamp: Instant::now(),
            source,
        }
    }

    pub fn game_event(
        game_event: GameEvent,
        client_id: u32,
        client_sequence: u64,
    ) -> Self {
        let context = EventContext::new(client_id, client_sequence);
        Self::new(EventType::Game(game_event), context, EventSource::Network)
    }

    pub fn system_event(
        system_event: ClientSystemEvent,
        client_id: u32,
        client_sequence: u64,
    ) -> Self {
        let context = EventContext::new(client_id, client_sequence);
        Self::new(EventType::System(system_event), context, EventSource::System)
    }

    pub fn extract_game_event(&self) -> Option<GameEvent> {
        match &self.event {
            EventType::Game(game_event) => Some(game_event.clone()),
            _ => None,
        }
    }
}

/// Central event bus.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        EventBus { sender }
    }

    pub fn publish(&self, envelope: EventEnvelope) {
        // Send only fails when there are no subscribers, which is fine.
        let _ = self.sender.send(envelope);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
