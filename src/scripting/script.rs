use std::time::Duration;

use crate::client::events::GameEvent;
use crate::scripting::context::ScriptContext;

/// Trait all bot behaviors implement.
pub trait Script: Send + 'static {
    /// Unique identifier (e.g. "auto_auth").
    fn id(&self) -> &'static str;

    /// Human-readable name.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Called when the script is attached to a session.
    fn on_load(&mut self, _ctx: &mut ScriptContext) {}

    /// Called when the session is torn down.
    fn on_unload(&mut self, _ctx: &mut ScriptContext) {}

    /// Events this script wants to receive.
    fn subscribed_events(&self) -> &[EventFilter];

    /// Handle an event matching one of the subscribed filters.
    fn on_event(&mut self, event: &GameEvent, ctx: &mut ScriptContext);

    /// Called periodically with the time elapsed since the previous tick.
    /// Time-based logic (intervals, timeouts) lives here.
    fn on_tick(&mut self, _ctx: &mut ScriptContext, _delta: Duration) {}
}

/// Filter for subscribing to specific game events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    All,
    ChatMessageReceived,
    Spawned,
    PositionUpdated,
    LoginSucceeded,
}

impl EventFilter {
    pub fn matches(&self, event: &GameEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::ChatMessageReceived => {
                matches!(event, GameEvent::ChatMessageReceived { .. })
            }
            EventFilter::Spawned => matches!(event, GameEvent::Spawned { .. }),
            EventFilter::PositionUpdated => matches!(event, GameEvent::PositionUpdated { .. }),
            EventFilter::LoginSucceeded => matches!(event, GameEvent::LoginSucceeded { .. }),
        }
    }
}
