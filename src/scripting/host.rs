use std::time::Instant;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info};

use crate::client::events::{ClientAction, GameEvent};
use crate::runner::event_bus::{EventEnvelope, EventType};
use crate::runner::event_consumer::EventConsumer;
use crate::scripting::context::ScriptContext;
use crate::scripting::script::Script;

/// Owns the registered scripts and dispatches events and ticks to them.
pub struct ScriptHost {
    scripts: Vec<Box<dyn Script>>,
    action_tx: UnboundedSender<ClientAction>,
    last_tick: Instant,
}

impl ScriptHost {
    pub fn new(action_tx: UnboundedSender<ClientAction>) -> Self {
        Self {
            scripts: Vec::new(),
            action_tx,
            last_tick: Instant::now(),
        }
    }

    pub fn register_script(&mut self, mut script: Box<dyn Script>) {
        debug!(target: "scripts", "Registering script: {} ({})", script.name(), script.id());
        let mut ctx = ScriptContext::new(self.action_tx.clone(), Instant::now());
        script.on_load(&mut ctx);
        self.scripts.push(script);
    }

    pub fn script_count(&self) -> usize {
        self.scripts.len()
    }

    /// Dispatch a game event to every subscribed script. A panicking script
    /// is contained and logged; the session keeps running.
    pub fn handle_game_event(&mut self, event: &GameEvent) {
        let now = Instant::now();
        let mut ctx = ScriptContext::new(self.action_tx.clone(), now);

        for script in &mut self.scripts {
            let subscribed = script
                .subscribed_events()
                .iter()
                .any(|filter| filter.matches(event));
            if !subscribed {
                continue;
            }

            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                script.on_event(event, &mut ctx);
            }));
            if let Err(panic) = result {
                error!(
                    target: "scripts",
                    "Script {} ({}) panicked while handling an event: {:?}",
                    script.name(),
                    script.id(),
                    panic
                );
            }
        }
    }

    /// Run each script's periodic hook with the elapsed time.
    pub fn tick(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick);
        self.last_tick = now;

        let mut ctx = ScriptContext::new(self.action_tx.clone(), now);
        for script in &mut self.scripts {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                script.on_tick(&mut ctx, delta);
            }));
            if let Err(panic) = result {
                error!(
                    target: "scripts",
                    "Script {} ({}) panicked during tick: {:?}",
                    script.name(),
                    script.id(),
                    panic
                );
            }
        }
    }

    pub fn unload_all(&mut self) {
        if self.scripts.is_empty() {
            return;
        }
        let mut ctx = ScriptContext::new(self.action_tx.clone(), Instant::now());
        for script in &mut self.scripts {
            script.on_unload(&mut ctx);
        }
        info!(target: "scripts", "Unloaded {} script(s)", self.scripts.len());
        self.scripts.clear();
    }
}

impl Drop for ScriptHost {
    fn drop(&mut self) {
        self.unload_all();
    }
}

/// Adapter that runs a `ScriptHost` as a bus consumer.
pub struct ScriptConsumer {
    host: ScriptHost,
}

impl ScriptConsumer {
    pub fn new(host: ScriptHost) -> Self {
        Self { host }
    }
}

impl EventConsumer for ScriptConsumer {
    fn handle_event(&mut self, envelope: EventEnvelope) {
        match envelope.event {
            EventType::Game(game_event) => self.host.handle_game_event(&game_event),
            // Lifecycle events are not routed to scripts; their state is
            // scoped to a session anyway.
            EventType::System(_) => {}
        }
    }

    fn tick(&mut self) {
        self.host.tick();
    }
}
