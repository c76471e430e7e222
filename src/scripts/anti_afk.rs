use std::time::Duration;

use tracing::info;

use crate::client::events::{ClientAction, GameEvent};
use crate::scripting::{EventFilter, Script, ScriptContext};

/// Default interval between camera nudges.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30);

/// Yaw rotation applied on each nudge, in degrees. Large enough that the
/// server registers it as input, small enough to look like idle fidgeting.
const YAW_STEP: f32 = 12.0;

/// Rotates the camera on a fixed interval so the server's idle kicker never
/// considers the bot inactive. Armed once the bot has spawned and the server
/// has confirmed an orientation; silent otherwise.
pub struct AntiAfkScript {
    interval: Duration,
    since_last: Duration,
    spawned: bool,
    orientation: Option<(f32, f32)>,
}

impl AntiAfkScript {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            since_last: Duration::ZERO,
            spawned: false,
            orientation: None,
        }
    }
}

impl Default for AntiAfkScript {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

/// Wrap a yaw angle into [-180, 180).
fn wrap_yaw(yaw: f32) -> f32 {
    let mut yaw = (yaw + 180.0) % 360.0;
    if yaw < 0.0 {
        yaw += 360.0;
    }
    yaw - 180.0
}

impl Script for AntiAfkScript {
    fn id(&self) -> &'static str {
        "anti_afk"
    }

    fn name(&self) -> &'static str {
        "Anti AFK"
    }

    fn description(&self) -> &'static str {
        "Periodically rotates the camera to avoid inactivity kicks"
    }

    fn subscribed_events(&self) -> &[EventFilter] {
        &[EventFilter::Spawned, EventFilter::PositionUpdated]
    }

    fn on_event(&mut self, event: &GameEvent, _ctx: &mut ScriptContext) {
        match event {
            GameEvent::Spawned { .. } => {
                self.spawned = true;
                self.since_last = Duration::ZERO;
            }
            GameEvent::PositionUpdated { yaw, pitch, .. } => {
                self.orientation = Some((*yaw, *pitch));
            }
            _ => {}
        }
    }

    fn on_tick(&mut self, ctx: &mut ScriptContext, delta: Duration) {
        if !self.spawned {
            return;
        }
        let Some((yaw, pitch)) = self.orientation else {
            return;
        };

        self.since_last += delta;
        if self.since_last < self.interval {
            return;
        }
        self.since_last = Duration::ZERO;

        let new_yaw = wrap_yaw(yaw + YAW_STEP);
        self.orientation = Some((new_yaw, pitch));
        info!(target: "scripts", "Nudging camera to avoid idle kick (yaw {:.1})", new_yaw);
        ctx.send_action(ClientAction::Look {
            yaw: new_yaw,
            pitch,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::sync::mpsc;

    fn context() -> (ScriptContext, mpsc::UnboundedReceiver<ClientAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ScriptContext::new(tx, Instant::now()), rx)
    }

    fn spawn_at(script: &mut AntiAfkScript, ctx: &mut ScriptContext, yaw: f32, pitch: f32) {
        script.on_event(
            &GameEvent::Spawned {
                entity_id: 1,
                gamemode: 0,
                dimension: 0,
            },
            ctx,
        );
        script.on_event(
            &GameEvent::PositionUpdated {
                x: 0.0,
                y: 64.0,
                z: 0.0,
                yaw,
                pitch,
            },
            ctx,
        );
    }

    #[test]
    fn silent_before_spawn() {
        let (mut ctx, mut rx) = context();
        let mut script = AntiAfkScript::new(Duration::from_secs(30));
        script.on_tick(&mut ctx, Duration::from_secs(60));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn nudges_after_interval_elapses() {
        let (mut ctx, mut rx) = context();
        let mut script = AntiAfkScript::new(Duration::from_secs(30));
        spawn_at(&mut script, &mut ctx, 90.0, 5.0);

        script.on_tick(&mut ctx, Duration::from_secs(10));
        assert!(rx.try_recv().is_err(), "too early to nudge");

        script.on_tick(&mut ctx, Duration::from_secs(25));
        match rx.try_recv().unwrap() {
            ClientAction::Look { yaw, pitch } => {
                assert_eq!(yaw, 102.0);
                assert_eq!(pitch, 5.0);
            }
            other => panic!("unexpected action: {:?}", other),
        }

        // Interval resets after each nudge.
        script.on_tick(&mut ctx, Duration::from_secs(10));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn yaw_wraps_at_the_boundary() {
        let (mut ctx, mut rx) = context();
        let mut script = AntiAfkScript::new(Duration::from_secs(1));
        spawn_at(&mut script, &mut ctx, 175.0, 0.0);

        script.on_tick(&mut ctx, Duration::from_secs(2));
        match rx.try_recv().unwrap() {
            ClientAction::Look { yaw, .. } => assert_eq!(yaw, -173.0),
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn wrap_yaw_is_stable_in_range() {
        assert_eq!(wrap_yaw(0.0), 0.0);
        assert_eq!(wrap_yaw(-179.0), -179.0);
        assert_eq!(wrap_yaw(180.0), -180.0);
        assert_eq!(wrap_yaw(540.0), -180.0);
    }
}
