//! End-to-end checks of the script host against the public API: auth prompts
//! are answered and the idle nudge fires, exactly as a live session would
//! drive them.

use std::time::Duration;

use roost::client::events::{ClientAction, GameEvent};
use roost::scripting::ScriptHost;
use roost::scripts::{AntiAfkScript, AutoAuthScript};
use tokio::sync::mpsc;

fn host_with_scripts(password: &str, interval: Duration) -> (ScriptHost, mpsc::UnboundedReceiver<ClientAction>) {
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let mut host = ScriptHost::new(action_tx);
    host.register_script(Box::new(AutoAuthScript::new(password)));
    host.register_script(Box::new(AntiAfkScript::new(interval)));
    (host, action_rx)
}

#[test]
fn registration_prompt_is_answered_before_login() {
    let (mut host, mut actions) = host_with_scripts("hunter2", Duration::from_secs(30));

    host.handle_game_event(&GameEvent::ChatMessageReceived {
        message: "Please /register <password> <password> before you can /login".into(),
        position: 0,
    });

    assert_eq!(
        actions.try_recv().unwrap(),
        ClientAction::SendChat {
            message: "/register hunter2 hunter2".into()
        }
    );
    assert!(actions.try_recv().is_err(), "exactly one response per prompt");
}

#[test]
fn login_prompt_is_answered() {
    let (mut host, mut actions) = host_with_scripts("hunter2", Duration::from_secs(30));

    host.handle_game_event(&GameEvent::ChatMessageReceived {
        message: "§cPlease log in with /login <password>".into(),
        position: 0,
    });

    assert_eq!(
        actions.try_recv().unwrap(),
        ClientAction::SendChat {
            message: "/login hunter2".into()
        }
    );
}

#[test]
fn ordinary_chat_is_ignored_by_all_scripts() {
    let (mut host, mut actions) = host_with_scripts("hunter2", Duration::from_secs(30));

    host.handle_game_event(&GameEvent::ChatMessageReceived {
        message: "<Steve> anyone selling iron?".into(),
        position: 0,
    });
    host.tick();

    assert!(actions.try_recv().is_err());
}

#[test]
fn idle_nudge_fires_once_spawned_and_ticked_past_interval() {
    let (mut host, mut actions) = host_with_scripts("hunter2", Duration::from_millis(0));

    // Not spawned yet: ticks do nothing.
    host.tick();
    assert!(actions.try_recv().is_err());

    host.handle_game_event(&GameEvent::Spawned {
        entity_id: 7,
        gamemode: 0,
        dimension: 0,
    });
    host.handle_game_event(&GameEvent::PositionUpdated {
        x: 0.5,
        y: 64.0,
        z: 0.5,
        yaw: 0.0,
        pitch: 0.0,
    });

    // Zero interval means the very next tick nudges.
    host.tick();
    match actions.try_recv().unwrap() {
        ClientAction::Look { yaw, pitch } => {
            assert_eq!(yaw, 12.0);
            assert_eq!(pitch, 0.0);
        }
        other => panic!("unexpected action: {:?}", other),
    }
}
