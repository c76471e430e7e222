//! Session supervisor.
//!
//! Runs one client session at a time and restarts it after disconnects with
//! the configured backoff. The loop structure is the single-connection /
//! single-pending-reconnect guarantee: a new session only starts after the
//! previous one has fully ended and its delay has elapsed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::client::events::{ClientAction, ClientSystemEvent};
use crate::client::{Account, Client, ServerInfo};
use crate::config::ClientConfig;
use crate::runner::event_bus::{EventBus, EventEnvelope, EventType};
use crate::runner::event_consumer::{ConsumerContext, ConsumerFactory, EventConsumer};
use crate::runner::event_wrapper::EventWrapper;

/// Cadence at which consumers get their `tick` callback.
const CONSUMER_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// How long to wait for consumer tasks after signaling shutdown.
const CONSUMER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

/// Run the supervised reconnect loop until the retry policy is exhausted or
/// shutdown is signaled.
pub async fn run_supervised(
    config: ClientConfig,
    consumer_factories: Vec<Box<dyn ConsumerFactory>>,
    mut external_actions: Option<mpsc::UnboundedReceiver<ClientAction>>,
    mut shutdown_rx: watch::Receiver<bool>,
    event_bus_capacity: usize,
) {
    let bus = Arc::new(EventBus::new(event_bus_capacity));
    let server = ServerInfo::new(config.server.host.clone(), config.server.port);
    let account = Account {
        username: config.username.clone(),
        password: config.password.clone(),
    };
    let reconnect = config.reconnect.clone();

    let mut attempt: u32 = 0;
    let mut last_delay = Duration::ZERO;

    'sessions: loop {
        if *shutdown_rx.borrow() {
            break;
        }

        // Per-session event plumbing: raw channel -> wrapper -> bus.
        let (raw_event_tx, raw_event_rx) = mpsc::channel(256);
        let wrapper = EventWrapper::new(config.id, bus.clone());
        let wrapper_task = tokio::spawn(wrapper.run(raw_event_rx));

        let (client, action_tx) = Client::new(config.id, server.clone(), account.clone(), raw_event_tx);

        // Consumers are rebuilt per session so their state lives and dies
        // with the connection they observe.
        let ctx = ConsumerContext {
            client_id: config.id,
            action_tx: action_tx.clone(),
        };
        let mut consumer_tasks = Vec::new();
        for (idx, factory) in consumer_factories.iter().enumerate() {
            let mut consumer = factory.create(&ctx);
            let mut event_rx = bus.subscribe();
            consumer_tasks.push(tokio::spawn(async move {
                run_consumer(idx, consumer.as_mut(), &mut event_rx).await;
            }));
        }

        if attempt > 0 {
            bus.publish(EventEnvelope::system_event(
                ClientSystemEvent::Reconnecting {
                    attempt,
                    delay_secs: last_delay.as_secs(),
                },
                config.id,
                0,
            ));
        }

        // Run the client, forwarding console lines into the session.
        let mut client_task = tokio::spawn(client.run(shutdown_rx.clone()));
        let outcome = loop {
            match external_actions.take() {
                Some(mut ext) => {
                    tokio::select! {
                        result = &mut client_task => {
                            external_actions = Some(ext);
                            break result;
                        }
                        line = ext.recv() => {
                            match line {
                                Some(action) => {
                                    let _ = action_tx.send(action);
                                    external_actions = Some(ext);
                                }
                                // stdin closed; nothing more will arrive.
                                None => {}
                            }
                        }
                    }
                }
                None => break (&mut client_task).await,
            }
        };

        let reason = match outcome {
            Ok(Ok(end)) => end.reason,
            Ok(Err(e)) => {
                error!(target: "net", "Session failed: {}", e);
                bus.publish(EventEnvelope::system_event(
                    ClientSystemEvent::ConnectionFailed {
                        reason: e.to_string(),
                    },
                    config.id,
                    0,
                ));
                Some(e.to_string())
            }
            Err(join_error) => {
                error!(target: "net", "Client task aborted: {}", join_error);
                None
            }
        };

        let shutting_down = *shutdown_rx.borrow();
        let next_attempt = attempt + 1;
        let will_reconnect =
            !shutting_down && reconnect.enabled && reconnect.should_attempt(next_attempt);
        let delay = reconnect.delay_for_reason(reason.as_deref());

        bus.publish(EventEnvelope::system_event(
            ClientSystemEvent::Disconnected {
                reason: reason.clone(),
                will_reconnect,
                delay_secs: delay.as_secs(),
            },
            config.id,
            0,
        ));

        // Tear down this session's consumers before sleeping.
        bus.publish(EventEnvelope::system_event(
            ClientSystemEvent::Shutdown,
            config.id,
            0,
        ));
        for task in consumer_tasks {
            if tokio::time::timeout(CONSUMER_SHUTDOWN_TIMEOUT, task).await.is_err() {
                warn!(target: "events", "Consumer did not stop in time, continuing teardown");
            }
        }
        drop(action_tx);
        let _ = wrapper_task.await;

        if !will_reconnect {
            if !shutting_down && reconnect.enabled {
                error!(
                    target: "net",
                    "Giving up after {} attempts (max_attempts = {})",
                    attempt, reconnect.max_attempts
                );
            }
            break;
        }

        attempt = next_attempt;
        last_delay = delay;
        info!(
            target: "net",
            "Waiting {}s before reconnect attempt {}", delay.as_secs(), attempt
        );

        // Backoff sleep. Console lines typed now have nowhere to go; drop
        // them with a notice rather than queueing stale input.
        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            match external_actions.take() {
                Some(mut ext) => {
                    tokio::select! {
                        _ = &mut sleep => {
                            external_actions = Some(ext);
                            break;
                        }
                        _ = shutdown_rx.changed() => {
                            external_actions = Some(ext);
                            break 'sessions;
                        }
                        line = ext.recv() => {
                            match line {
                                Some(_) => {
                                    warn!(target: "events", "No active connection, dropping console input");
                                    external_actions = Some(ext);
                                }
                                None => {}
                            }
                        }
                    }
                }
                None => {
                    tokio::select! {
                        _ = &mut sleep => break,
                        _ = shutdown_rx.changed() => break 'sessions,
                    }
                }
            }
        }
    }

    info!(target: "net", "Supervisor stopped");
}

/// Pump one consumer: bus events plus a periodic tick, until the session's
/// shutdown marker arrives.
async fn run_consumer(
    idx: usize,
    consumer: &mut dyn EventConsumer,
    event_rx: &mut broadcast::Receiver<EventEnvelope>,
) {
    let mut tick = tokio::time::interval(CONSUMER_TICK_INTERVAL);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            result = event_rx.recv() => {
                match result {
                    Ok(envelope) => {
                        if matches!(&envelope.event, EventType::System(ClientSystemEvent::Shutdown)) {
                            break;
                        }
                        consumer.handle_event(envelope);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        error!(target: "events", "Consumer {} lagged, {} events skipped", idx, skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            _ = tick.tick() => consumer.tick(),
        }
    }
}
