//! Builder for the supervised bot runner.

use tokio::sync::{mpsc, watch};
use tracing::info;

use crate::client::events::ClientAction;
use crate::config::ClientConfig;
use crate::runner::event_consumer::ConsumerFactory;
use crate::runner::supervisor::run_supervised;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("client configuration not provided - use .with_client()")]
    MissingClient,
}

pub struct BotRunnerBuilder {
    client: Option<ClientConfig>,
    consumers: Vec<Box<dyn ConsumerFactory>>,
    console_rx: Option<mpsc::UnboundedReceiver<ClientAction>>,
    shutdown_rx: Option<watch::Receiver<bool>>,
    event_bus_capacity: usize,
}

impl BotRunnerBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            consumers: Vec::new(),
            console_rx: None,
            shutdown_rx: None,
            event_bus_capacity: 256,
        }
    }

    pub fn with_client(mut self, config: ClientConfig) -> Self {
        self.client = Some(config);
        self
    }

    /// Add an event consumer. Factories run once per connection attempt.
    pub fn with_consumer<C: ConsumerFactory>(mut self, consumer: C) -> Self {
        self.consumers.push(Box::new(consumer));
        self
    }

    /// Attach a channel of actions from outside the session (console relay).
    pub fn with_console_input(mut self, rx: mpsc::UnboundedReceiver<ClientAction>) -> Self {
        self.console_rx = Some(rx);
        self
    }

    pub fn with_shutdown(mut self, rx: watch::Receiver<bool>) -> Self {
        self.shutdown_rx = Some(rx);
        self
    }

    pub fn event_bus_capacity(mut self, capacity: usize) -> Self {
        self.event_bus_capacity = capacity;
        self
    }

    pub fn build(self) -> Result<BotRunner, BuildError> {
        let client = self.client.ok_or(BuildError::MissingClient)?;
        Ok(BotRunner {
            client,
            consumers: self.consumers,
            console_rx: self.console_rx,
            shutdown_rx: self.shutdown_rx,
            event_bus_capacity: self.event_bus_capacity,
        })
    }
}

impl Default for BotRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Configured runner, ready to execute.
pub struct BotRunner {
    client: ClientConfig,
    consumers: Vec<Box<dyn ConsumerFactory>>,
    console_rx: Option<mpsc::UnboundedReceiver<ClientAction>>,
    shutdown_rx: Option<watch::Receiver<bool>>,
    event_bus_capacity: usize,
}

impl BotRunner {
    pub fn builder() -> BotRunnerBuilder {
        BotRunnerBuilder::new()
    }

    /// Run until the retry policy gives up or shutdown fires. Installs a
    /// ctrl-c handler when no shutdown channel was provided.
    pub async fn run(self) {
        let shutdown_rx = match self.shutdown_rx {
            Some(rx) => rx,
            None => {
                let (tx, rx) = watch::channel(false);
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        info!("Ctrl+C received, shutting down");
                        let _ = tx.send(true);
                    }
                });
                rx
            }
        };

        run_supervised(
            self.client,
            self.consumers,
            self.console_rx,
            shutdown_rx,
            self.event_bus_capacity,
        )
        .await;
    }
}
