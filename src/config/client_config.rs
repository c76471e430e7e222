use crate::config::server_config::{ReconnectConfig, ServerConfig};

/// Everything the runner needs to drive one bot.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub id: u32,
    pub server: ServerConfig,
    pub username: String,
    pub password: String,
    pub reconnect: ReconnectConfig,
}

impl ClientConfig {
    pub fn new(
        id: u32,
        server: ServerConfig,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            id,
            server,
            username: username.into(),
            password: password.into(),
            reconnect: ReconnectConfig::default(),
        }
    }

    pub fn with_reconnect(mut self, reconnect: ReconnectConfig) -> Self {
        self.reconnect = reconnect;
        self
    }
}
