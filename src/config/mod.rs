pub mod account_config;
pub mod bot_config;
pub mod client_config;
pub mod server_config;

pub use account_config::AccountConfig;
pub use bot_config::{AntiIdleConfig, ConfigLoadError, RoostConfig};
pub use client_config::ClientConfig;
pub use server_config::{ReconnectConfig, ServerConfig};
