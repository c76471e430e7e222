use std::error::Error;
use std::fs;
use std::time::Duration;

use clap::Parser;
use tracing::info;

use roost::config::{ClientConfig, RoostConfig};
use roost::console;
use roost::logging::init_logging;
use roost::runner::{BotRunner, ConsumerContext, EventConsumer, LoggingConsumer};
use roost::scripting::{ScriptConsumer, ScriptHost};
use roost::scripts::{AntiAfkScript, AutoAuthScript};

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Server to connect to (name from the config file)
    #[arg(short, long)]
    server: Option<String>,

    /// Account to use (name from the config file)
    #[arg(short, long)]
    account: Option<String>,

    /// Also write logs to a file in the data directory
    #[arg(long)]
    log_file: bool,
}

fn create_example_config() -> Result<(), Box<dyn Error>> {
    let config_path = RoostConfig::config_path()?;
    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let example_config = r#"# Roost configuration
# Edit this file to add servers and accounts

[servers.local]
host = "localhost"
port = 25565

[accounts.afk]
username = "BotAFK"
# password = "auth plugin password; omit to be prompted at startup"

[reconnect]
enabled = true
delay_secs = 120
throttled_delay_secs = 600

[anti_idle]
enabled = true
interval_secs = 30
"#;

    fs::write(&config_path, example_config)?;
    eprintln!("Config file created at: {}", config_path.display());
    eprintln!("Please edit it with your server and account details, then run roost again.");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.log_file)?;

    info!("Starting roost...");

    let config = match RoostConfig::load() {
        Ok(config) => config,
        Err(_) => {
            info!("No config found, creating example config");
            create_example_config()?;
            return Ok(());
        }
    };

    let server_name = cli.server.unwrap_or_else(|| "local".to_string());
    let account_name = cli.account.unwrap_or_else(|| "afk".to_string());

    let server = config.servers.get(&server_name).ok_or_else(|| {
        let available = config.servers.keys().cloned().collect::<Vec<_>>().join(", ");
        format!("Server '{}' not found. Available servers: {}", server_name, available)
    })?;
    let account = config.accounts.get(&account_name).ok_or_else(|| {
        let available = config.accounts.keys().cloned().collect::<Vec<_>>().join(", ");
        format!("Account '{}' not found. Available accounts: {}", account_name, available)
    })?;

    let password = match &account.password {
        Some(password) => password.clone(),
        None => {
            let password = console::prompt_password()?;
            if password.is_empty() {
                return Err("no password entered".into());
            }
            password
        }
    };

    info!("Connecting to {} with account {}", server_name, account.username);

    let client_config = ClientConfig::new(0, server.clone(), account.username.clone(), password.clone())
        .with_reconnect(config.reconnect.clone());

    let anti_idle = config.anti_idle.clone();
    let script_factory = move |ctx: &ConsumerContext| {
        let mut host = ScriptHost::new(ctx.action_tx.clone());
        host.register_script(Box::new(AutoAuthScript::new(password.clone())));
        if anti_idle.enabled {
            host.register_script(Box::new(AntiAfkScript::new(Duration::from_secs(
                anti_idle.interval_secs,
            ))));
        }
        Box::new(ScriptConsumer::new(host)) as Box<dyn EventConsumer>
    };

    let (console_rx, _relay) = console::spawn_stdin_relay();

    BotRunner::builder()
        .with_client(client_config)
        .with_consumer(LoggingConsumer::from_factory())
        .with_consumer(script_factory)
        .with_console_input(console_rx)
        .build()?
        .run()
        .await;

    info!("roost stopped");
    Ok(())
}
