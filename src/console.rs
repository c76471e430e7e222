//! Console interaction: the startup password prompt and the stdin chat relay.

use std::io::{self, Write};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::client::events::ClientAction;

/// Prompt for the auth-plugin password on stdin. Called before the runtime
/// does anything else, so plain blocking io is fine here.
pub fn prompt_password() -> io::Result<String> {
    print!("Enter the bot account password (for /login and /register): ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Relay lines typed on stdin into the game chat channel. Runs for the life
/// of the process; the receiving side decides what to do when no session is
/// active.
pub fn spawn_stdin_relay() -> (mpsc::UnboundedReceiver<ClientAction>, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if tx
                        .send(ClientAction::SendChat {
                            message: line.to_string(),
                        })
                        .is_err()
                    {
                        break;
                    }
                }
                Ok(None) => {
                    debug!(target: "events", "stdin closed, console relay stopping");
                    break;
                }
                Err(e) => {
                    warn!(target: "events", "Console read error: {}", e);
                    break;
                }
            }
        }
    });
    (rx, handle)
}
