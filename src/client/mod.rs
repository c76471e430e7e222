pub mod client;
pub mod connection;
pub mod events;
pub mod session;

pub use client::{Client, SessionEnd};
pub use connection::{Connection, ServerInfo};
pub use events::{ClientAction, ClientEvent, ClientSystemEvent, GameEvent};
pub use session::{Account, ClientSession, Position, SessionState};
