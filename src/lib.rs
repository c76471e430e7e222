pub mod client;
pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod proto;
pub mod runner;
pub mod scripting;
pub mod scripts;
