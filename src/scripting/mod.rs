pub mod context;
pub mod host;
pub mod script;

pub use context::ScriptContext;
pub use host::{ScriptConsumer, ScriptHost};
pub use script::{EventFilter, Script};
