pub mod builder;
pub mod event_bus;
pub mod event_consumer;
pub mod event_wrapper;
pub mod supervisor;

pub use builder::{BotRunner, BotRunnerBuilder, BuildError};
pub use event_bus::{EventBus, EventContext, EventEnvelope, EventSource, EventType};
pub use event_consumer::{ConsumerContext, ConsumerFactory, EventConsumer, LoggingConsumer};
pub use event_wrapper::EventWrapper;
