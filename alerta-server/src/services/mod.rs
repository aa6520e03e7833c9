mod device_registry;
mod event_pipeline;
mod event_recorder;
mod notification_dispatcher;
mod schedule_evaluator;

pub mod push;

pub use device_registry::*;
pub use event_pipeline::*;
pub use event_recorder::*;
pub use notification_dispatcher::*;
pub use schedule_evaluator::*;
