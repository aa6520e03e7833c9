mod device;
mod event;
mod schedule;
mod user;

pub use device::*;
pub use event::*;
pub use schedule::*;
pub use user::*;

/// Row identifier of schedules and events.
pub type Id = i64;

/// Opaque owner identity.
pub type OwnerId = String;
