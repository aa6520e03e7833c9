mod device;
mod device_owner;
mod event;
mod schedule;
mod user;

pub use device::{Device, DeviceTable};
pub use device_owner::{DeviceOwner, DeviceOwnerTable};
pub use event::{Event, EventTable};
pub use schedule::{ClockTime, Schedule, ScheduleTable};
pub use user::{User, UserTable};

pub trait Table {
    /// The name of the table
    fn name(&self) -> &'static str;

    /// The SQL statement to create the table
    fn create(&self) -> String;

    /// The SQL statement to dispose the table
    fn dispose(&self) -> String;

    /// The dependencies of the table
    fn dependencies(&self) -> Vec<&'static str>;
}
