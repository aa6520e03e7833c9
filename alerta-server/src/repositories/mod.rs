mod device;
mod event;
mod schedule;
mod user;

pub use device::{DeviceOwnerRepository, DeviceRepository};
pub use event::EventRepository;
pub use schedule::ScheduleRepository;
pub use user::UserRepository;
