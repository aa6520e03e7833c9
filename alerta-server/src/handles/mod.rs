mod docs_handle;
mod esp_handle;
mod event_handle;
mod schedule_handle;
mod user_handle;

pub use docs_handle::*;
pub use esp_handle::*;
pub use event_handle::*;
pub use schedule_handle::*;
pub use user_handle::*;
