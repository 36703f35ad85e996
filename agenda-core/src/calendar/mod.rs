//! Calendar events held in memory, with a single selected event.

mod event;
mod state;
mod store;

pub use event::{CalendarEvent, EventId, EventUser};
pub use state::{CalendarAction, CalendarState};
pub use store::CalendarStore;
