mod event;

pub use event::{Event, EventRow, NewEvent};
