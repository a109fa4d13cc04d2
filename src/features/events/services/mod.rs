mod event_service;

pub use event_service::{ensure_owner, EventService};
