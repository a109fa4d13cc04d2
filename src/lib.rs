//! EventSnap: event photo sharing.
//!
//! Hosts create events and share a join code or QR; guests capture photos
//! into the event gallery; hosts curate, export and delete.

pub mod core;
pub mod features;
pub mod modules;
pub mod shared;
