//! Events: host-owned gallery sessions that guests join by code or QR.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/events/access` | No | Resolve a typed event code |
//! | GET | `/api/events/{id}` | No | Guest view of an event |
//! | GET | `/api/events/{id}/qr` | No | Join QR code (SVG) |
//! | POST | `/api/host/events` | Yes | Create an event |
//! | GET | `/api/host/events` | Yes | List the caller's events |
//! | GET | `/api/host/events/{id}` | Yes | Host view of an owned event |
//! | DELETE | `/api/host/events/{id}` | Yes | Delete an event and all its photos |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{EventRepository, PgEventRepository};
pub use services::EventService;
