//! Photos of an event: capture upload, gallery, deletion and zip export.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/events/{id}/photos` | No | Gallery, most recent first |
//! | POST | `/api/events/{id}/photos` | No | Submit a JPEG capture |
//! | DELETE | `/api/host/events/{id}/photos/{photo_id}` | Yes | Delete one photo |
//! | POST | `/api/host/events/{id}/export` | Yes | Download photos as a zip |

pub mod dtos;
pub mod gallery;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod selection;
pub mod services;

pub use gallery::Gallery;
pub use repositories::{PgPhotoRepository, PhotoRepository};
pub use selection::Selection;
pub use services::PhotoService;
