//! Host identity verification.
//!
//! Accounts and sessions live in an external identity provider. This feature
//! only verifies the bearer access tokens it issues and exposes the resulting
//! identity to handlers.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/auth/me` | Yes | Current host identity |

mod validator;

pub mod handlers;
pub mod model;
pub mod routes;

pub use validator::JwtValidator;
