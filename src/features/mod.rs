pub mod auth;
pub mod capture;
pub mod events;
pub mod photos;
