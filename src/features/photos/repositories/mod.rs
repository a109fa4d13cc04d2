mod photo_repository;

pub use photo_repository::{PgPhotoRepository, PhotoRepository};
