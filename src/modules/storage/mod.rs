//! Object storage for photo bytes
//!
//! The [`ObjectStore`] trait is the seam the services depend on; the
//! MinIO/S3-compatible client is the production implementation.

mod minio_client;
mod object_store;

pub use minio_client::MinIOClient;
pub use object_store::ObjectStore;
