use async_trait::async_trait;

use crate::core::error::Result;

/// Binary store addressed by string path.
///
/// Paths are storage locators as recorded on a photo (`{eventId}/{file}.jpg`);
/// implementations map them onto their own key layout.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `path`, overwriting any existing object
    async fn put(&self, path: &str, data: Vec<u8>, content_type: &str) -> Result<()>;

    /// Fetch the bytes behind `path` through its public URL
    async fn fetch(&self, path: &str) -> Result<Vec<u8>>;

    /// Remove a batch of objects in one call. A key that could not be
    /// removed fails the whole call.
    async fn remove(&self, paths: &[String]) -> Result<()>;

    /// Publicly readable URL for `path`
    fn public_url(&self, path: &str) -> String;
}
