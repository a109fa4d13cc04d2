use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::events::models::Event;
use crate::features::events::repositories::EventRepository;
use crate::features::events::services::ensure_owner;
use crate::features::photos::models::{NewPhoto, Photo};
use crate::features::photos::repositories::PhotoRepository;
use crate::features::photos::services::{build_archive, ExportArchive};
use crate::modules::storage::ObjectStore;
use crate::shared::constants::{
    DEFAULT_CONTRIBUTOR, MSG_EVENT_NOT_FOUND, MSG_NO_PHOTOS_TO_EXPORT, MSG_PHOTO_NOT_FOUND,
    PHOTO_CONTENT_TYPE,
};

/// Service for the photos of an event: capture upload, gallery listing,
/// deletion and zip export
pub struct PhotoService {
    events: Arc<dyn EventRepository>,
    photos: Arc<dyn PhotoRepository>,
    store: Arc<dyn ObjectStore>,
}

impl PhotoService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        photos: Arc<dyn PhotoRepository>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            events,
            photos,
            store,
        }
    }

    async fn find_event(&self, event_id: Uuid) -> Result<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(MSG_EVENT_NOT_FOUND.to_string()))
    }

    /// Public URL of a photo's image
    pub fn public_url(&self, photo: &Photo) -> String {
        self.store.public_url(&photo.storage_path)
    }

    /// All photos of an event, most recent first
    pub async fn list_photos(&self, event_id: Uuid) -> Result<Vec<Photo>> {
        let event = self.find_event(event_id).await?;
        self.photos.list_by_event(event.id).await
    }

    /// Persist an encoded capture: object put, then record insert.
    ///
    /// The two calls are not atomic. When the insert fails the stored object
    /// is left behind and the insert error is returned.
    pub async fn submit_capture(
        &self,
        event_id: Uuid,
        jpeg: Vec<u8>,
        taken_by: Option<String>,
    ) -> Result<Photo> {
        let event = self.find_event(event_id).await?;

        let storage_path = Photo::storage_path_for(event.id, Utc::now());
        let size = jpeg.len();

        self.store
            .put(&storage_path, jpeg, PHOTO_CONTENT_TYPE)
            .await?;
        debug!("Stored capture {} ({} bytes)", storage_path, size);

        let taken_by = taken_by
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTRIBUTOR.to_string());

        let photo = self
            .photos
            .insert(NewPhoto {
                event_id: event.id,
                storage_path: storage_path.clone(),
                taken_by: Some(taken_by),
            })
            .await
            .map_err(|e| {
                warn!(
                    "Photo record insert failed, object {} is orphaned: {}",
                    storage_path, e
                );
                e
            })?;

        info!(
            "Photo captured: id={}, event={}, path={}",
            photo.id, photo.event_id, photo.storage_path
        );

        Ok(photo)
    }

    /// Delete one photo of an owned event.
    ///
    /// The stored object goes first; if that fails the record is kept.
    pub async fn delete_photo(
        &self,
        event_id: Uuid,
        photo_id: Uuid,
        host: &AuthenticatedUser,
    ) -> Result<()> {
        let event = self.find_event(event_id).await?;
        ensure_owner(&event, host)?;

        let photo = self
            .photos
            .find_by_id(photo_id)
            .await?
            .filter(|photo| photo.event_id == event.id)
            .ok_or_else(|| AppError::NotFound(MSG_PHOTO_NOT_FOUND.to_string()))?;

        self.store
            .remove(std::slice::from_ref(&photo.storage_path))
            .await?;
        self.photos.delete(photo.id).await?;

        info!("Photo deleted: id={}, event={}", photo.id, event.id);

        Ok(())
    }

    /// Zip the given photos of `event`.
    ///
    /// Bytes are fetched one photo at a time through the public URL; the first
    /// failed fetch aborts the export. An empty target list is rejected before
    /// any fetch.
    pub async fn export(&self, event: &Event, targets: &[Photo]) -> Result<ExportArchive> {
        if targets.is_empty() {
            return Err(AppError::BadRequest(MSG_NO_PHOTOS_TO_EXPORT.to_string()));
        }

        let mut files = Vec::with_capacity(targets.len());
        for photo in targets {
            let bytes = self.store.fetch(&photo.storage_path).await?;
            files.push((photo.file_name().to_string(), bytes));
        }

        let archive = build_archive(&event.name, &files)?;

        info!(
            "Exported {} photos of event {} as {}",
            archive.entries, event.id, archive.file_name
        );

        Ok(archive)
    }

    /// Export for the event owner.
    ///
    /// `photo_ids` selects a subset of the gallery; empty means every photo.
    /// Ids not in the gallery are ignored.
    pub async fn export_for_owner(
        &self,
        event_id: Uuid,
        host: &AuthenticatedUser,
        photo_ids: &[Uuid],
    ) -> Result<ExportArchive> {
        let event = self.find_event(event_id).await?;
        ensure_owner(&event, host)?;

        let photos = self.photos.list_by_event(event.id).await?;
        let targets: Vec<Photo> = if photo_ids.is_empty() {
            photos
        } else {
            photos
                .into_iter()
                .filter(|photo| photo_ids.contains(&photo.id))
                .collect()
        };

        self.export(&event, &targets).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{host, TestBackend};
    use std::io::Cursor;
    use zip::ZipArchive;

    fn entry_names(bytes: Vec<u8>) -> Vec<String> {
        let zip = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = zip.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_list_photos_newest_first() {
        let backend = TestBackend::new();
        let event = backend.seed_event(host().id, "Festa").await;
        let first = backend.seed_photo(event.id, b"1").await;
        let second = backend.seed_photo(event.id, b"2").await;

        let photos = backend.photo_service().list_photos(event.id).await.unwrap();
        let ids: Vec<_> = photos.iter().map(|p| p.id).collect();

        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_list_photos_unknown_event() {
        let backend = TestBackend::new();
        let result = backend.photo_service().list_photos(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_submit_capture_stores_bytes_and_record() {
        let backend = TestBackend::new();
        let event = backend.seed_event(host().id, "Festa").await;
        let jpeg = vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3];

        let photo = backend
            .photo_service()
            .submit_capture(event.id, jpeg.clone(), None)
            .await
            .unwrap();

        assert_eq!(photo.taken_by.as_deref(), Some(DEFAULT_CONTRIBUTOR));
        assert!(photo.storage_path.starts_with(&format!("{}/", event.id)));
        assert!(photo.storage_path.ends_with(".jpg"));
        assert_eq!(backend.store.get(&photo.storage_path), Some(jpeg));
        assert_eq!(
            backend.store.content_type(&photo.storage_path).as_deref(),
            Some(PHOTO_CONTENT_TYPE)
        );
        assert_eq!(backend.photos.by_event(event.id).len(), 1);
    }

    #[tokio::test]
    async fn test_submit_capture_insert_failure_orphans_object() {
        let backend = TestBackend::new();
        let event = backend.seed_event(host().id, "Festa").await;
        backend.photos.fail_insert(true);

        let result = backend
            .photo_service()
            .submit_capture(event.id, b"jpeg".to_vec(), Some("Ana".to_string()))
            .await;

        assert!(result.is_err());
        assert_eq!(backend.store.len(), 1);
        assert!(backend.photos.by_event(event.id).is_empty());
    }

    #[tokio::test]
    async fn test_submit_capture_put_failure_skips_insert() {
        let backend = TestBackend::new();
        let event = backend.seed_event(host().id, "Festa").await;
        backend.store.fail_put(true);

        let result = backend
            .photo_service()
            .submit_capture(event.id, b"jpeg".to_vec(), None)
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(backend.photos.by_event(event.id).is_empty());
    }

    #[tokio::test]
    async fn test_delete_photo_removes_object_then_record() {
        let backend = TestBackend::new();
        let owner = host();
        let event = backend.seed_event(owner.id, "Festa").await;
        let photo = backend.seed_photo(event.id, b"jpeg").await;

        backend
            .photo_service()
            .delete_photo(event.id, photo.id, &owner)
            .await
            .unwrap();

        assert!(!backend.store.contains(&photo.storage_path));
        assert!(backend.photos.by_event(event.id).is_empty());
    }

    #[tokio::test]
    async fn test_delete_photo_storage_failure_keeps_record() {
        let backend = TestBackend::new();
        let owner = host();
        let event = backend.seed_event(owner.id, "Festa").await;
        let photo = backend.seed_photo(event.id, b"jpeg").await;
        backend.store.fail_remove(true);

        let result = backend
            .photo_service()
            .delete_photo(event.id, photo.id, &owner)
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(backend.store.contains(&photo.storage_path));
        assert_eq!(backend.photos.by_event(event.id).len(), 1);
    }

    #[tokio::test]
    async fn test_delete_photo_from_other_event_is_not_found() {
        let backend = TestBackend::new();
        let owner = host();
        let event = backend.seed_event(owner.id, "Festa").await;
        let other = backend.seed_event(owner.id, "Outra").await;
        let photo = backend.seed_photo(other.id, b"jpeg").await;

        let result = backend
            .photo_service()
            .delete_photo(event.id, photo.id, &owner)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(backend.store.contains(&photo.storage_path));
    }

    #[tokio::test]
    async fn test_delete_photo_requires_owner() {
        let backend = TestBackend::new();
        let event = backend.seed_event(host().id, "Festa").await;
        let photo = backend.seed_photo(event.id, b"jpeg").await;

        let result = backend
            .photo_service()
            .delete_photo(event.id, photo.id, &host())
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(backend.photos.by_event(event.id).len(), 1);
    }

    #[tokio::test]
    async fn test_export_selected_subset() {
        let backend = TestBackend::new();
        let owner = host();
        let event = backend.seed_event(owner.id, "Casamento").await;
        let a = backend.seed_photo(event.id, b"a").await;
        let _b = backend.seed_photo(event.id, b"b").await;
        let c = backend.seed_photo(event.id, b"c").await;

        let archive = backend
            .photo_service()
            .export_for_owner(event.id, &owner, &[a.id, c.id])
            .await
            .unwrap();

        assert_eq!(archive.file_name, "casamento_fotos.zip");
        assert_eq!(archive.entries, 2);

        let mut expected = vec![
            format!("casamento/{}", a.file_name()),
            format!("casamento/{}", c.file_name()),
        ];
        expected.sort();
        assert_eq!(entry_names(archive.bytes), expected);
    }

    #[tokio::test]
    async fn test_export_empty_selection_takes_whole_gallery() {
        let backend = TestBackend::new();
        let owner = host();
        let event = backend.seed_event(owner.id, "Casamento").await;
        for _ in 0..3 {
            backend.seed_photo(event.id, b"x").await;
        }

        let archive = backend
            .photo_service()
            .export_for_owner(event.id, &owner, &[])
            .await
            .unwrap();

        assert_eq!(archive.entries, 3);
        assert_eq!(entry_names(archive.bytes).len(), 3);
    }

    #[tokio::test]
    async fn test_export_without_photos_makes_no_fetch() {
        let backend = TestBackend::new();
        let owner = host();
        let event = backend.seed_event(owner.id, "Vazio").await;

        let result = backend
            .photo_service()
            .export_for_owner(event.id, &owner, &[])
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert_eq!(msg, MSG_NO_PHOTOS_TO_EXPORT),
            other => panic!("unexpected result: {:?}", other.map(|a| a.file_name)),
        }
        assert_eq!(backend.store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_export_aborts_on_first_failed_fetch() {
        let backend = TestBackend::new();
        let owner = host();
        let event = backend.seed_event(owner.id, "Festa").await;
        let a = backend.seed_photo(event.id, b"a").await;
        backend.seed_photo(event.id, b"b").await;
        backend.store.forget(&a.storage_path);

        let result = backend
            .photo_service()
            .export_for_owner(event.id, &owner, &[])
            .await;

        assert!(matches!(result, Err(AppError::Storage(_))));
    }

    #[tokio::test]
    async fn test_export_requires_owner() {
        let backend = TestBackend::new();
        let event = backend.seed_event(host().id, "Festa").await;
        backend.seed_photo(event.id, b"a").await;

        let result = backend
            .photo_service()
            .export_for_owner(event.id, &host(), &[])
            .await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
        assert_eq!(backend.store.fetch_count(), 0);
    }
}
