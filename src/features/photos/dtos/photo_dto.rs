use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::photos::models::Photo;

/// Response DTO for a photo in the gallery
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PhotoResponseDto {
    pub id: Uuid,
    pub event_id: Uuid,
    /// Object store locator, `{event_id}/{file}.jpg`
    pub storage_path: String,
    /// Public URL of the image
    pub url: String,
    pub taken_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl PhotoResponseDto {
    pub fn from_photo(photo: Photo, url: String) -> Self {
        Self {
            id: photo.id,
            event_id: photo.event_id,
            storage_path: photo.storage_path,
            url,
            taken_by: photo.taken_by,
            created_at: photo.created_at,
        }
    }
}

/// Multipart form for submitting a capture (used for OpenAPI docs)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadPhotoDto {
    /// JPEG-encoded capture
    #[schema(format = Binary, content_media_type = "image/jpeg")]
    pub file: String,
    /// Contributor tag, defaults to "guest"
    #[schema(example = "guest")]
    pub taken_by: Option<String>,
}

/// Request DTO for exporting photos
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExportRequestDto {
    /// Selected photos; empty exports the whole gallery
    #[serde(default)]
    pub photo_ids: Vec<Uuid>,
}

/// Response DTO for photo deletion
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletePhotoResponseDto {
    pub deleted: bool,
}
