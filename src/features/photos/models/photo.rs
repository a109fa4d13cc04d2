use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::shared::constants::PHOTO_EXTENSION;

/// Row as stored in the `photos` table
#[derive(Debug, Clone, FromRow)]
pub struct PhotoRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub event_id: Uuid,
    pub storage_path: String,
    pub taken_by: Option<String>,
}

/// Metadata of one captured image; the bytes live in the object store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub id: Uuid,
    pub event_id: Uuid,
    /// Object store locator, `{event_id}/{file}`
    pub storage_path: String,
    pub taken_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub event_id: Uuid,
    pub storage_path: String,
    pub taken_by: Option<String>,
}

impl Photo {
    /// Locator for a capture taken at `taken_at` (millisecond precision).
    ///
    /// Two captures in the same millisecond share a locator.
    pub fn storage_path_for(event_id: Uuid, taken_at: DateTime<Utc>) -> String {
        format!(
            "{}/{}.{}",
            event_id,
            taken_at.timestamp_millis(),
            PHOTO_EXTENSION
        )
    }

    /// Final segment of the storage path, used as the file name on export
    pub fn file_name(&self) -> &str {
        self.storage_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.storage_path)
    }
}

impl TryFrom<PhotoRow> for Photo {
    type Error = AppError;

    fn try_from(row: PhotoRow) -> Result<Self, Self::Error> {
        let folder = format!("{}/", row.event_id);
        let file = row.storage_path.strip_prefix(&folder).unwrap_or("");

        if file.trim().is_empty() || file.contains('/') {
            return Err(AppError::Internal(format!(
                "Photo {} has storage path '{}' outside its event folder",
                row.id, row.storage_path
            )));
        }

        Ok(Photo {
            id: row.id,
            event_id: row.event_id,
            storage_path: row.storage_path,
            taken_by: row.taken_by,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn row(event_id: Uuid, storage_path: &str) -> PhotoRow {
        PhotoRow {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            event_id,
            storage_path: storage_path.to_string(),
            taken_by: Some("guest".to_string()),
        }
    }

    #[test]
    fn test_storage_path_uses_millis() {
        let event_id = Uuid::new_v4();
        let taken_at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();

        assert_eq!(
            Photo::storage_path_for(event_id, taken_at),
            format!("{}/1700000000123.jpg", event_id)
        );
    }

    #[test]
    fn test_file_name_is_last_segment() {
        let event_id = Uuid::new_v4();
        let photo = Photo::try_from(row(event_id, &format!("{}/42.jpg", event_id))).unwrap();
        assert_eq!(photo.file_name(), "42.jpg");
    }

    #[test]
    fn test_rows_outside_event_folder_are_rejected() {
        let event_id = Uuid::new_v4();
        let other = Uuid::new_v4();

        assert!(Photo::try_from(row(event_id, "")).is_err());
        assert!(Photo::try_from(row(event_id, &format!("{}/", event_id))).is_err());
        assert!(Photo::try_from(row(event_id, &format!("{}/1.jpg", other))).is_err());
        assert!(Photo::try_from(row(event_id, &format!("{}/a/1.jpg", event_id))).is_err());
    }
}
