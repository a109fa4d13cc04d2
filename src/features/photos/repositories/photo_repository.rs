use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::photos::models::{NewPhoto, Photo, PhotoRow};
use crate::shared::rows::map_rows;

/// Record-store access for photo metadata
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    async fn insert(&self, photo: NewPhoto) -> Result<Photo>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Photo>>;

    /// All photos of an event, most recent first
    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Photo>>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Delete every photo record of an event, returning how many were removed
    async fn delete_by_event(&self, event_id: Uuid) -> Result<u64>;
}

pub struct PgPhotoRepository {
    pool: PgPool,
}

impl PgPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotoRepository for PgPhotoRepository {
    async fn insert(&self, photo: NewPhoto) -> Result<Photo> {
        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            INSERT INTO photos (event_id, storage_path, taken_by)
            VALUES ($1, $2, $3)
            RETURNING id, created_at, event_id, storage_path, taken_by
            "#,
        )
        .bind(photo.event_id)
        .bind(&photo.storage_path)
        .bind(&photo.taken_by)
        .fetch_one(&self.pool)
        .await?;

        Photo::try_from(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Photo>> {
        let row = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT id, created_at, event_id, storage_path, taken_by
            FROM photos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Photo::try_from).transpose()
    }

    async fn list_by_event(&self, event_id: Uuid) -> Result<Vec<Photo>> {
        let rows = sqlx::query_as::<_, PhotoRow>(
            r#"
            SELECT id, created_at, event_id, storage_path, taken_by
            FROM photos
            WHERE event_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(map_rows(rows, "photo"))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_by_event(&self, event_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM photos WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
