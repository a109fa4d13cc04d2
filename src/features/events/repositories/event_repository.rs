use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::events::models::{Event, EventRow, NewEvent};
use crate::shared::rows::map_rows;

/// Record-store access for events
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: NewEvent) -> Result<Event>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>>;

    /// Events owned by `owner_id`, most recent first
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Event>>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn insert(&self, event: NewEvent) -> Result<Event> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (name, description, user_id, is_public)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at, name, description, user_id, is_public
            "#,
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.owner_id)
        .bind(event.is_public)
        .fetch_one(&self.pool)
        .await?;

        Event::try_from(row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, created_at, name, description, user_id, is_public
            FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Event::try_from).transpose()
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, created_at, name, description, user_id, is_public
            FROM events
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(map_rows(rows, "event"))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
