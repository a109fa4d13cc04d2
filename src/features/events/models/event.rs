use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::AppError;

/// Row as stored in the `events` table
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub description: Option<String>,
    pub user_id: Uuid,
    pub is_public: bool,
}

/// A host-created gallery session. `id` doubles as the guest join code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when creating an event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub is_public: bool,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        if row.name.trim().is_empty() {
            return Err(AppError::Internal(format!(
                "Event {} has a blank name",
                row.id
            )));
        }

        Ok(Event {
            id: row.id,
            name: row.name,
            description: row.description.filter(|d| !d.trim().is_empty()),
            owner_id: row.user_id,
            is_public: row.is_public,
            created_at: row.created_at,
        })
    }
}
