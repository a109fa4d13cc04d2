use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::events::models::Event;

/// Request DTO for creating an event
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventDto {
    /// Event name shown to guests
    #[validate(length(min = 1, max = 120, message = "name must be 1-120 characters"))]
    #[schema(example = "Casamento João e Maria")]
    pub name: String,
    /// Optional details about the event
    #[validate(length(max = 2000, message = "description must be at most 2000 characters"))]
    pub description: Option<String>,
    /// Whether every guest may see the gallery (defaults to true)
    #[serde(default = "default_is_public")]
    pub is_public: bool,
}

fn default_is_public() -> bool {
    true
}

/// Request DTO for the guest access form
#[derive(Debug, Deserialize, ToSchema)]
pub struct AccessEventDto {
    /// Event code as typed or scanned by the guest
    #[serde(default)]
    pub code: String,
}

/// Response DTO for event operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventResponseDto {
    /// Event id, also the join code
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    /// Link encoded in the event QR code
    pub join_url: String,
}

impl EventResponseDto {
    pub fn from_event(event: Event, public_base_url: &str) -> Self {
        Self {
            join_url: join_url(public_base_url, event.id),
            id: event.id,
            name: event.name,
            description: event.description,
            is_public: event.is_public,
            created_at: event.created_at,
        }
    }
}

/// Response DTO for event deletion
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteEventResponseDto {
    pub deleted: bool,
    /// Number of photo records removed with the event
    pub photos_removed: u64,
}

/// Guest-facing URL of an event
pub fn join_url(public_base_url: &str, event_id: Uuid) -> String {
    format!("{}/event/{}", public_base_url.trim_end_matches('/'), event_id)
}
