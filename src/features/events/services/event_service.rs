use std::sync::Arc;

use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::events::dtos::{join_url, CreateEventDto};
use crate::features::events::models::{Event, NewEvent};
use crate::features::events::repositories::EventRepository;
use crate::features::photos::repositories::PhotoRepository;
use crate::modules::storage::ObjectStore;
use crate::shared::constants::{
    MSG_EVENT_CODE_REQUIRED, MSG_EVENT_NOT_FOUND, MSG_NOT_EVENT_OWNER, QR_CODE_MIN_SIZE,
};

/// Service for event lifecycle: creation, lookup, guest access and cascade delete
pub struct EventService {
    events: Arc<dyn EventRepository>,
    photos: Arc<dyn PhotoRepository>,
    store: Arc<dyn ObjectStore>,
    public_base_url: String,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        photos: Arc<dyn PhotoRepository>,
        store: Arc<dyn ObjectStore>,
        public_base_url: String,
    ) -> Self {
        Self {
            events,
            photos,
            store,
            public_base_url,
        }
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }

    /// Create an event owned by `host`
    pub async fn create_event(&self, host: &AuthenticatedUser, dto: CreateEventDto) -> Result<Event> {
        let name = dto.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("name must not be blank".to_string()));
        }

        let description = dto
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let event = self
            .events
            .insert(NewEvent {
                name,
                description,
                owner_id: host.id,
                is_public: dto.is_public,
            })
            .await?;

        info!(
            "Event created: id={}, owner={}, public={}",
            event.id, event.owner_id, event.is_public
        );

        Ok(event)
    }

    /// Events owned by `host`, most recent first
    pub async fn list_owned(&self, host: &AuthenticatedUser) -> Result<Vec<Event>> {
        self.events.list_by_owner(host.id).await
    }

    /// Look an event up by id
    pub async fn get_event(&self, id: Uuid) -> Result<Event> {
        self.events
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(MSG_EVENT_NOT_FOUND.to_string()))
    }

    /// Resolve the code a guest typed on the access form.
    ///
    /// A blank code is rejected before the record store is queried.
    pub async fn access_event(&self, code: &str) -> Result<Event> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::Validation(MSG_EVENT_CODE_REQUIRED.to_string()));
        }

        let id = Uuid::parse_str(code)
            .map_err(|_| AppError::NotFound(MSG_EVENT_NOT_FOUND.to_string()))?;

        self.get_event(id).await
    }

    /// Look an event up for its host; any other account is refused
    pub async fn get_owned_event(&self, id: Uuid, host: &AuthenticatedUser) -> Result<Event> {
        let event = self.get_event(id).await?;
        ensure_owner(&event, host)?;
        Ok(event)
    }

    /// Delete an event with all of its photos.
    ///
    /// Order: stored objects (one batch), photo records (one batch), event
    /// record. The first failing stage aborts the rest; stages already
    /// committed are not rolled back. Returns the number of photo records
    /// removed.
    pub async fn delete_event(&self, id: Uuid, host: &AuthenticatedUser) -> Result<u64> {
        let event = self.get_owned_event(id, host).await?;

        let paths: Vec<String> = self
            .photos
            .list_by_event(event.id)
            .await?
            .into_iter()
            .map(|photo| photo.storage_path)
            .collect();

        if !paths.is_empty() {
            self.store.remove(&paths).await?;
            debug!("Removed {} objects of event {}", paths.len(), event.id);
        }

        let photos_removed = self.photos.delete_by_event(event.id).await?;
        self.events.delete(event.id).await?;

        info!(
            "Event deleted: id={}, photos_removed={}",
            event.id, photos_removed
        );

        Ok(photos_removed)
    }

    /// SVG QR code pointing guests at the event's join URL
    pub async fn join_qr_svg(&self, id: Uuid) -> Result<String> {
        let event = self.get_event(id).await?;
        render_qr_svg(&join_url(&self.public_base_url, event.id))
    }
}

/// Refuse anyone but the event's owner
pub fn ensure_owner(event: &Event, host: &AuthenticatedUser) -> Result<()> {
    if host.owns(event.owner_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(MSG_NOT_EVENT_OWNER.to_string()))
    }
}

fn render_qr_svg(url: &str) -> Result<String> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::H)
        .map_err(|e| AppError::Internal(format!("Failed to encode QR code: {}", e)))?;

    Ok(code
        .render::<svg::Color>()
        .min_dimensions(QR_CODE_MIN_SIZE, QR_CODE_MIN_SIZE)
        .quiet_zone(true)
        .build())
}
