use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::events::{dtos as events_dtos, handlers as events_handlers};
use crate::features::photos::{dtos as photos_dtos, handlers as photos_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::get_me,
        // Events (guest)
        events_handlers::access_event,
        events_handlers::get_event,
        events_handlers::get_event_qr,
        // Events (host)
        events_handlers::create_event,
        events_handlers::list_events,
        events_handlers::get_owned_event,
        events_handlers::delete_event,
        // Photos (guest)
        photos_handlers::list_photos,
        photos_handlers::upload_photo,
        // Photos (host)
        photos_handlers::delete_photo,
        photos_handlers::export_photos,
    ),
    components(
        schemas(
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            ApiResponse<auth::model::AuthenticatedUser>,
            // Events
            events_dtos::CreateEventDto,
            events_dtos::AccessEventDto,
            events_dtos::EventResponseDto,
            events_dtos::DeleteEventResponseDto,
            ApiResponse<events_dtos::EventResponseDto>,
            ApiResponse<Vec<events_dtos::EventResponseDto>>,
            ApiResponse<events_dtos::DeleteEventResponseDto>,
            // Photos
            photos_dtos::PhotoResponseDto,
            photos_dtos::UploadPhotoDto,
            photos_dtos::ExportRequestDto,
            photos_dtos::DeletePhotoResponseDto,
            ApiResponse<photos_dtos::PhotoResponseDto>,
            ApiResponse<Vec<photos_dtos::PhotoResponseDto>>,
            ApiResponse<photos_dtos::DeletePhotoResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Host identity"),
        (name = "events", description = "Event creation, guest access and cascade delete"),
        (name = "photos", description = "Capture upload, gallery and zip export"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "EventSnap API",
        version = "0.1.0",
        description = "API documentation for EventSnap",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
