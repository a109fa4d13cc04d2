use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::events::dtos::{
    AccessEventDto, CreateEventDto, DeleteEventResponseDto, EventResponseDto,
};
use crate::features::events::services::EventService;
use crate::shared::types::{ApiResponse, Meta};

/// Resolve an event code typed by a guest
#[utoipa::path(
    post,
    path = "/api/events/access",
    tag = "events",
    request_body = AccessEventDto,
    responses(
        (status = 200, description = "Event found", body = ApiResponse<EventResponseDto>),
        (status = 400, description = "Empty event code"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn access_event(
    State(service): State<Arc<EventService>>,
    AppJson(dto): AppJson<AccessEventDto>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    let event = service.access_event(&dto.code).await?;
    Ok(Json(ApiResponse::success(
        Some(EventResponseDto::from_event(event, service.public_base_url())),
        None,
        None,
    )))
}

/// Guest view of an event
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "events",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event found", body = ApiResponse<EventResponseDto>),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event(
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    let event = service.get_event(id).await?;
    Ok(Json(ApiResponse::success(
        Some(EventResponseDto::from_event(event, service.public_base_url())),
        None,
        None,
    )))
}

/// QR code encoding the event's join URL
#[utoipa::path(
    get,
    path = "/api/events/{id}/qr",
    tag = "events",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "SVG image", content_type = "image/svg+xml", body = String),
        (status = 404, description = "Event not found")
    )
)]
pub async fn get_event_qr(
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let svg = service.join_qr_svg(id).await?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response())
}

/// Create an event owned by the caller
#[utoipa::path(
    post,
    path = "/api/host/events",
    tag = "events",
    request_body = CreateEventDto,
    responses(
        (status = 201, description = "Event created", body = ApiResponse<EventResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 400, description = "Validation error")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_event(
    user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
    AppJson(dto): AppJson<CreateEventDto>,
) -> Result<(StatusCode, Json<ApiResponse<EventResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let event = service.create_event(&user, dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(EventResponseDto::from_event(event, service.public_base_url())),
            Some("Event created successfully".to_string()),
            None,
        )),
    ))
}

/// List the caller's events, most recent first
#[utoipa::path(
    get,
    path = "/api/host/events",
    tag = "events",
    responses(
        (status = 200, description = "Owned events", body = ApiResponse<Vec<EventResponseDto>>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_events(
    user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
) -> Result<Json<ApiResponse<Vec<EventResponseDto>>>> {
    let events: Vec<EventResponseDto> = service
        .list_owned(&user)
        .await?
        .into_iter()
        .map(|event| EventResponseDto::from_event(event, service.public_base_url()))
        .collect();

    let meta = Meta::total(events.len());
    Ok(Json(ApiResponse::success(Some(events), None, Some(meta))))
}

/// Host view of an owned event
#[utoipa::path(
    get,
    path = "/api/host/events/{id}",
    tag = "events",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event found", body = ApiResponse<EventResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the event owner"),
        (status = 404, description = "Event not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_owned_event(
    user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EventResponseDto>>> {
    let event = service.get_owned_event(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(EventResponseDto::from_event(event, service.public_base_url())),
        None,
        None,
    )))
}

/// Delete an event together with every photo in it
#[utoipa::path(
    delete,
    path = "/api/host/events/{id}",
    tag = "events",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event deleted", body = ApiResponse<DeleteEventResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the event owner"),
        (status = 404, description = "Event not found"),
        (status = 502, description = "Storage failure; nothing after the failing stage was removed")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_event(
    user: AuthenticatedUser,
    State(service): State<Arc<EventService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<DeleteEventResponseDto>>> {
    let photos_removed = service.delete_event(id, &user).await?;
    Ok(Json(ApiResponse::success(
        Some(DeleteEventResponseDto {
            deleted: true,
            photos_removed,
        }),
        Some("Event deleted successfully".to_string()),
        None,
    )))
}
