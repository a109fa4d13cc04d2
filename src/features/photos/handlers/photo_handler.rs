use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use image::ImageFormat;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::photos::dtos::{
    DeletePhotoResponseDto, ExportRequestDto, PhotoResponseDto, UploadPhotoDto,
};
use crate::features::photos::services::PhotoService;
use crate::shared::constants::{MAX_PHOTO_SIZE, PHOTO_CONTENT_TYPE};
use crate::shared::types::{ApiResponse, Meta};

/// List the photos of an event, most recent first
#[utoipa::path(
    get,
    path = "/api/events/{id}/photos",
    tag = "photos",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Photos of the event", body = ApiResponse<Vec<PhotoResponseDto>>),
        (status = 404, description = "Event not found")
    )
)]
pub async fn list_photos(
    State(service): State<Arc<PhotoService>>,
    Path(event_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<PhotoResponseDto>>>> {
    let photos: Vec<PhotoResponseDto> = service
        .list_photos(event_id)
        .await?
        .into_iter()
        .map(|photo| {
            let url = service.public_url(&photo);
            PhotoResponseDto::from_photo(photo, url)
        })
        .collect();

    let meta = Meta::total(photos.len());
    Ok(Json(ApiResponse::success(Some(photos), None, Some(meta))))
}

/// Submit a capture to an event
///
/// Accepts multipart/form-data with:
/// - `file`: the JPEG-encoded capture (required)
/// - `taken_by`: contributor tag (optional, defaults to "guest")
#[utoipa::path(
    post,
    path = "/api/events/{id}/photos",
    tag = "photos",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    request_body(
        content = UploadPhotoDto,
        content_type = "multipart/form-data",
        description = "JPEG capture with an optional contributor tag",
    ),
    responses(
        (status = 201, description = "Photo stored", body = ApiResponse<PhotoResponseDto>),
        (status = 400, description = "Missing file or not a JPEG"),
        (status = 404, description = "Event not found"),
        (status = 413, description = "File larger than 10 MB"),
        (status = 502, description = "Object store failure")
    )
)]
pub async fn upload_photo(
    State(service): State<Arc<PhotoService>>,
    Path(event_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<PhotoResponseDto>>)> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut content_type: Option<String> = None;
    let mut taken_by: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => {
                content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;
                file_data = Some(data.to_vec());
            }
            "taken_by" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read taken_by field: {}", e))
                })?;
                taken_by = Some(text);
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let file_data =
        file_data.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    if file_data.len() > MAX_PHOTO_SIZE {
        return Err(AppError::PayloadTooLarge(format!(
            "File too large. Maximum size is {} MB",
            MAX_PHOTO_SIZE / 1024 / 1024
        )));
    }

    if content_type.as_deref() != Some(PHOTO_CONTENT_TYPE) {
        return Err(AppError::BadRequest(format!(
            "File type '{}' is not allowed. Expected {}",
            content_type.as_deref().unwrap_or("unknown"),
            PHOTO_CONTENT_TYPE
        )));
    }

    if !matches!(image::guess_format(&file_data), Ok(ImageFormat::Jpeg)) {
        return Err(AppError::BadRequest(
            "File content is not a JPEG image".to_string(),
        ));
    }

    let photo = service
        .submit_capture(event_id, file_data, taken_by)
        .await?;
    let url = service.public_url(&photo);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(PhotoResponseDto::from_photo(photo, url)),
            None,
            None,
        )),
    ))
}

/// Delete one photo of an owned event
#[utoipa::path(
    delete,
    path = "/api/host/events/{id}/photos/{photo_id}",
    tag = "photos",
    params(
        ("id" = Uuid, Path, description = "Event id"),
        ("photo_id" = Uuid, Path, description = "Photo id")
    ),
    responses(
        (status = 200, description = "Photo deleted", body = ApiResponse<DeletePhotoResponseDto>),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the event owner"),
        (status = 404, description = "Event or photo not found"),
        (status = 502, description = "Object store failure; the photo was kept")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_photo(
    user: AuthenticatedUser,
    State(service): State<Arc<PhotoService>>,
    Path((event_id, photo_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<DeletePhotoResponseDto>>> {
    service.delete_photo(event_id, photo_id, &user).await?;

    Ok(Json(ApiResponse::success(
        Some(DeletePhotoResponseDto { deleted: true }),
        Some("Photo deleted successfully".to_string()),
        None,
    )))
}

/// Download photos of an owned event as a zip archive
///
/// Exports the listed `photo_ids`, or every photo when the list is empty.
#[utoipa::path(
    post,
    path = "/api/host/events/{id}/export",
    tag = "photos",
    params(
        ("id" = Uuid, Path, description = "Event id")
    ),
    request_body = ExportRequestDto,
    responses(
        (status = 200, description = "Zip archive", content_type = "application/zip", body = Vec<u8>),
        (status = 400, description = "No photos to export"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not the event owner"),
        (status = 404, description = "Event not found"),
        (status = 502, description = "A photo could not be fetched")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn export_photos(
    user: AuthenticatedUser,
    State(service): State<Arc<PhotoService>>,
    Path(event_id): Path<Uuid>,
    AppJson(dto): AppJson<ExportRequestDto>,
) -> Result<Response> {
    let archive = service
        .export_for_owner(event_id, &user, &dto.photo_ids)
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", archive.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        archive.bytes,
    )
        .into_response())
}
