use axum::Json;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::ApiResponse;

/// Get the identity of the current host
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current host identity", body = ApiResponse<AuthenticatedUser>),
        (status = 401, description = "Authentication required")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
) -> Result<Json<ApiResponse<AuthenticatedUser>>, AppError> {
    Ok(Json(ApiResponse::success(Some(user), None, None)))
}
