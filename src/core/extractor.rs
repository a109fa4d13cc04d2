use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// JSON body extractor whose rejections use the `ApiResponse` error body
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!("Rejected JSON body: {}", rejection.body_text());
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(_) => {
                "Expected a request with Content-Type: application/json".to_string()
            }
            _ => "Failed to parse JSON body".to_string(),
        };
        AppError::BadRequest(message)
    }
}

/// The host identity placed in request extensions by `auth_middleware`
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Host sign-in required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, routing::post, Router};
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::{json, Value};

    use super::*;

    #[derive(Deserialize)]
    struct EchoBody {
        name: String,
    }

    async fn echo(AppJson(body): AppJson<EchoBody>) -> String {
        body.name
    }

    async fn whoami(user: AuthenticatedUser) -> String {
        user.id.to_string()
    }

    fn server() -> TestServer {
        TestServer::new(
            Router::new()
                .route("/echo", post(echo))
                .route("/whoami", post(whoami)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_bad_json_uses_api_error_body() {
        let response = server().post("/echo").json(&json!({ "other": 1 })).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid JSON data"));
    }

    #[tokio::test]
    async fn test_valid_json_is_extracted() {
        let response = server().post("/echo").json(&json!({ "name": "Festa" })).await;

        response.assert_status_ok();
        response.assert_text("Festa");
    }

    #[tokio::test]
    async fn test_missing_host_is_unauthorized() {
        let response = server().post("/whoami").await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
