use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use keystone_auth::AuthError;

#[derive(Debug, Serialize)]
struct Success<T> {
    success: bool,
    data: T,
}

/// `200 { "success": true, "data": ... }`
pub fn ok<T: Serialize>(data: T) -> Response {
    (
        StatusCode::OK,
        Json(Success {
            success: true,
            data,
        }),
    )
        .into_response()
}

pub fn auth_error_to_response(err: AuthError) -> Response {
    match err {
        AuthError::Unauthenticated => json_error(
            StatusCode::UNAUTHORIZED,
            "UNAUTHORIZED",
            "Authentication required",
        ),
        AuthError::Forbidden => json_error(
            StatusCode::FORBIDDEN,
            "FORBIDDEN",
            "Insufficient role for this operation",
        ),
    }
}

/// `{ "success": false, "error": { "code": ..., "message": ... } }`
pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "success": false,
            "error": {
                "code": code,
                "message": message.into(),
            },
        })),
    )
        .into_response()
}

pub fn validation_error(message: impl Into<String>) -> Response {
    json_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_errors_keep_401_and_403_apart() {
        assert_eq!(
            auth_error_to_response(AuthError::Unauthenticated).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            auth_error_to_response(AuthError::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
    }
}
