use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Standard success response
pub fn success_response<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(data)).into_response()
}

/// Created response pointing at the resource's self link
pub fn created_response<T: Serialize>(location: Option<&str>, data: T) -> Response {
    match location {
        Some(location) => (
            StatusCode::CREATED,
            [(header::LOCATION, location.to_string())],
            Json(data),
        )
            .into_response(),
        None => (StatusCode::CREATED, Json(data)).into_response(),
    }
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
