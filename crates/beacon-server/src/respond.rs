//! JSON responder shared by the static handlers.

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Serialize `payload` and answer with `status`.
///
/// - OPTIONS (CORS preflight): empty response, nothing serialized.
/// - Serialization failure: 500 with the error text as a plain body.
pub fn respond_json<T>(method: &Method, status: StatusCode, payload: &T) -> Response
where
    T: Serialize + ?Sized,
{
    if *method == Method::OPTIONS {
        return ().into_response();
    }

    match serde_json::to_vec(payload) {
        Ok(body) => (
            status,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "response serialization failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
