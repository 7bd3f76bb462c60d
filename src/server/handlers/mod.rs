//! HTTP handlers for the server.

pub mod catalog;
pub mod preview;
pub mod resolve;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

/// Malformed request bodies answer 400 with the decoder's message.
pub(crate) fn bad_request(rejection: JsonRejection) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, rejection.body_text())
}
