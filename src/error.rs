//! # Error Types
//!
//! Errors raised by the surfaces around the card model: loading templates
//! and profiles, encoding previews, and serving them over HTTP.
//!
//! Field and QR resolution never fail. Missing data resolves to an empty
//! string and unknown tokens fall back to documented defaults, so nothing in
//! [`crate::resolve`] or [`crate::qr`] returns this type.

use thiserror::Error;

use crate::render::raster::RenderError;

/// Main error type for cardsmith operations
#[derive(Debug, Error)]
pub enum CardsmithError {
    /// Template could not be loaded or is malformed
    #[error("Template error: {0}")]
    Template(String),

    /// Profile data could not be loaded or is malformed
    #[error("Profile error: {0}")]
    Profile(String),

    /// Image loading or decoding error
    #[error("Image error: {0}")]
    Image(String),

    /// Raster export error
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// HTTP server error (bind, serve)
    #[error("Server error: {0}")]
    Server(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
