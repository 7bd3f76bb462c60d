//! Catalog handlers: what an editor can offer.

use axum::Json;

use crate::qr::{QrStyleMeta, qr_style_catalog};
use crate::resolve::{FieldMeta, field_catalog};
use crate::template::{ElementTypeMeta, palette};

/// GET /api/fields - Bindable fields with labels.
pub async fn fields() -> Json<Vec<FieldMeta>> {
    Json(field_catalog())
}

/// GET /api/elements - Element palette with editor defaults.
pub async fn elements() -> Json<Vec<ElementTypeMeta>> {
    Json(palette())
}

/// GET /api/qr-styles - QR style tokens.
pub async fn qr_styles() -> Json<Vec<QrStyleMeta>> {
    Json(qr_style_catalog())
}
