//! Resolver, QR styler and element editing handlers.

use axum::{Json, extract::rejection::JsonRejection, http::StatusCode};
use serde::{Deserialize, Serialize};

use super::bad_request;
use crate::qr::{QrRenderConfig, style_of};
use crate::resolve::{ProfileData, ResolveOptions, resolve};
use crate::template::CanvasElement;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub field: String,
    #[serde(default)]
    pub profile: ProfileData,
    pub use_address_prefix: Option<bool>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub field: String,
    pub value: String,
}

/// POST /api/resolve - Resolve one field against a profile.
pub async fn resolve_field(
    body: Result<Json<ResolveRequest>, JsonRejection>,
) -> Result<Json<ResolveResponse>, (StatusCode, String)> {
    let Json(req) = body.map_err(bad_request)?;
    let options = req
        .use_address_prefix
        .map(ResolveOptions::with_prefix)
        .unwrap_or_default();
    let value = resolve(&req.field, &req.profile, options);
    Ok(Json(ResolveResponse { field: req.field, value }))
}

#[derive(Deserialize)]
pub struct QrStyleRequest {
    #[serde(default)]
    pub style: String,
    pub color: Option<String>,
}

/// POST /api/qr-style - Render configuration for a style token and color.
pub async fn qr_style(
    body: Result<Json<QrStyleRequest>, JsonRejection>,
) -> Result<Json<QrRenderConfig>, (StatusCode, String)> {
    let Json(req) = body.map_err(bad_request)?;
    Ok(Json(style_of(&req.style, req.color.as_deref())))
}

#[derive(Deserialize)]
pub struct EditRequest {
    pub element: CanvasElement,
    pub key: String,
    pub value: serde_json::Value,
}

/// POST /api/edit - Apply one property edit and return the element.
pub async fn edit(
    body: Result<Json<EditRequest>, JsonRejection>,
) -> Result<Json<CanvasElement>, (StatusCode, String)> {
    let Json(EditRequest { mut element, key, value }) = body.map_err(bad_request)?;
    if !element.set_property(&key, &value) {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("`{}` does not apply to a {} element", key, element.kind().as_str()),
        ));
    }
    Ok(Json(element))
}
