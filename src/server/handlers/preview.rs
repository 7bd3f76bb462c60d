//! Render and PNG preview handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use super::super::state::AppState;
use super::bad_request;
use crate::render::raster::{MAX_DIMENSION, RasterOptions, render_png};
use crate::render::{ElementView, RenderMode, render_template};
use crate::resolve::ProfileData;
use crate::template::Template;

const MAX_DPI: f32 = 1200.0;

#[derive(Deserialize)]
pub struct RenderRequest {
    pub template: Template,
    #[serde(default)]
    pub profile: ProfileData,
    pub mode: Option<RenderMode>,
}

/// POST /api/render - Per-element render views.
pub async fn render(
    body: Result<Json<RenderRequest>, JsonRejection>,
) -> Result<Json<Vec<ElementView>>, (StatusCode, String)> {
    let Json(req) = body.map_err(bad_request)?;
    let mode = req.mode.unwrap_or_default();
    Ok(Json(render_template(&req.template, &req.profile, mode)))
}

#[derive(Deserialize)]
pub struct PreviewRequest {
    pub template: Template,
    #[serde(default)]
    pub profile: ProfileData,
    pub mode: Option<RenderMode>,
    pub dpi: Option<f32>,
}

/// POST /api/preview - Render the template as PNG.
pub async fn preview(
    State(state): State<Arc<AppState>>,
    body: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let Json(req) = body.map_err(bad_request)?;
    let defaults = RasterOptions::default();
    let dpi = req.dpi.unwrap_or(defaults.dpi);
    if !(dpi > 0.0 && dpi <= MAX_DPI) {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("dpi must be in (0, {}], got {}", MAX_DPI, dpi),
        ));
    }
    let (width, height) = req.template.paper.pixel_size(dpi);
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err((
            StatusCode::BAD_REQUEST,
            format!("paper is {}x{} px at {} dpi, limit is {} px per side", width, height, dpi, MAX_DIMENSION),
        ));
    }
    let options = RasterOptions {
        dpi,
        mode: req.mode.unwrap_or_default(),
        font: state.font.clone(),
    };

    // Remote images only; the server never reads local paths.
    let images = state.fetcher.gather(&req.template, &req.profile, None).await;

    let png_bytes = tokio::task::spawn_blocking(move || render_png(&req.template, &req.profile, &images, &options))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Task error: {}", e)))?
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Preview render failed: {}", e),
            )
        })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png_bytes))
}
