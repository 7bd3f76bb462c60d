//! # Raster Export
//!
//! Paints a whole template to an RGBA bitmap at a chosen DPI. Geometry in
//! the template is in 96 DPI canvas pixels and is scaled by `dpi / 96`.
//!
//! Each element is drawn onto its own layer (shadow, background, content,
//! border), filtered, faded by its opacity, then rotated about its center
//! onto the card. Elements paint in template order.
//!
//! ```
//! use cardsmith::render::images::NoImages;
//! use cardsmith::render::raster::{RasterOptions, rasterize};
//! use cardsmith::resolve::ProfileData;
//! use cardsmith::template::Template;
//!
//! let img = rasterize(&Template::default(), &ProfileData::default(), &NoImages, &RasterOptions::default());
//! assert_eq!(img.dimensions(), (1063, 650));
//! ```

pub mod paint;
pub mod qr;
pub mod text;

use std::io::Cursor;
use std::path::Path;

use ab_glyph::FontArc;
use image::imageops;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use thiserror::Error;

use super::color::{self, TRANSPARENT, WHITE};
use super::icons::Glyph;
use super::images::ImageSource;
use super::{ElementView, RenderMode, Visual, render_template};
use crate::resolve::ProfileData;
use crate::template::Template;
use crate::template::paper::CANVAS_DPI;
use crate::template::style::TextAlign;
use text::{TextPainter, TextStyle};

/// Largest bitmap side, in output pixels. The canvas is clamped to it and
/// element layers that would exceed it are skipped.
pub const MAX_DIMENSION: u32 = 16_384;

/// Editor guide color for borders with no color of their own.
const GUIDE_COLOR: Rgba<u8> = Rgba([0xCC, 0xCC, 0xCC, 0xFF]);
const PLACEHOLDER_INK: Rgba<u8> = Rgba([0x9E, 0x9E, 0x9E, 0xFF]);
const PLACEHOLDER_FILL: Rgba<u8> = Rgba([0xF5, 0xF5, 0xF5, 0xB0]);

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Font error: {0}")]
    Font(String),

    #[error("QR encoding failed: {0}")]
    Qr(String),
}

/// Export settings.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub dpi: f32,
    pub mode: RenderMode,
    /// TrueType face for text. Without one the built-in bitmap font is used.
    pub font: Option<FontArc>,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            dpi: 300.0,
            mode: RenderMode::Print,
            font: None,
        }
    }
}

impl RasterOptions {
    /// Output pixels per canvas pixel.
    pub fn scale(&self) -> f32 {
        self.dpi / CANVAS_DPI
    }
}

/// Load a TrueType/OpenType font from disk.
pub fn load_font(path: &Path) -> Result<FontArc, RenderError> {
    let bytes = std::fs::read(path).map_err(|e| RenderError::Font(format!("{}: {}", path.display(), e)))?;
    FontArc::try_from_vec(bytes).map_err(|e| RenderError::Font(format!("{}: {}", path.display(), e)))
}

/// Paint `template` filled from `profile`.
///
/// QR codes that cannot be encoded are logged and drawn as missing content.
pub fn rasterize(template: &Template, profile: &ProfileData, images: &dyn ImageSource, options: &RasterOptions) -> RgbaImage {
    let scale = options.scale();
    let (paper_width, paper_height) = template.paper.pixel_size(options.dpi);
    let width = paper_width.clamp(1, MAX_DIMENSION);
    let height = paper_height.clamp(1, MAX_DIMENSION);
    if (width, height) != (paper_width.max(1), paper_height.max(1)) {
        tracing::warn!(paper_width, paper_height, max = MAX_DIMENSION, "paper clamped to raster limit");
    }
    let mut canvas = RgbaImage::from_pixel(width, height, TRANSPARENT);
    paint::paint_background(&mut canvas, &template.paper.background, images, scale);

    let mut painter = TextPainter::new(options.font.as_ref());
    for view in render_template(template, profile, options.mode) {
        draw_element(&mut canvas, &view, images, options, &mut painter);
    }

    tracing::debug!(width, height, dpi = options.dpi, elements = template.elements.len(), "rasterized template");
    canvas
}

/// Rasterize and encode as PNG.
pub fn render_png(
    template: &Template,
    profile: &ProfileData,
    images: &dyn ImageSource,
    options: &RasterOptions,
) -> Result<Vec<u8>, RenderError> {
    let img = rasterize(template, profile, images, options);
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(bytes)
}

fn draw_element(
    canvas: &mut RgbaImage,
    view: &ElementView,
    images: &dyn ImageSource,
    options: &RasterOptions,
    painter: &mut TextPainter<'_>,
) {
    let scale = options.scale();
    let bw = (view.width as f32 * scale).round() as u32;
    let bh = (view.height as f32 * scale).round() as u32;
    if bw == 0 || bh == 0 {
        return;
    }
    let frame = &view.frame;
    let radius = frame.border_radius * scale;

    let margin = frame
        .shadow
        .as_ref()
        .map(|s| ((s.offset_x.abs().max(s.offset_y.abs()) + s.blur * 2.0) * scale).ceil() as u32)
        .unwrap_or(0);
    let layer_w = u64::from(bw) + 2 * u64::from(margin);
    let layer_h = u64::from(bh) + 2 * u64::from(margin);
    if layer_w > u64::from(MAX_DIMENSION) || layer_h > u64::from(MAX_DIMENSION) {
        tracing::warn!(id = %view.id, layer_w, layer_h, max = MAX_DIMENSION, "element exceeds raster limit, skipped");
        return;
    }
    let mut layer = RgbaImage::from_pixel(layer_w as u32, layer_h as u32, TRANSPARENT);
    let (mx, my) = (margin as f32, margin as f32);

    if let Some(shadow) = &frame.shadow {
        let mut shade = RgbaImage::from_pixel(layer.width(), layer.height(), TRANSPARENT);
        let color = color::color_or(Some(shadow.color.as_str()), Rgba([0, 0, 0, 77]));
        paint::fill_rounded(
            &mut shade,
            mx + shadow.offset_x * scale,
            my + shadow.offset_y * scale,
            bw as f32,
            bh as f32,
            radius,
            color,
        );
        if shadow.blur > 0.0 {
            shade = imageops::blur(&shade, shadow.blur * scale / 2.0);
        }
        paint::overlay(&mut layer, &shade, 0, 0);
    }

    if let Some(background) = frame.background_color.as_deref().and_then(color::parse_color) {
        let fill = color::with_opacity(background, frame.background_opacity);
        paint::fill_rounded(&mut layer, mx, my, bw as f32, bh as f32, radius, fill);
    }

    let mut content = RgbaImage::from_pixel(bw, bh, TRANSPARENT);
    draw_visual(&mut content, view, images, options, painter);
    if radius > 0.0 {
        clip_rounded(&mut content, radius);
    }
    paint::overlay(&mut layer, &content, margin as i64, margin as i64);

    if frame.border_width > 0.0 {
        let color = match frame.border_color.as_deref() {
            Some(value) => color::parse_color(value),
            None if options.mode == RenderMode::Print => None,
            None => Some(GUIDE_COLOR),
        };
        if let Some(color) = color {
            let width = (frame.border_width * scale).max(1.0);
            paint::stroke_rounded(&mut layer, mx, my, bw as f32, bh as f32, radius, width, color);
        }
    }

    paint::apply_filter(&mut layer, frame.filter, scale);
    paint::apply_opacity(&mut layer, frame.opacity);

    let cx = view.left as f32 * scale + bw as f32 / 2.0;
    let cy = view.top as f32 * scale + bh as f32 / 2.0;
    paint::composite_rotated(canvas, &layer, cx, cy, frame.rotation);
}

fn draw_visual(
    content: &mut RgbaImage,
    view: &ElementView,
    images: &dyn ImageSource,
    options: &RasterOptions,
    painter: &mut TextPainter<'_>,
) {
    let scale = options.scale();
    let style = text_style(view, scale);
    match &view.visual {
        Visual::Text { text, multiline } => {
            text::draw_block(content, painter, text, &style, view.text.align, *multiline);
        }
        Visual::Image { src, fit } => match images.image(src) {
            Some(image) => paint::draw_image_fitted(content, image, *fit, (0.5, 0.5), scale),
            None => {
                tracing::debug!(element = %view.id, src = %src, "image unavailable");
                if options.mode.shows_placeholders() {
                    draw_placeholder(content, painter, view.kind.label(), scale);
                }
            }
        },
        Visual::Icon { glyph } => {
            let d = content.width().min(content.height()) as f32;
            let x = (content.width() as f32 - d) / 2.0;
            let y = (content.height() as f32 - d) / 2.0;
            draw_badge(content, painter, glyph, x, y, d);
        }
        Visual::Badge { glyph, text } => {
            let h = content.height() as f32;
            let d = (h * 0.8).min(content.width() as f32);
            draw_badge(content, painter, glyph, 0.0, (h - d) / 2.0, d);
            let top = (h - style.size) / 2.0;
            painter.draw_line(content, text, d * 1.25, top, &style);
        }
        Visual::Qr(qr) => {
            let logo = qr.logo.as_deref().and_then(|l| images.image(l));
            if let Err(e) = qr::draw_qr(content, &qr.data, &qr.config, logo) {
                tracing::warn!(element = %view.id, error = %e, "QR code not drawn");
                for pixel in content.pixels_mut() {
                    *pixel = TRANSPARENT;
                }
                if options.mode.shows_placeholders() {
                    draw_placeholder(content, painter, view.kind.label(), scale);
                }
            }
        }
        Visual::Placeholder { label } => draw_placeholder(content, painter, label, scale),
        Visual::Empty => {}
    }
}

fn text_style(view: &ElementView, scale: f32) -> TextStyle {
    TextStyle {
        size: view.text.font_size * scale,
        color: color::color_or(Some(view.text.color.as_str()), color::BLACK),
        bold: view.text.bold,
        italic: view.text.italic,
        underline: view.text.underline,
    }
}

/// Colored circle of diameter `d` with the glyph's mark centered in white.
fn draw_badge(target: &mut RgbaImage, painter: &mut TextPainter<'_>, glyph: &Glyph, x: f32, y: f32, d: f32) {
    let fill = color::color_or(Some(glyph.color), PLACEHOLDER_INK);
    paint::fill_rounded(target, x, y, d, d, d / 2.0, fill);

    let mut size = d * 0.45;
    let width = painter.measure(glyph.mark, size);
    if width > d * 0.75 {
        size *= d * 0.75 / width;
    }
    let style = TextStyle {
        size,
        color: WHITE,
        bold: true,
        italic: false,
        underline: false,
    };
    let width = painter.measure(glyph.mark, size);
    painter.draw_line(target, glyph.mark, x + (d - width) / 2.0, y + (d - size) / 2.0, &style);
}

/// Dashed gray box with a centered label.
fn draw_placeholder(target: &mut RgbaImage, painter: &mut TextPainter<'_>, label: &str, scale: f32) {
    let (w, h) = (target.width(), target.height());
    for pixel in target.pixels_mut() {
        paint::blend(pixel, PLACEHOLDER_FILL);
    }
    let dash = (4.0 * scale).round() as i64;
    paint::stroke_dashed(target, 0, 0, w as i64, h as i64, dash, PLACEHOLDER_INK);

    let style = TextStyle {
        size: (11.0 * scale).min(h as f32 * 0.6),
        color: PLACEHOLDER_INK,
        bold: false,
        italic: false,
        underline: false,
    };
    text::draw_block(target, painter, label, &style, TextAlign::Center, false);
}

/// Clear pixels outside a rounded rectangle covering the whole image.
fn clip_rounded(img: &mut RgbaImage, radius: f32) {
    let (w, h) = (img.width() as f32, img.height() as f32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        if !paint::inside_rounded(x as f32 + 0.5, y as f32 + 0.5, w, h, [radius; 4]) {
            *pixel = TRANSPARENT;
        }
    }
}

/// Decode raw bytes (PNG, JPEG, …) for an [`ImageSource`].
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, image::ImageError> {
    image::load_from_memory(bytes)
}
