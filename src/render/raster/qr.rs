//! Styled QR painting.
//!
//! Encodes with the `qrcode` crate and draws each dark module with the
//! configured dot shape. Finder patterns are drawn separately so corner
//! styles can differ from the data modules.

use image::{DynamicImage, RgbaImage};
use qrcode::{EcLevel, QrCode};

use super::RenderError;
use super::paint;
use crate::qr::{CornerDotType, CornerSquareType, DotType, QrRenderConfig};
use crate::render::color::{self, BLACK, TRANSPARENT, WHITE};
use crate::template::style::ImageFit;

/// Modules of light margin on each side.
const QUIET_ZONE: usize = 2;
const FINDER: usize = 7;
/// Logo width as a share of the symbol.
const LOGO_SHARE: f32 = 0.25;

struct Modules {
    code: QrCode,
    n: usize,
}

impl Modules {
    fn dark(&self, x: i64, y: i64) -> bool {
        if x < 0 || y < 0 || x >= self.n as i64 || y >= self.n as i64 {
            return false;
        }
        self.code[(x as usize, y as usize)] == qrcode::Color::Dark
    }

    fn in_finder(&self, x: usize, y: usize) -> bool {
        let far = self.n - FINDER;
        (x < FINDER && y < FINDER) || (x >= far && y < FINDER) || (x < FINDER && y >= far)
    }

    /// Per-corner radii `[tl, tr, br, bl]` for the module at (x, y).
    fn radii(&self, x: usize, y: usize, dot: DotType, m: f32) -> [f32; 4] {
        let (x, y) = (x as i64, y as i64);
        let up = self.dark(x, y - 1);
        let down = self.dark(x, y + 1);
        let left = self.dark(x - 1, y);
        let right = self.dark(x + 1, y);
        let round = |a: bool, b: bool, r: f32| if !a && !b { r } else { 0.0 };
        match dot {
            DotType::Square => [0.0; 4],
            DotType::Dots => [m / 2.0; 4],
            DotType::Rounded | DotType::ExtraRounded => {
                let r = if dot == DotType::Rounded { m * 0.35 } else { m * 0.5 };
                [
                    round(up, left, r),
                    round(up, right, r),
                    round(down, right, r),
                    round(down, left, r),
                ]
            }
            DotType::Classy => [
                round(up, left, m * 0.5),
                0.0,
                round(down, right, m * 0.5),
                0.0,
            ],
            DotType::ClassyRounded => [
                round(up, left, m * 0.5),
                round(up, right, m * 0.2),
                round(down, right, m * 0.5),
                round(down, left, m * 0.2),
            ],
        }
    }
}

/// Paint a QR symbol for `data` into `target`, centered and square.
///
/// A logo raises error correction to H and is drawn over the center on a
/// background-colored pad.
pub fn draw_qr(
    target: &mut RgbaImage,
    data: &str,
    config: &QrRenderConfig,
    logo: Option<&DynamicImage>,
) -> Result<(), RenderError> {
    let level = if logo.is_some() { EcLevel::H } else { EcLevel::M };
    let code = QrCode::with_error_correction_level(data.as_bytes(), level)
        .map_err(|e| RenderError::Qr(e.to_string()))?;
    let n = code.width();
    let modules = Modules { code, n };

    let background = color::color_or(Some(config.background_options.color.as_str()), WHITE);
    for pixel in target.pixels_mut() {
        *pixel = TRANSPARENT;
        paint::blend(pixel, background);
    }

    let (w, h) = (target.width() as f32, target.height() as f32);
    let side = w.min(h);
    let m = side / (n + 2 * QUIET_ZONE) as f32;
    let ox = (w - side) / 2.0 + QUIET_ZONE as f32 * m;
    let oy = (h - side) / 2.0 + QUIET_ZONE as f32 * m;

    let dot_color = color::color_or(Some(config.dots_options.color.as_str()), BLACK);
    let dot_type = config.dots_options.dot_type;
    for y in 0..n {
        for x in 0..n {
            if modules.in_finder(x, y) || !modules.dark(x as i64, y as i64) {
                continue;
            }
            let radii = modules.radii(x, y, dot_type, m);
            paint::fill_shape(target, ox + x as f32 * m, oy + y as f32 * m, m, m, radii, dot_color);
        }
    }

    let square_type = config
        .corners_square_options
        .as_ref()
        .map(|c| c.square_type)
        .unwrap_or(CornerSquareType::Square);
    let corner_dot = config
        .corners_dot_options
        .as_ref()
        .map(|c| c.dot_type)
        .unwrap_or(CornerDotType::Square);
    let square_color = color::color_or(Some(config.corner_square_color()), BLACK);
    let center_color = color::color_or(Some(config.corner_dot_color()), BLACK);
    let far = (n - FINDER) as f32;
    for (fx, fy) in [(0.0, 0.0), (far, 0.0), (0.0, far)] {
        let (x, y) = (ox + fx * m, oy + fy * m);
        let outer = FINDER as f32 * m;
        let ring_radius = match square_type {
            CornerSquareType::Square => 0.0,
            CornerSquareType::ExtraRounded => m * 2.5,
            CornerSquareType::Dot => outer / 2.0,
        };
        paint::stroke_rounded(target, x, y, outer, outer, ring_radius, m, square_color);
        let inner = 3.0 * m;
        let center_radius = match corner_dot {
            CornerDotType::Square => 0.0,
            CornerDotType::Dot => inner / 2.0,
        };
        paint::fill_rounded(target, x + 2.0 * m, y + 2.0 * m, inner, inner, center_radius, center_color);
    }

    if let Some(logo) = logo {
        let symbol = n as f32 * m;
        let size = (symbol * LOGO_SHARE).round().max(1.0);
        let (lx, ly) = (ox + (symbol - size) / 2.0, oy + (symbol - size) / 2.0);
        paint::fill_rounded(target, lx - m / 2.0, ly - m / 2.0, size + m, size + m, 0.0, background);
        let mut layer = RgbaImage::from_pixel(size as u32, size as u32, TRANSPARENT);
        paint::draw_image_fitted(&mut layer, logo, ImageFit::Contain, (0.5, 0.5), 1.0);
        paint::overlay(target, &layer, lx.round() as i64, ly.round() as i64);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::style_of;

    #[test]
    fn test_square_layout() {
        // "https://example.com" at level M is a 25-module symbol: 29 with
        // the quiet zone, so 4px modules starting at 8px.
        let mut img = RgbaImage::new(116, 116);
        draw_qr(&mut img, "https://example.com", &style_of("standard", None), None).unwrap();
        assert_eq!(*img.get_pixel(2, 2), WHITE);
        assert_eq!(*img.get_pixel(9, 9), BLACK);
        assert_eq!(*img.get_pixel(13, 13), WHITE);
        assert_eq!(*img.get_pixel(22, 22), BLACK);
    }

    #[test]
    fn test_colors_follow_config() {
        let mut img = RgbaImage::new(116, 116);
        let config = style_of("standard", Some("#FF0000")).with_background("#00FF00");
        draw_qr(&mut img, "https://example.com", &config, None).unwrap();
        assert_eq!(img.get_pixel(2, 2).0, [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(9, 9).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_logo_pads_center() {
        let mut img = RgbaImage::new(200, 200);
        let logo = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, image::Rgba([0, 0, 255, 255])));
        draw_qr(&mut img, "https://example.com", &style_of("dots", None), Some(&logo)).unwrap();
        assert_eq!(img.get_pixel(100, 100).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_oversized_data_is_error() {
        let mut img = RgbaImage::new(50, 50);
        let data = "x".repeat(4000);
        let err = draw_qr(&mut img, &data, &style_of("standard", None), None).unwrap_err();
        assert!(matches!(err, RenderError::Qr(_)));
    }
}
