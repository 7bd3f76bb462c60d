//! Pixel primitives: alpha compositing, rounded boxes, image fitting,
//! gradients and filters.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};

use crate::render::color::{self, TRANSPARENT};
use crate::render::images::ImageSource;
use crate::template::paper::{Background, Gradient, ImageFill};
use crate::template::style::{Filter, ImageFit};

/// Composite `src` over `dst` (straight alpha).
#[inline]
pub fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = src[3] as f32 / 255.0;
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = TRANSPARENT;
        return;
    }
    for c in 0..3 {
        let s = src[c] as f32;
        let d = dst[c] as f32;
        dst[c] = ((s * sa + d * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

/// Blend `color` into the pixel at (x, y) with extra `coverage` (0.0 – 1.0).
/// Out-of-bounds coordinates are ignored.
#[inline]
pub fn plot(img: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= img.width() as i64 || y >= img.height() as i64 {
        return;
    }
    let src = color::with_opacity(color, coverage);
    blend(img.get_pixel_mut(x as u32, y as u32), src);
}

/// Whether the point (px, py) lies inside a `w × h` box at the origin with
/// per-corner radii `[top-left, top-right, bottom-right, bottom-left]`.
pub fn inside_rounded(px: f32, py: f32, w: f32, h: f32, radii: [f32; 4]) -> bool {
    if px < 0.0 || py < 0.0 || px > w || py > h {
        return false;
    }
    let max_r = w.min(h) / 2.0;
    let [tl, tr, br, bl] = radii.map(|r| r.clamp(0.0, max_r));
    let corner = |cx: f32, cy: f32, r: f32| {
        let (dx, dy) = (px - cx, py - cy);
        dx * dx + dy * dy <= r * r
    };
    if px < tl && py < tl {
        return corner(tl, tl, tl);
    }
    if px > w - tr && py < tr {
        return corner(w - tr, tr, tr);
    }
    if px > w - br && py > h - br {
        return corner(w - br, h - br, br);
    }
    if px < bl && py > h - bl {
        return corner(bl, h - bl, bl);
    }
    true
}

/// Fill a box with uniform corner radius.
pub fn fill_rounded(img: &mut RgbaImage, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Rgba<u8>) {
    fill_shape(img, x, y, w, h, [radius; 4], color);
}

/// Fill a box with per-corner radii, 2×2 supersampled.
pub fn fill_shape(img: &mut RgbaImage, x: f32, y: f32, w: f32, h: f32, radii: [f32; 4], color: Rgba<u8>) {
    if w <= 0.0 || h <= 0.0 || color[3] == 0 {
        return;
    }
    const SAMPLES: [(f32, f32); 4] = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];
    let square = radii.iter().all(|r| *r <= 0.0);
    for py in y.floor() as i64..(y + h).ceil() as i64 {
        for px in x.floor() as i64..(x + w).ceil() as i64 {
            let hits = SAMPLES
                .iter()
                .filter(|(sx, sy)| {
                    let (lx, ly) = (px as f32 + sx - x, py as f32 + sy - y);
                    if square {
                        lx >= 0.0 && ly >= 0.0 && lx <= w && ly <= h
                    } else {
                        inside_rounded(lx, ly, w, h, radii)
                    }
                })
                .count();
            if hits > 0 {
                plot(img, px, py, color, hits as f32 / SAMPLES.len() as f32);
            }
        }
    }
}

/// Stroke the inside edge of a rounded box with a `width`-thick border.
pub fn stroke_rounded(
    img: &mut RgbaImage,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    radius: f32,
    width: f32,
    color: Rgba<u8>,
) {
    if width <= 0.0 || w <= 0.0 || h <= 0.0 {
        return;
    }
    let inner_r = (radius - width).max(0.0);
    let (iw, ih) = (w - 2.0 * width, h - 2.0 * width);
    for py in y.floor() as i64..(y + h).ceil() as i64 {
        for px in x.floor() as i64..(x + w).ceil() as i64 {
            let (lx, ly) = (px as f32 + 0.5 - x, py as f32 + 0.5 - y);
            if !inside_rounded(lx, ly, w, h, [radius; 4]) {
                continue;
            }
            let in_hole = iw > 0.0
                && ih > 0.0
                && inside_rounded(lx - width, ly - width, iw, ih, [inner_r; 4]);
            if !in_hole {
                plot(img, px, py, color, 1.0);
            }
        }
    }
}

/// Stroke a dashed rectangle outline (edit-mode placeholders).
pub fn stroke_dashed(img: &mut RgbaImage, x: i64, y: i64, w: i64, h: i64, dash: i64, color: Rgba<u8>) {
    let dash = dash.max(1);
    let on = |i: i64| (i / dash) % 2 == 0;
    for i in 0..w.max(0) {
        if on(i) {
            plot(img, x + i, y, color, 1.0);
            plot(img, x + i, y + h - 1, color, 1.0);
        }
    }
    for i in 0..h.max(0) {
        if on(i) {
            plot(img, x, y + i, color, 1.0);
            plot(img, x + w - 1, y + i, color, 1.0);
        }
    }
}

/// Blend `src` onto `dst` with its top-left corner at (x, y). Clips to `dst`.
pub fn overlay(dst: &mut RgbaImage, src: &RgbaImage, x: i64, y: i64) {
    for (sx, sy, pixel) in src.enumerate_pixels() {
        plot(dst, x + sx as i64, y + sy as i64, *pixel, 1.0);
    }
}

/// Scaled image size and offset for fitting `img_w × img_h` into a
/// `box_w × box_h` box. `anchor` positions the image when it does not fill
/// the box exactly; `natural_scale` sizes `ImageFit::None`.
pub fn fit_rect(
    img_w: u32,
    img_h: u32,
    box_w: u32,
    box_h: u32,
    fit: ImageFit,
    anchor: (f32, f32),
    natural_scale: f32,
) -> (u32, u32, i64, i64) {
    let (iw, ih) = (img_w.max(1) as f32, img_h.max(1) as f32);
    let (bw, bh) = (box_w as f32, box_h as f32);
    let (w, h) = match fit {
        ImageFit::Fill => (bw, bh),
        ImageFit::Cover => {
            let s = (bw / iw).max(bh / ih);
            (iw * s, ih * s)
        }
        ImageFit::Contain => {
            let s = (bw / iw).min(bh / ih);
            (iw * s, ih * s)
        }
        ImageFit::None => (iw * natural_scale, ih * natural_scale),
    };
    let (w, h) = (w.round().max(1.0), h.round().max(1.0));
    let x = ((bw - w) * anchor.0).round() as i64;
    let y = ((bh - h) * anchor.1).round() as i64;
    (w as u32, h as u32, x, y)
}

/// Draw `image` fitted into `target` (clipped to its bounds).
pub fn draw_image_fitted(
    target: &mut RgbaImage,
    image: &DynamicImage,
    fit: ImageFit,
    anchor: (f32, f32),
    natural_scale: f32,
) {
    let (w, h, x, y) = fit_rect(
        image.width(),
        image.height(),
        target.width(),
        target.height(),
        fit,
        anchor,
        natural_scale,
    );
    let scaled = imageops::resize(&image.to_rgba8(), w, h, FilterType::Triangle);
    overlay(target, &scaled, x, y);
}

/// Paint the paper background.
pub fn paint_background(canvas: &mut RgbaImage, background: &Background, images: &dyn ImageSource, scale: f32) {
    match background {
        Background::Color(fill) => match &fill.gradient {
            Some(gradient) if gradient.stops.len() >= 2 => paint_gradient(canvas, gradient),
            _ => {
                let color = color::color_or(Some(&fill.color), color::WHITE);
                for pixel in canvas.pixels_mut() {
                    blend(pixel, color);
                }
            }
        },
        Background::Image(fill) => {
            for pixel in canvas.pixels_mut() {
                *pixel = color::WHITE;
            }
            match images.image(fill.url.trim()) {
                Some(image) => paint_background_image(canvas, image, fill, scale),
                None => tracing::debug!(url = %fill.url, "background image unavailable"),
            }
        }
    }
}

/// CSS-style linear gradient. 0° paints bottom → top, 90° left → right.
fn paint_gradient(canvas: &mut RgbaImage, gradient: &Gradient) {
    let mut stops: Vec<(f32, Rgba<u8>)> = gradient
        .stops
        .iter()
        .map(|s| (s.position.clamp(0.0, 1.0), color::color_or(Some(&s.color), color::WHITE)))
        .collect();
    stops.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let angle = gradient.angle.to_radians();
    let (dx, dy) = (angle.sin(), -angle.cos());
    let length = (w * dx.abs() + h * dy.abs()).max(1.0);
    let (cx, cy) = (w / 2.0, h / 2.0);

    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let (px, py) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
        let t = ((px * dx + py * dy) / length + 0.5).clamp(0.0, 1.0);
        *pixel = sample_stops(&stops, t);
    }
}

fn sample_stops(stops: &[(f32, Rgba<u8>)], t: f32) -> Rgba<u8> {
    let Some(first) = stops.first() else {
        return color::WHITE;
    };
    if t <= first.0 {
        return first.1;
    }
    for pair in stops.windows(2) {
        let ((p0, c0), (p1, c1)) = (pair[0], pair[1]);
        if t <= p1 {
            let span = (p1 - p0).max(f32::EPSILON);
            let f = ((t - p0) / span).clamp(0.0, 1.0);
            let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * f).round() as u8;
            return Rgba([lerp(c0[0], c1[0]), lerp(c0[1], c1[1]), lerp(c0[2], c1[2]), lerp(c0[3], c1[3])]);
        }
    }
    stops[stops.len() - 1].1
}

fn paint_background_image(canvas: &mut RgbaImage, image: &DynamicImage, fill: &ImageFill, scale: f32) {
    let (cw, ch) = (canvas.width(), canvas.height());
    let (w, h, x, y) = fit_rect(image.width(), image.height(), cw, ch, fill.fit, fill.position.anchor(), scale);
    let scaled = imageops::resize(&image.to_rgba8(), w, h, FilterType::Triangle);
    if !fill.repeat {
        overlay(canvas, &scaled, x, y);
        return;
    }
    let (tw, th) = (w as i64, h as i64);
    let start_x = x - ((x + tw - 1) / tw) * tw;
    let start_y = y - ((y + th - 1) / th) * th;
    let mut ty = start_y;
    while ty < ch as i64 {
        let mut tx = start_x;
        while tx < cw as i64 {
            overlay(canvas, &scaled, tx, ty);
            tx += tw;
        }
        ty += th;
    }
}

/// Apply a whole-layer filter in place.
pub fn apply_filter(layer: &mut RgbaImage, filter: Filter, scale: f32) {
    match filter {
        Filter::None => {}
        Filter::Grayscale => {
            for pixel in layer.pixels_mut() {
                let l = luminance(pixel);
                pixel[0] = l;
                pixel[1] = l;
                pixel[2] = l;
            }
        }
        Filter::Sepia => {
            for pixel in layer.pixels_mut() {
                let (r, g, b) = (pixel[0] as f32, pixel[1] as f32, pixel[2] as f32);
                pixel[0] = (0.393 * r + 0.769 * g + 0.189 * b).min(255.0) as u8;
                pixel[1] = (0.349 * r + 0.686 * g + 0.168 * b).min(255.0) as u8;
                pixel[2] = (0.272 * r + 0.534 * g + 0.131 * b).min(255.0) as u8;
            }
        }
        Filter::Invert => {
            for pixel in layer.pixels_mut() {
                pixel[0] = 255 - pixel[0];
                pixel[1] = 255 - pixel[1];
                pixel[2] = 255 - pixel[2];
            }
        }
        Filter::Blur => {
            *layer = imageops::blur(&*layer, 2.0 * scale);
        }
    }
}

fn luminance(pixel: &Rgba<u8>) -> u8 {
    (0.299 * pixel[0] as f32 + 0.587 * pixel[1] as f32 + 0.114 * pixel[2] as f32).round() as u8
}

/// Multiply every pixel's alpha by `opacity`.
pub fn apply_opacity(layer: &mut RgbaImage, opacity: f32) {
    if opacity >= 1.0 {
        return;
    }
    for pixel in layer.pixels_mut() {
        *pixel = color::with_opacity(*pixel, opacity);
    }
}

/// Composite `layer` onto `canvas`, rotated by `degrees` clockwise about
/// the point (`cx`, `cy`) in canvas coordinates. The layer's own center is
/// placed on that point. Nearest-neighbour sampling.
pub fn composite_rotated(canvas: &mut RgbaImage, layer: &RgbaImage, cx: f32, cy: f32, degrees: f32) {
    let (lw, lh) = (layer.width() as f32, layer.height() as f32);
    let (sin, cos) = degrees.to_radians().sin_cos();
    // Bounding box of the rotated layer.
    let half_w = (lw * cos.abs() + lh * sin.abs()) / 2.0;
    let half_h = (lw * sin.abs() + lh * cos.abs()) / 2.0;
    let x0 = (cx - half_w).floor() as i64;
    let x1 = (cx + half_w).ceil() as i64;
    let y0 = (cy - half_h).floor() as i64;
    let y1 = (cy + half_h).ceil() as i64;

    for y in y0..y1 {
        for x in x0..x1 {
            let (dx, dy) = (x as f32 + 0.5 - cx, y as f32 + 0.5 - cy);
            // Inverse rotation back into layer space.
            let lx = dx * cos + dy * sin + lw / 2.0;
            let ly = -dx * sin + dy * cos + lh / 2.0;
            if lx < 0.0 || ly < 0.0 || lx >= lw || ly >= lh {
                continue;
            }
            let src = *layer.get_pixel(lx as u32, ly as u32);
            plot(canvas, x, y, src, 1.0);
        }
    }
}
