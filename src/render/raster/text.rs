//! Text drawing for raster export.
//!
//! Uses a TrueType font through ab_glyph when one is loaded, otherwise the
//! Spleen 12×24 bitmap font scaled to the requested size. Characters the
//! bitmap font lacks are drawn as boxes.

use std::collections::HashMap;

use ab_glyph::{Font, FontArc, ScaleFont};
use image::{Rgba, RgbaImage};
use spleen_font::{FONT_12X24, PSF2Font};

use super::paint;
use crate::template::style::TextAlign;

const BITMAP_W: usize = 12;
const BITMAP_H: usize = 24;
const LINE_HEIGHT: f32 = 1.2;
const ITALIC_SLANT: f32 = 0.2;

/// Resolved text styling in output pixels.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    pub size: f32,
    pub color: Rgba<u8>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

type BitmapGlyph = Option<Vec<Vec<bool>>>;

/// Lays out and draws lines of text with one face.
pub struct TextPainter<'a> {
    font: Option<&'a FontArc>,
    glyphs: HashMap<char, BitmapGlyph>,
}

impl<'a> TextPainter<'a> {
    pub fn new(font: Option<&'a FontArc>) -> Self {
        Self {
            font,
            glyphs: HashMap::new(),
        }
    }

    pub fn line_height(&self, size: f32) -> f32 {
        size * LINE_HEIGHT
    }

    fn ascent(&self, size: f32) -> f32 {
        match self.font {
            Some(font) => font.as_scaled(size).ascent(),
            None => size * 0.8,
        }
    }

    fn advance(&self, ch: char, size: f32) -> f32 {
        match self.font {
            Some(font) => {
                let scaled = font.as_scaled(size);
                scaled.h_advance(font.glyph_id(ch))
            }
            None => size * BITMAP_W as f32 / BITMAP_H as f32,
        }
    }

    /// Width of `text` at `size`.
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        text.chars().map(|ch| self.advance(ch, size)).sum()
    }

    fn bitmap_glyph(&mut self, ch: char) -> &BitmapGlyph {
        self.glyphs.entry(ch).or_insert_with(|| {
            let mut spleen = PSF2Font::new(FONT_12X24).ok()?;
            let utf8 = ch.to_string();
            let glyph = spleen.glyph_for_utf8(utf8.as_bytes())?;
            Some(glyph.map(|row| row.collect()).collect())
        })
    }

    /// Draw one line with its top-left corner at (`x`, `top`). Returns the
    /// line width.
    pub fn draw_line(&mut self, img: &mut RgbaImage, text: &str, x: f32, top: f32, style: &TextStyle) -> f32 {
        let passes: &[f32] = if style.bold {
            &[0.0, (style.size / 24.0).max(1.0)]
        } else {
            &[0.0]
        };
        let mut width = 0.0;
        for &dx in passes {
            width = match self.font {
                Some(font) => draw_ttf(img, font, text, x + dx, top, style),
                None => self.draw_bitmap(img, text, x + dx, top, style),
            };
        }
        if style.underline {
            let y = top + self.ascent(style.size) + style.size * 0.1;
            let thickness = (style.size / 14.0).max(1.0);
            paint::fill_rounded(img, x, y, width, thickness, 0.0, style.color);
        }
        width
    }

    fn draw_bitmap(&mut self, img: &mut RgbaImage, text: &str, x: f32, top: f32, style: &TextStyle) -> f32 {
        let cell_h = style.size.round().max(1.0) as usize;
        let advance = self.advance(' ', style.size);
        let cell_w = advance.round().max(1.0) as usize;
        let mut caret = x;
        for ch in text.chars() {
            if !ch.is_whitespace() {
                let glyph = self.bitmap_glyph(ch).clone();
                for dy in 0..cell_h {
                    let slant = if style.italic {
                        (cell_h - dy) as f32 * ITALIC_SLANT
                    } else {
                        0.0
                    };
                    for dx in 0..cell_w {
                        let on = match &glyph {
                            Some(rows) => {
                                let (sx, sy) = (dx * BITMAP_W / cell_w, dy * BITMAP_H / cell_h);
                                rows.get(sy).and_then(|r| r.get(sx)).copied().unwrap_or(false)
                            }
                            None => dx == 0 || dy == 0 || dx + 1 == cell_w || dy + 1 == cell_h,
                        };
                        if on {
                            let px = (caret + slant).round() as i64 + dx as i64;
                            let py = top.round() as i64 + dy as i64;
                            paint::plot(img, px, py, style.color, 1.0);
                        }
                    }
                }
            }
            caret += advance;
        }
        caret - x
    }
}

fn draw_ttf(img: &mut RgbaImage, font: &FontArc, text: &str, x: f32, top: f32, style: &TextStyle) -> f32 {
    let scaled = font.as_scaled(style.size);
    let baseline = top + scaled.ascent();
    let mut caret = x;
    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(style.size, ab_glyph::point(caret, baseline));
        caret += scaled.h_advance(glyph_id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|px, py, coverage| {
                let gy = bounds.min.y + py as f32;
                let slant = if style.italic {
                    (baseline - gy) * ITALIC_SLANT
                } else {
                    0.0
                };
                let ix = (bounds.min.x + px as f32 + slant).round() as i64;
                paint::plot(img, ix, gy.round() as i64, style.color, coverage);
            });
        }
    }
    caret - x
}

/// A laid-out line and whether it ends its paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub last_in_paragraph: bool,
}

/// Word-wrap `text` to `max_width`. Words wider than the line break
/// between characters. Explicit newlines start new paragraphs.
pub fn wrap(painter: &TextPainter<'_>, text: &str, size: f32, max_width: f32) -> Vec<Line> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut out: Vec<String> = Vec::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if painter.measure(&candidate, size) <= max_width {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
            if painter.measure(word, size) <= max_width {
                current = word.to_string();
                continue;
            }
            for ch in word.chars() {
                let mut next = current.clone();
                next.push(ch);
                if !current.is_empty() && painter.measure(&next, size) > max_width {
                    out.push(std::mem::take(&mut current));
                    current.push(ch);
                } else {
                    current = next;
                }
            }
        }
        out.push(current);
        let count = out.len();
        lines.extend(out.into_iter().enumerate().map(|(i, text)| Line {
            text,
            last_in_paragraph: i + 1 == count,
        }));
    }
    lines
}

/// Draw a text block inside `target` (the element's content box).
///
/// Single-line text is vertically centered; multi-line text wraps and
/// starts at the top.
pub fn draw_block(
    target: &mut RgbaImage,
    painter: &mut TextPainter<'_>,
    text: &str,
    style: &TextStyle,
    align: TextAlign,
    multiline: bool,
) {
    let (w, h) = (target.width() as f32, target.height() as f32);
    let line_height = painter.line_height(style.size);
    let lines = if multiline {
        wrap(painter, text, style.size, w)
    } else {
        vec![Line {
            text: text.replace('\n', " "),
            last_in_paragraph: true,
        }]
    };
    let leading = (line_height - style.size) / 2.0;
    let mut top = if multiline {
        leading
    } else {
        (h - style.size) / 2.0
    };

    for line in &lines {
        if align == TextAlign::Justify && !line.last_in_paragraph {
            draw_justified(target, painter, &line.text, top, w, style);
        } else {
            let width = painter.measure(&line.text, style.size);
            let x = match align {
                TextAlign::Left | TextAlign::Justify => 0.0,
                TextAlign::Center => (w - width) / 2.0,
                TextAlign::Right => w - width,
            };
            painter.draw_line(target, &line.text, x, top, style);
        }
        top += line_height;
        if top >= h {
            break;
        }
    }
}

fn draw_justified(target: &mut RgbaImage, painter: &mut TextPainter<'_>, text: &str, top: f32, width: f32, style: &TextStyle) {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 2 {
        painter.draw_line(target, text, 0.0, top, style);
        return;
    }
    let used: f32 = words.iter().map(|w| painter.measure(w, style.size)).sum();
    let gap = ((width - used) / (words.len() - 1) as f32).max(0.0);
    let mut x = 0.0;
    for word in words {
        x += painter.draw_line(target, word, x, top, style) + gap;
    }
}
