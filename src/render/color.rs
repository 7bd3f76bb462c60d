//! CSS-style color parsing.
//!
//! Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`,
//! `rgba(r, g, b, a)` (alpha 0.0 – 1.0), `transparent`, and a handful of
//! named colors.

use image::Rgba;

pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

const NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("lightgray", [211, 211, 211]),
    ("silver", [192, 192, 192]),
    ("navy", [0, 0, 128]),
    ("teal", [0, 128, 128]),
];

/// Parse a color string. Returns `None` when it is not understood.
pub fn parse_color(value: &str) -> Option<Rgba<u8>> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = value.to_ascii_lowercase();
    if lower == "transparent" {
        return Some(TRANSPARENT);
    }
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_functional(args);
    }
    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, [r, g, b])| Rgba([*r, *g, *b, 255]))
}

/// Parse `value`, falling back to `fallback` when absent or invalid.
pub fn color_or(value: Option<&str>, fallback: Rgba<u8>) -> Rgba<u8> {
    value.and_then(parse_color).unwrap_or(fallback)
}

/// Scale the alpha channel by `factor` (0.0 – 1.0).
pub fn with_opacity(color: Rgba<u8>, factor: f32) -> Rgba<u8> {
    let Rgba([r, g, b, a]) = color;
    Rgba([r, g, b, (a as f32 * factor.clamp(0.0, 1.0)).round() as u8])
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.is_ascii() {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|n| n * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        4 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

fn parse_functional(args: &str) -> Option<Rgba<u8>> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    let channel = |s: &str| s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    let alpha = match parts.get(3) {
        Some(a) => (a.parse::<f32>().ok()?.clamp(0.0, 1.0) * 255.0).round() as u8,
        None => 255,
    };
    Some(Rgba([channel(parts[0])?, channel(parts[1])?, channel(parts[2])?, alpha]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_forms() {
        assert_eq!(parse_color("#000"), Some(BLACK));
        assert_eq!(parse_color("#FfF"), Some(WHITE));
        assert_eq!(parse_color("#112233"), Some(Rgba([0x11, 0x22, 0x33, 255])));
        assert_eq!(parse_color("#11223380"), Some(Rgba([0x11, 0x22, 0x33, 0x80])));
        assert_eq!(parse_color("#f008"), Some(Rgba([255, 0, 0, 0x88])));
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzz"), None);
    }

    #[test]
    fn test_functional_forms() {
        assert_eq!(parse_color("rgb(10, 20, 30)"), Some(Rgba([10, 20, 30, 255])));
        assert_eq!(parse_color("rgba(0,0,0,0.5)"), Some(Rgba([0, 0, 0, 128])));
        assert_eq!(parse_color("rgb(1,2)"), None);
    }

    #[test]
    fn test_named_and_fallback() {
        assert_eq!(parse_color("Navy"), Some(Rgba([0, 0, 128, 255])));
        assert_eq!(parse_color("transparent"), Some(TRANSPARENT));
        assert_eq!(color_or(Some("nope"), WHITE), WHITE);
        assert_eq!(color_or(None, BLACK), BLACK);
    }

    #[test]
    fn test_with_opacity() {
        assert_eq!(with_opacity(BLACK, 0.5), Rgba([0, 0, 0, 128]));
        assert_eq!(with_opacity(BLACK, 2.0), BLACK);
    }
}
