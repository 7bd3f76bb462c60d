//! Paper (card) geometry and background.

use serde::{Deserialize, Serialize};

use super::style::ImageFit;

/// Canvas surface resolution. Element geometry is in pixels at this DPI.
pub const CANVAS_DPI: f32 = 96.0;

const MM_PER_INCH: f32 = 25.4;

/// Named paper size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A5,
    #[default]
    #[serde(rename = "Business Card", alias = "business-card")]
    BusinessCard,
    #[serde(rename = "Business Card (L)", alias = "business-card-l")]
    BusinessCardLarge,
    Custom,
}

impl PaperSize {
    pub const ALL: [PaperSize; 5] = [
        PaperSize::A4,
        PaperSize::A5,
        PaperSize::BusinessCard,
        PaperSize::BusinessCardLarge,
        PaperSize::Custom,
    ];

    /// Portrait (width, height) in millimeters. `None` for `Custom`.
    pub fn dimensions_mm(self) -> Option<(f32, f32)> {
        match self {
            PaperSize::A4 => Some((210.0, 297.0)),
            PaperSize::A5 => Some((148.0, 210.0)),
            PaperSize::BusinessCard => Some((55.0, 90.0)),
            PaperSize::BusinessCardLarge => Some((60.0, 100.0)),
            PaperSize::Custom => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaperSize::A4 => "A4",
            PaperSize::A5 => "A5",
            PaperSize::BusinessCard => "Business Card",
            PaperSize::BusinessCardLarge => "Business Card (L)",
            PaperSize::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Portrait => Orientation::Landscape,
            Orientation::Landscape => Orientation::Portrait,
        }
    }

    /// Order a portrait (w, h) pair for this orientation.
    fn orient(self, (w, h): (f32, f32)) -> (f32, f32) {
        match self {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// One stop of a linear gradient. `position` is 0.0 – 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    pub color: String,
    #[serde(default)]
    pub position: f32,
}

/// Linear gradient. `angle` follows CSS: 0° paints bottom → top, 90° left → right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    pub stops: Vec<GradientStop>,
    #[serde(default = "default_gradient_angle")]
    pub angle: f32,
}

fn default_gradient_angle() -> f32 {
    180.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorFill {
    #[serde(default = "default_background_color")]
    pub color: String,
    /// When present with two or more stops, replaces the flat color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<Gradient>,
}

fn default_background_color() -> String {
    "#FFFFFF".to_string()
}

/// Anchor for a background image that does not fill the paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImagePosition {
    #[default]
    Center,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ImagePosition {
    /// Horizontal and vertical anchor fractions (0.0 = start, 1.0 = end).
    pub fn anchor(self) -> (f32, f32) {
        match self {
            ImagePosition::Center => (0.5, 0.5),
            ImagePosition::Top => (0.5, 0.0),
            ImagePosition::Bottom => (0.5, 1.0),
            ImagePosition::Left => (0.0, 0.5),
            ImagePosition::Right => (1.0, 0.5),
            ImagePosition::TopLeft => (0.0, 0.0),
            ImagePosition::TopRight => (1.0, 0.0),
            ImagePosition::BottomLeft => (0.0, 1.0),
            ImagePosition::BottomRight => (1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFill {
    pub url: String,
    #[serde(default)]
    pub fit: ImageFit,
    #[serde(default)]
    pub position: ImagePosition,
    #[serde(default)]
    pub repeat: bool,
}

/// Paper background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    Color(ColorFill),
    Image(ImageFill),
}

impl Default for Background {
    fn default() -> Self {
        Background::Color(ColorFill {
            color: default_background_color(),
            gradient: None,
        })
    }
}

impl Background {
    pub fn solid(color: impl Into<String>) -> Self {
        Background::Color(ColorFill {
            color: color.into(),
            gradient: None,
        })
    }

    /// Image reference, if this is an image background.
    pub fn image_url(&self) -> Option<&str> {
        match self {
            Background::Image(fill) if !fill.url.trim().is_empty() => Some(fill.url.as_str()),
            _ => None,
        }
    }
}

/// Wire shape, so a missing or stale width/height is filled from the size table.
#[derive(Deserialize)]
struct PaperRepr {
    #[serde(default)]
    size: PaperSize,
    #[serde(default)]
    width: Option<f32>,
    #[serde(default)]
    height: Option<f32>,
    #[serde(default)]
    orientation: Orientation,
    #[serde(default)]
    background: Background,
}

impl From<PaperRepr> for PaperSettings {
    fn from(repr: PaperRepr) -> Self {
        let mut paper = PaperSettings {
            size: repr.size,
            width: 0.0,
            height: 0.0,
            orientation: repr.orientation,
            background: repr.background,
        };
        match (repr.size.dimensions_mm(), repr.width, repr.height) {
            (Some(dims), _, _) => paper.apply_table(dims),
            (None, w, h) => {
                paper.width = sanitize_mm(w.unwrap_or(0.0));
                paper.height = sanitize_mm(h.unwrap_or(0.0));
            }
        }
        paper
    }
}

fn sanitize_mm(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Page/card size, orientation and background.
///
/// `width`/`height` are in millimeters and already reflect the orientation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PaperRepr")]
pub struct PaperSettings {
    pub size: PaperSize,
    pub width: f32,
    pub height: f32,
    pub orientation: Orientation,
    pub background: Background,
}

impl Default for PaperSettings {
    fn default() -> Self {
        PaperSettings::new(PaperSize::BusinessCard, Orientation::Landscape)
    }
}

impl PaperSettings {
    /// Paper of a named size. `Custom` starts at 0 × 0.
    pub fn new(size: PaperSize, orientation: Orientation) -> Self {
        let mut paper = PaperSettings {
            size,
            width: 0.0,
            height: 0.0,
            orientation,
            background: Background::default(),
        };
        if let Some(dims) = size.dimensions_mm() {
            paper.apply_table(dims);
        }
        paper
    }

    fn apply_table(&mut self, portrait: (f32, f32)) {
        let (w, h) = self.orientation.orient(portrait);
        self.width = w;
        self.height = h;
    }

    /// Change the named size. A non-Custom size overwrites width/height from
    /// the size table; `Custom` keeps the current dimensions.
    pub fn set_size(&mut self, size: PaperSize) {
        self.size = size;
        if let Some(dims) = size.dimensions_mm() {
            self.apply_table(dims);
        }
    }

    /// Set explicit dimensions in millimeters. Switches the size to `Custom`.
    pub fn set_custom_dimensions(&mut self, width_mm: f32, height_mm: f32) {
        self.size = PaperSize::Custom;
        self.width = sanitize_mm(width_mm);
        self.height = sanitize_mm(height_mm);
    }

    /// Set the orientation; swaps width and height when it changes.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation != self.orientation {
            self.toggle_orientation();
        }
    }

    /// Flip orientation and swap width and height.
    pub fn toggle_orientation(&mut self) {
        self.orientation = self.orientation.flipped();
        std::mem::swap(&mut self.width, &mut self.height);
    }

    /// Paper size in pixels at `dpi`, rounded to the nearest pixel.
    pub fn pixel_size(&self, dpi: f32) -> (u32, u32) {
        let px = |mm: f32| ((mm / MM_PER_INCH) * dpi).round().max(0.0) as u32;
        (px(self.width), px(self.height))
    }

    /// Paper size in canvas pixels (96 DPI).
    pub fn canvas_size(&self) -> (u32, u32) {
        self.pixel_size(CANVAS_DPI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_landscape_business_card() {
        let paper = PaperSettings::default();
        assert_eq!(paper.size, PaperSize::BusinessCard);
        assert_eq!((paper.width, paper.height), (90.0, 55.0));
        assert_eq!(paper.background, Background::solid("#FFFFFF"));
    }

    #[test]
    fn test_set_size_overwrites_dimensions() {
        let mut paper = PaperSettings::default();
        paper.set_custom_dimensions(10.0, 20.0);
        assert_eq!(paper.size, PaperSize::Custom);

        paper.set_size(PaperSize::A4);
        assert_eq!((paper.width, paper.height), (297.0, 210.0));

        paper.set_size(PaperSize::Custom);
        assert_eq!((paper.width, paper.height), (297.0, 210.0));
    }

    #[test]
    fn test_toggle_orientation_swaps() {
        let mut paper = PaperSettings::new(PaperSize::A5, Orientation::Portrait);
        assert_eq!((paper.width, paper.height), (148.0, 210.0));
        paper.toggle_orientation();
        assert_eq!(paper.orientation, Orientation::Landscape);
        assert_eq!((paper.width, paper.height), (210.0, 148.0));

        paper.set_orientation(Orientation::Landscape);
        assert_eq!((paper.width, paper.height), (210.0, 148.0));
    }

    #[test]
    fn test_pixel_size() {
        let paper = PaperSettings::default();
        // 90mm x 55mm at 96 DPI
        assert_eq!(paper.canvas_size(), (340, 208));
        assert_eq!(paper.pixel_size(300.0), (1063, 650));
    }

    #[test]
    fn test_deserialize_fills_table_dimensions() {
        let json = r#"{"size": "Business Card (L)", "orientation": "portrait"}"#;
        let paper: PaperSettings = serde_json::from_str(json).unwrap();
        assert_eq!((paper.width, paper.height), (60.0, 100.0));
    }

    #[test]
    fn test_deserialize_custom() {
        let json = r##"{"size": "Custom", "width": 80, "height": -5,
            "background": {"type": "color", "color": "#000",
                           "gradient": {"stops": [{"color": "#f00"}, {"color": "#00f", "position": 1}], "angle": 90}}}"##;
        let paper: PaperSettings = serde_json::from_str(json).unwrap();
        assert_eq!((paper.width, paper.height), (80.0, 0.0));
        let Background::Color(fill) = &paper.background else {
            panic!("expected color background");
        };
        assert_eq!(fill.gradient.as_ref().map(|g| g.stops.len()), Some(2));
    }

    #[test]
    fn test_image_background() {
        let json = r#"{"background": {"type": "image", "url": "bg.png", "fit": "contain", "position": "top-left"}}"#;
        let paper: PaperSettings = serde_json::from_str(json).unwrap();
        assert_eq!(paper.background.image_url(), Some("bg.png"));
        let Background::Image(fill) = &paper.background else {
            panic!("expected image background");
        };
        assert_eq!(fill.position.anchor(), (0.0, 0.0));
        assert!(!fill.repeat);
    }
}
