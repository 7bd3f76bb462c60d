//! Per-element visual style.
//!
//! Every attribute is optional: an unset attribute means "renderer
//! default". Edits are shallow merges, so setting one attribute never
//! disturbs the others.

use serde::{Deserialize, Serialize};

/// Font size used when an element sets none, in canvas pixels.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;
/// Text color used when an element sets none.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" | "400" | "regular" => Some(FontWeight::Normal),
            "bold" | "700" | "600" | "800" | "900" => Some(FontWeight::Bold),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "left" | "start" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" | "end" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }
}

/// Whole-element filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    None,
    Grayscale,
    Sepia,
    Invert,
    Blur,
}

impl Filter {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Some(Filter::None),
            "grayscale" | "greyscale" => Some(Filter::Grayscale),
            "sepia" => Some(Filter::Sepia),
            "invert" => Some(Filter::Invert),
            "blur" => Some(Filter::Blur),
            _ => None,
        }
    }
}

/// How an image fills its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
    None,
}

/// Drop shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    #[serde(default)]
    pub offset_x: f32,
    #[serde(default)]
    pub offset_y: f32,
    #[serde(default)]
    pub blur: f32,
    #[serde(default = "default_shadow_color")]
    pub color: String,
}

fn default_shadow_color() -> String {
    "rgba(0,0,0,0.3)".to_string()
}

impl Shadow {
    /// Parse `"<x> <y> [blur] [color]"`, e.g. `"2px 2px 4px #00000066"`.
    /// `"none"` parses to `None`.
    fn parse(value: &str) -> Option<Option<Self>> {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("none") {
            return Some(None);
        }
        let mut numbers = Vec::new();
        let mut color = None;
        for token in value.split_whitespace() {
            match parse_length(token) {
                Some(n) if color.is_none() => numbers.push(n),
                _ => color = Some(token.to_string()),
            }
        }
        if numbers.len() < 2 {
            return None;
        }
        Some(Some(Shadow {
            offset_x: numbers[0],
            offset_y: numbers[1],
            blur: numbers.get(2).copied().unwrap_or(0.0).max(0.0),
            color: color.unwrap_or_else(default_shadow_color),
        }))
    }
}

/// Parse a CSS-ish length ("12", "12px", "1.5").
fn parse_length(token: &str) -> Option<f32> {
    let token = token.trim();
    let number = token.strip_suffix("px").unwrap_or(token);
    number.parse::<f32>().ok().filter(|n| n.is_finite())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Boolean or CSS keyword: `on` switches it on, `normal`/`none` switch it off.
fn parse_toggle(value: &str, on: &str) -> Option<bool> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case(on) {
        return Some(true);
    }
    if trimmed.eq_ignore_ascii_case("normal") || trimmed.eq_ignore_ascii_case("none") {
        return Some(false);
    }
    parse_bool(trimmed)
}

/// Visual attributes of an element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// 0.0 – 1.0, applies to the background color only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    /// 0.0 – 1.0, applies to the whole element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// Degrees, clockwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
}

macro_rules! merge_fields {
    ($target:expr, $patch:expr; $($field:ident),+ $(,)?) => {
        $(
            if let Some(value) = &$patch.$field {
                $target.$field = Some(value.clone());
            }
        )+
    };
}

impl ElementStyle {
    /// Shallow merge: attributes set in `patch` overwrite, the rest stay.
    pub fn merge(&mut self, patch: &ElementStyle) {
        merge_fields!(self, patch;
            font_size, font_family, font_weight, italic, underline, color,
            text_align, background_color, background_opacity, border_width,
            border_color, border_radius, shadow, filter, opacity, rotation,
        );
    }

    /// Set a single attribute.
    pub fn apply(&mut self, property: StyleProperty) {
        match property {
            StyleProperty::FontSize(v) => self.font_size = Some(v.max(0.0)),
            StyleProperty::FontFamily(v) => self.font_family = Some(v),
            StyleProperty::FontWeight(v) => self.font_weight = Some(v),
            StyleProperty::Italic(v) => self.italic = Some(v),
            StyleProperty::Underline(v) => self.underline = Some(v),
            StyleProperty::Color(v) => self.color = Some(v),
            StyleProperty::TextAlign(v) => self.text_align = Some(v),
            StyleProperty::BackgroundColor(v) => self.background_color = Some(v),
            StyleProperty::BackgroundOpacity(v) => self.background_opacity = Some(v.clamp(0.0, 1.0)),
            StyleProperty::BorderWidth(v) => self.border_width = Some(v.max(0.0)),
            StyleProperty::BorderColor(v) => self.border_color = Some(v),
            StyleProperty::BorderRadius(v) => self.border_radius = Some(v.max(0.0)),
            StyleProperty::Shadow(v) => self.shadow = v,
            StyleProperty::Filter(v) => self.filter = Some(v),
            StyleProperty::Opacity(v) => self.opacity = Some(v.clamp(0.0, 1.0)),
            StyleProperty::Rotation(v) => self.rotation = Some(v),
        }
    }

    pub fn font_size_or_default(&self) -> f32 {
        self.font_size.filter(|s| *s > 0.0).unwrap_or(DEFAULT_FONT_SIZE)
    }

    pub fn text_color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_TEXT_COLOR)
    }

    pub fn is_bold(&self) -> bool {
        self.font_weight == Some(FontWeight::Bold)
    }

    pub fn align(&self) -> TextAlign {
        self.text_align.unwrap_or_default()
    }

    pub fn effective_opacity(&self) -> f32 {
        self.opacity.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    pub fn effective_background_opacity(&self) -> f32 {
        self.background_opacity.unwrap_or(1.0).clamp(0.0, 1.0)
    }

    pub fn effective_border_width(&self) -> f32 {
        self.border_width.unwrap_or(0.0).max(0.0)
    }

    pub fn effective_border_radius(&self) -> f32 {
        self.border_radius.unwrap_or(0.0).max(0.0)
    }

    pub fn effective_rotation(&self) -> f32 {
        self.rotation.filter(|r| r.is_finite()).unwrap_or(0.0)
    }
}

/// A single style edit, as issued by a property panel.
#[derive(Debug, Clone, PartialEq)]
pub enum StyleProperty {
    FontSize(f32),
    FontFamily(String),
    FontWeight(FontWeight),
    Italic(bool),
    Underline(bool),
    Color(String),
    TextAlign(TextAlign),
    BackgroundColor(String),
    BackgroundOpacity(f32),
    BorderWidth(f32),
    BorderColor(String),
    BorderRadius(f32),
    /// `None` removes the shadow.
    Shadow(Option<Shadow>),
    Filter(Filter),
    Opacity(f32),
    Rotation(f32),
}

impl StyleProperty {
    /// Parse a `(key, value)` pair from a form control.
    ///
    /// Keys are the camelCase attribute names. Returns `None` for unknown
    /// keys or values that do not parse.
    pub fn parse(key: &str, value: &str) -> Option<Self> {
        let number = || parse_length(value);
        let text = || value.trim().to_string();
        let property = match key {
            "fontSize" => StyleProperty::FontSize(number()?),
            "fontFamily" => StyleProperty::FontFamily(text()),
            "fontWeight" => StyleProperty::FontWeight(FontWeight::parse(value)?),
            "italic" | "fontStyle" => StyleProperty::Italic(parse_toggle(value, "italic")?),
            "underline" | "textDecoration" => StyleProperty::Underline(parse_toggle(value, "underline")?),
            "color" => StyleProperty::Color(text()),
            "textAlign" => StyleProperty::TextAlign(TextAlign::parse(value)?),
            "backgroundColor" => StyleProperty::BackgroundColor(text()),
            "backgroundOpacity" => StyleProperty::BackgroundOpacity(number()?),
            "borderWidth" => StyleProperty::BorderWidth(number()?),
            "borderColor" => StyleProperty::BorderColor(text()),
            "borderRadius" => StyleProperty::BorderRadius(number()?),
            "shadow" | "boxShadow" => StyleProperty::Shadow(Shadow::parse(value)?),
            "filter" => StyleProperty::Filter(Filter::parse(value)?),
            "opacity" => StyleProperty::Opacity(number()?),
            "rotation" => StyleProperty::Rotation(number()?),
            _ => return None,
        };
        Some(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_apply_keeps_other_attributes() {
        let mut style = ElementStyle {
            color: Some("#FF0000".into()),
            ..Default::default()
        };
        style.apply(StyleProperty::FontSize(18.0));
        assert_eq!(style.color.as_deref(), Some("#FF0000"));
        assert_eq!(style.font_size, Some(18.0));
    }

    #[test]
    fn test_merge_is_shallow() {
        let mut style = ElementStyle {
            color: Some("#333333".into()),
            border_width: Some(1.0),
            ..Default::default()
        };
        let patch = ElementStyle {
            font_size: Some(20.0),
            border_width: Some(2.0),
            ..Default::default()
        };
        style.merge(&patch);
        assert_eq!(style.color.as_deref(), Some("#333333"));
        assert_eq!(style.font_size, Some(20.0));
        assert_eq!(style.border_width, Some(2.0));
    }

    #[test]
    fn test_opacity_clamped() {
        let mut style = ElementStyle::default();
        style.apply(StyleProperty::Opacity(3.0));
        assert_eq!(style.opacity, Some(1.0));
        style.apply(StyleProperty::BackgroundOpacity(-1.0));
        assert_eq!(style.background_opacity, Some(0.0));
    }

    #[test]
    fn test_parse_form_values() {
        assert_eq!(StyleProperty::parse("fontSize", "16px"), Some(StyleProperty::FontSize(16.0)));
        assert_eq!(
            StyleProperty::parse("fontWeight", "700"),
            Some(StyleProperty::FontWeight(FontWeight::Bold))
        );
        assert_eq!(StyleProperty::parse("fontStyle", "italic"), Some(StyleProperty::Italic(true)));
        assert_eq!(
            StyleProperty::parse("textAlign", "center"),
            Some(StyleProperty::TextAlign(TextAlign::Center))
        );
        assert_eq!(StyleProperty::parse("fontSize", "big"), None);
        assert_eq!(StyleProperty::parse("nonsense", "1"), None);
    }

    #[test]
    fn test_parse_shadow() {
        let parsed = StyleProperty::parse("shadow", "2px 3px 4px #00000066").unwrap();
        assert_eq!(
            parsed,
            StyleProperty::Shadow(Some(Shadow {
                offset_x: 2.0,
                offset_y: 3.0,
                blur: 4.0,
                color: "#00000066".into(),
            }))
        );
        assert_eq!(StyleProperty::parse("shadow", "none"), Some(StyleProperty::Shadow(None)));
        assert_eq!(StyleProperty::parse("shadow", "2px"), None);
    }

    #[test]
    fn test_defaults() {
        let style = ElementStyle::default();
        assert_eq!(style.font_size_or_default(), DEFAULT_FONT_SIZE);
        assert_eq!(style.text_color(), DEFAULT_TEXT_COLOR);
        assert_eq!(style.align(), TextAlign::Left);
        assert_eq!(style.effective_opacity(), 1.0);
        assert!(!style.is_bold());
    }

    #[test]
    fn test_serialization_skips_unset() {
        let style = ElementStyle {
            font_size: Some(12.0),
            ..Default::default()
        };
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json, serde_json::json!({"fontSize": 12.0}));
    }
}
