//! Type-specific element bodies.
//!
//! Each body carries only the state that belongs to its element type; the
//! shared state (geometry, binding, content, style) lives on
//! [`CanvasElement`](super::CanvasElement). Every body implements
//! [`ElementMeta`] so the palette can build a ready-to-use element of any type.

use serde::{Deserialize, Serialize};

use super::style::ImageFit;

/// Metadata that every element body provides to the palette.
pub trait ElementMeta: Sized {
    /// Human-readable display label (e.g. "QR Code").
    fn label() -> &'static str;

    /// Body of a freshly placed element.
    fn editor_default() -> Self;

    /// Initial (width, height) in canvas pixels.
    fn default_size() -> (u32, u32);

    /// Literal content of a freshly placed element.
    fn starter_content() -> &'static str {
        ""
    }

    /// Field binding of a freshly placed element.
    fn starter_field() -> Option<&'static str> {
        None
    }
}

/// Single-line text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {}

impl ElementMeta for TextBlock {
    fn label() -> &'static str {
        "Text"
    }
    fn editor_default() -> Self {
        TextBlock {}
    }
    fn default_size() -> (u32, u32) {
        (200, 30)
    }
    fn starter_content() -> &'static str {
        "Text"
    }
}

/// Multi-line, word-wrapped text. Usually bound to an address field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextArea {
    /// Per-element override of administrative-division prefixes.
    /// Unset means prefixes are used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_address_prefix: Option<bool>,
}

impl ElementMeta for TextArea {
    fn label() -> &'static str {
        "Text Area"
    }
    fn editor_default() -> Self {
        TextArea::default()
    }
    fn default_size() -> (u32, u32) {
        (250, 80)
    }
    fn starter_content() -> &'static str {
        "Multi-line text"
    }
}

/// An image. The source is the bound field (e.g. `profileImage`) or `imageUrl`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Picture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub fit: ImageFit,
}

impl ElementMeta for Picture {
    fn label() -> &'static str {
        "Picture"
    }
    fn editor_default() -> Self {
        Picture::default()
    }
    fn default_size() -> (u32, u32) {
        (100, 100)
    }
}

/// Social-network badge: network icon plus the bound handle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Social {}

impl ElementMeta for Social {
    fn label() -> &'static str {
        "Social"
    }
    fn editor_default() -> Self {
        Social {}
    }
    fn default_size() -> (u32, u32) {
        (180, 30)
    }
    fn starter_field() -> Option<&'static str> {
        Some("facebook")
    }
}

/// A standalone icon glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Icon {
    #[serde(default)]
    pub icon_name: String,
}

impl ElementMeta for Icon {
    fn label() -> &'static str {
        "Icon"
    }
    fn editor_default() -> Self {
        Icon {
            icon_name: "phone".into(),
        }
    }
    fn default_size() -> (u32, u32) {
        (32, 32)
    }
}

fn default_qr_style() -> String {
    "standard".to_string()
}

/// QR code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrCode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_url: Option<String>,
    /// Style token, see [`crate::qr::QrStyle`].
    #[serde(default = "default_qr_style")]
    pub qr_style: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_color: Option<String>,
    /// Image reference drawn over the center of the code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_logo: Option<String>,
}

impl Default for QrCode {
    fn default() -> Self {
        QrCode {
            qr_url: None,
            qr_style: default_qr_style(),
            qr_color: None,
            qr_logo: None,
        }
    }
}

impl ElementMeta for QrCode {
    fn label() -> &'static str {
        "QR Code"
    }
    fn editor_default() -> Self {
        QrCode {
            qr_url: Some("https://example.com".into()),
            ..Default::default()
        }
    }
    fn default_size() -> (u32, u32) {
        (100, 100)
    }
}
