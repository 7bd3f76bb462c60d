//! # QR Style Resolver
//!
//! Maps an abstract QR style token plus a color to a concrete rendering
//! configuration: dot shape, corner shapes and background.
//!
//! ## Tokens
//!
//! | Token | Dots | Corner squares | Corner dots | Background |
//! |-------|------|----------------|-------------|------------|
//! | `standard` / `square` | square | - | - | `#FFFFFF` |
//! | `rounded` | rounded | - | - | `#FFFFFF` |
//! | `dots` | dots | - | - | `#FFFFFF` |
//! | `classy` | classy | - | - | `#FFFFFF` |
//! | `classy-rounded` | classy-rounded | - | - | `#FFFFFF` |
//! | `extra-rounded` | extra-rounded | - | - | `#FFFFFF` |
//! | `custom-corners` | square | extra-rounded | dot | `#FFFFFF` |
//! | `gradient-style` | rounded | square | square | `#F5F5F5` |
//!
//! Unknown tokens resolve exactly like `standard`. The configuration
//! serializes to the camelCase shape browser QR stylers expect:
//!
//! ```
//! use cardsmith::qr::style_of;
//!
//! let config = style_of("custom-corners", Some("#1877F2"));
//! let json = serde_json::to_value(&config).unwrap();
//! assert_eq!(json["dotsOptions"]["color"], "#1877F2");
//! assert_eq!(json["cornersSquareOptions"]["type"], "extra-rounded");
//! assert_eq!(json["cornersDotOptions"]["type"], "dot");
//! ```

use serde::{Deserialize, Serialize};

/// Default edge length of a QR render configuration.
pub const QR_SIZE: u32 = 300;
/// Dot/corner color used when the caller supplies none.
pub const DEFAULT_QR_COLOR: &str = "#000000";
/// Default QR background.
pub const DEFAULT_QR_BACKGROUND: &str = "#FFFFFF";
/// Light neutral background used by `gradient-style`.
pub const GRADIENT_STYLE_BACKGROUND: &str = "#F5F5F5";

/// Abstract QR style selected in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QrStyle {
    #[default]
    Standard,
    Rounded,
    Dots,
    Classy,
    ClassyRounded,
    ExtraRounded,
    CustomCorners,
    GradientStyle,
}

impl QrStyle {
    pub const ALL: &'static [QrStyle] = &[
        QrStyle::Standard,
        QrStyle::Rounded,
        QrStyle::Dots,
        QrStyle::Classy,
        QrStyle::ClassyRounded,
        QrStyle::ExtraRounded,
        QrStyle::CustomCorners,
        QrStyle::GradientStyle,
    ];

    /// Parse a token. Returns `None` for unknown tokens.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "standard" | "square" => Some(QrStyle::Standard),
            "rounded" => Some(QrStyle::Rounded),
            "dots" => Some(QrStyle::Dots),
            "classy" => Some(QrStyle::Classy),
            "classy-rounded" => Some(QrStyle::ClassyRounded),
            "extra-rounded" => Some(QrStyle::ExtraRounded),
            "custom-corners" => Some(QrStyle::CustomCorners),
            "gradient-style" => Some(QrStyle::GradientStyle),
            _ => None,
        }
    }

    pub fn all() -> &'static [QrStyle] {
        Self::ALL
    }

    /// Parse a token, falling back to [`QrStyle::Standard`].
    pub fn from_token(token: &str) -> Self {
        Self::parse(token).unwrap_or_default()
    }

    pub fn token(self) -> &'static str {
        match self {
            QrStyle::Standard => "standard",
            QrStyle::Rounded => "rounded",
            QrStyle::Dots => "dots",
            QrStyle::Classy => "classy",
            QrStyle::ClassyRounded => "classy-rounded",
            QrStyle::ExtraRounded => "extra-rounded",
            QrStyle::CustomCorners => "custom-corners",
            QrStyle::GradientStyle => "gradient-style",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QrStyle::Standard => "Standard",
            QrStyle::Rounded => "Rounded",
            QrStyle::Dots => "Dots",
            QrStyle::Classy => "Classy",
            QrStyle::ClassyRounded => "Classy Rounded",
            QrStyle::ExtraRounded => "Extra Rounded",
            QrStyle::CustomCorners => "Custom Corners",
            QrStyle::GradientStyle => "Gradient Style",
        }
    }

    fn dot_type(self) -> DotType {
        match self {
            QrStyle::Standard | QrStyle::CustomCorners => DotType::Square,
            QrStyle::Rounded | QrStyle::GradientStyle => DotType::Rounded,
            QrStyle::Dots => DotType::Dots,
            QrStyle::Classy => DotType::Classy,
            QrStyle::ClassyRounded => DotType::ClassyRounded,
            QrStyle::ExtraRounded => DotType::ExtraRounded,
        }
    }
}

/// Shape of the data modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DotType {
    #[default]
    Square,
    Rounded,
    Dots,
    Classy,
    ClassyRounded,
    ExtraRounded,
}

/// Shape of the three finder-pattern outer squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerSquareType {
    Square,
    Dot,
    ExtraRounded,
}

/// Shape of the three finder-pattern centers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CornerDotType {
    Square,
    Dot,
}

/// Output kind requested from the QR styler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QrRenderType {
    #[default]
    Vector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DotsOptions {
    #[serde(rename = "type")]
    pub dot_type: DotType,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundOptions {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornersSquareOptions {
    #[serde(rename = "type")]
    pub square_type: CornerSquareType,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CornersDotOptions {
    #[serde(rename = "type")]
    pub dot_type: CornerDotType,
    pub color: String,
}

/// Concrete QR rendering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrRenderConfig {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "type")]
    pub render_type: QrRenderType,
    pub dots_options: DotsOptions,
    pub background_options: BackgroundOptions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corners_square_options: Option<CornersSquareOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corners_dot_options: Option<CornersDotOptions>,
}

impl QrRenderConfig {
    /// Replace the background color.
    pub fn with_background(mut self, color: impl Into<String>) -> Self {
        self.background_options.color = color.into();
        self
    }

    /// Replace the output size.
    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Color of the corner squares (falls back to the dot color).
    pub fn corner_square_color(&self) -> &str {
        self.corners_square_options
            .as_ref()
            .map(|c| c.color.as_str())
            .unwrap_or(self.dots_options.color.as_str())
    }

    /// Color of the corner dots (falls back to the dot color).
    pub fn corner_dot_color(&self) -> &str {
        self.corners_dot_options
            .as_ref()
            .map(|c| c.color.as_str())
            .unwrap_or(self.dots_options.color.as_str())
    }
}

/// Resolve a style token and color to a render configuration.
///
/// `color` applies to dots and corners. A missing or blank color means
/// [`DEFAULT_QR_COLOR`].
pub fn style_of(token: &str, color: Option<&str>) -> QrRenderConfig {
    let style = QrStyle::from_token(token);
    let color = color
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_QR_COLOR)
        .to_string();

    let mut config = QrRenderConfig {
        width: QR_SIZE,
        height: QR_SIZE,
        render_type: QrRenderType::Vector,
        dots_options: DotsOptions {
            dot_type: style.dot_type(),
            color: color.clone(),
        },
        background_options: BackgroundOptions {
            color: DEFAULT_QR_BACKGROUND.to_string(),
        },
        corners_square_options: None,
        corners_dot_options: None,
    };

    match style {
        QrStyle::CustomCorners => {
            config.corners_square_options = Some(CornersSquareOptions {
                square_type: CornerSquareType::ExtraRounded,
                color: color.clone(),
            });
            config.corners_dot_options = Some(CornersDotOptions {
                dot_type: CornerDotType::Dot,
                color,
            });
        }
        QrStyle::GradientStyle => {
            config.background_options.color = GRADIENT_STYLE_BACKGROUND.to_string();
            config.corners_square_options = Some(CornersSquareOptions {
                square_type: CornerSquareType::Square,
                color: color.clone(),
            });
            config.corners_dot_options = Some(CornersDotOptions {
                dot_type: CornerDotType::Square,
                color,
            });
        }
        _ => {}
    }

    config
}

/// Style token metadata for editors.
#[derive(Debug, Clone, Serialize)]
pub struct QrStyleMeta {
    pub token: &'static str,
    pub label: &'static str,
}

pub fn qr_style_catalog() -> Vec<QrStyleMeta> {
    QrStyle::all()
        .iter()
        .map(|s| QrStyleMeta {
            token: s.token(),
            label: s.label(),
        })
        .collect()
}
