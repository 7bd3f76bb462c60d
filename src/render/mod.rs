//! # Canvas Renderer
//!
//! Turns an element plus a profile snapshot into an [`ElementView`]: the
//! positioned, fully resolved description a drawing surface paints. The
//! view is recomputed on every call; nothing is cached between renders, so
//! a mutated element is always reflected on the next paint.
//!
//! ## Modules
//!
//! - [`color`]: CSS color parsing
//! - [`icons`]: icon lookup for social and icon elements
//! - [`images`]: the image-reference seam ([`ImageSource`](images::ImageSource))
//! - [`raster`]: paints a whole template to a bitmap / PNG
//!
//! ```
//! use cardsmith::render::{RenderMode, Visual, render_element};
//! use cardsmith::resolve::ProfileData;
//! use cardsmith::template::{CanvasElement, ElementKind};
//!
//! let element = CanvasElement::editor_default(ElementKind::Text).bound_to("email");
//! let view = render_element(&element, &ProfileData::default(), RenderMode::Edit);
//! assert!(matches!(view.visual, Visual::Placeholder { .. }));
//! ```

pub mod color;
pub mod icons;
pub mod images;
pub mod raster;

use serde::{Deserialize, Serialize};

use crate::qr::{QrRenderConfig, style_of};
use crate::resolve::{FieldKey, ProfileData};
use crate::template::style::{Filter, ImageFit, Shadow, TextAlign};
use crate::template::{CanvasElement, ElementBody, ElementKind, Template};
use icons::Glyph;

/// What the render is for. Placeholders only show while editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Edit,
    #[default]
    Preview,
    Print,
}

impl RenderMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "edit" => Some(RenderMode::Edit),
            "preview" => Some(RenderMode::Preview),
            "print" => Some(RenderMode::Print),
            _ => None,
        }
    }

    pub fn shows_placeholders(self) -> bool {
        self == RenderMode::Edit
    }
}

/// Flex-style main-axis alignment for an element's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JustifyContent {
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
}

impl From<TextAlign> for JustifyContent {
    fn from(align: TextAlign) -> Self {
        match align {
            TextAlign::Left => JustifyContent::FlexStart,
            TextAlign::Center => JustifyContent::Center,
            TextAlign::Right => JustifyContent::FlexEnd,
            TextAlign::Justify => JustifyContent::SpaceBetween,
        }
    }
}

/// Resolved text styling.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextAppearance {
    pub font_size: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub color: String,
    pub align: TextAlign,
}

/// Resolved box decoration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxAppearance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    pub background_opacity: f32,
    pub border_width: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    pub border_radius: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    pub filter: Filter,
    pub opacity: f32,
    pub rotation: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QrVisual {
    pub data: String,
    /// Present only when the element has a logo reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub config: QrRenderConfig,
}

/// What goes inside the element box.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Visual {
    Text { text: String, multiline: bool },
    Image { src: String, fit: ImageFit },
    Icon { glyph: Glyph },
    /// Social badge: network glyph followed by the handle.
    Badge { glyph: Glyph, text: String },
    Qr(QrVisual),
    /// Edit-mode stand-in for content that is not there.
    Placeholder { label: String },
    Empty,
}

/// A positioned, resolved element ready to paint. Geometry is in canvas pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementView {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub left: i32,
    pub top: i32,
    pub width: u32,
    pub height: u32,
    pub justify_content: JustifyContent,
    pub text: TextAppearance,
    #[serde(rename = "box")]
    pub frame: BoxAppearance,
    pub visual: Visual,
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Editor label for an element's missing content.
fn placeholder_label(element: &CanvasElement) -> String {
    match element.bound_field() {
        Some(field) => FieldKey::parse(field)
            .map(|key| key.label().to_string())
            .unwrap_or_else(|| field.to_string()),
        None => element.kind().label().to_string(),
    }
}

fn missing(element: &CanvasElement, mode: RenderMode) -> Visual {
    if mode.shows_placeholders() {
        Visual::Placeholder {
            label: placeholder_label(element),
        }
    } else {
        Visual::Empty
    }
}

fn visual_for(element: &CanvasElement, profile: &ProfileData, mode: RenderMode) -> Visual {
    match element.body() {
        ElementBody::Text(_) | ElementBody::Textarea(_) => {
            let text = element.resolved_content(profile);
            if text.trim().is_empty() {
                // Unbound and empty is a deliberate blank, not missing data.
                return match element.bound_field() {
                    Some(_) => missing(element, mode),
                    None => Visual::Empty,
                };
            }
            Visual::Text {
                text,
                multiline: element.kind().is_multiline(),
            }
        }
        ElementBody::Picture(picture) => match element.image_reference(profile) {
            Some(src) => Visual::Image { src, fit: picture.fit },
            None => missing(element, mode),
        },
        ElementBody::Social(_) => {
            let text = element.resolved_content(profile);
            if text.trim().is_empty() {
                return missing(element, mode);
            }
            Visual::Badge {
                glyph: icons::lookup(element.bound_field().unwrap_or_default()),
                text,
            }
        }
        ElementBody::Icon(icon) => Visual::Icon {
            glyph: icons::lookup(&icon.icon_name),
        },
        ElementBody::QrCode(qr) => {
            let Some(data) = element.qr_data(profile) else {
                return missing(element, mode);
            };
            let mut config = style_of(&qr.qr_style, qr.qr_color.as_deref())
                .sized(element.width, element.height);
            if let Some(background) = non_blank(element.style.background_color.as_deref()) {
                config = config.with_background(background);
            }
            Visual::Qr(QrVisual {
                data,
                logo: non_blank(qr.qr_logo.as_deref()),
                config,
            })
        }
    }
}

/// Resolve one element for painting.
pub fn render_element(element: &CanvasElement, profile: &ProfileData, mode: RenderMode) -> ElementView {
    let style = &element.style;
    let align = style.align();
    ElementView {
        id: element.id().to_string(),
        kind: element.kind(),
        left: element.x,
        top: element.y,
        width: element.width,
        height: element.height,
        justify_content: align.into(),
        text: TextAppearance {
            font_size: style.font_size_or_default(),
            font_family: non_blank(style.font_family.as_deref()),
            bold: style.is_bold(),
            italic: style.italic.unwrap_or(false),
            underline: style.underline.unwrap_or(false),
            color: style.text_color().to_string(),
            align,
        },
        frame: BoxAppearance {
            background_color: non_blank(style.background_color.as_deref()),
            background_opacity: style.effective_background_opacity(),
            border_width: style.effective_border_width(),
            border_color: non_blank(style.border_color.as_deref()),
            border_radius: style.effective_border_radius(),
            shadow: style.shadow.clone(),
            filter: style.filter.unwrap_or_default(),
            opacity: style.effective_opacity(),
            rotation: style.effective_rotation(),
        },
        visual: visual_for(element, profile, mode),
    }
}

/// Resolve every element of a template, in paint order.
pub fn render_template(template: &Template, profile: &ProfileData, mode: RenderMode) -> Vec<ElementView> {
    template
        .elements
        .iter()
        .map(|element| render_element(element, profile, mode))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::{DotType, DEFAULT_QR_BACKGROUND};
    use crate::resolve::Profile;
    use crate::template::{ElementKind, StyleProperty};
    use pretty_assertions::assert_eq;

    fn profile() -> ProfileData {
        ProfileData {
            profile: Profile {
                first_name: Some("Somchai".into()),
                instagram: Some("@somchai".into()),
                website: Some("https://somchai.dev".into()),
                ..Default::default()
            },
            addresses: Vec::new(),
        }
    }

    #[test]
    fn test_geometry_and_alignment() {
        let mut element = CanvasElement::editor_default(ElementKind::Text).at(15, 25).sized(120, 40);
        element.set_style(StyleProperty::TextAlign(TextAlign::Right));
        let view = render_element(&element, &profile(), RenderMode::Preview);
        assert_eq!((view.left, view.top, view.width, view.height), (15, 25, 120, 40));
        assert_eq!(view.justify_content, JustifyContent::FlexEnd);
    }

    #[test]
    fn test_binding_precedence_in_view() {
        let mut element = CanvasElement::editor_default(ElementKind::Text).bound_to("firstName");
        let before = render_element(&element, &profile(), RenderMode::Preview).visual;
        element.set_content("something else");
        let after = render_element(&element, &profile(), RenderMode::Preview).visual;
        assert_eq!(before, after);
        assert_eq!(
            after,
            Visual::Text {
                text: "Somchai".into(),
                multiline: false
            }
        );

        element.set_field("");
        assert_eq!(
            render_element(&element, &profile(), RenderMode::Preview).visual,
            Visual::Text {
                text: "something else".into(),
                multiline: false
            }
        );
    }

    #[test]
    fn test_placeholders_only_in_edit() {
        let element = CanvasElement::editor_default(ElementKind::Textarea).bound_to("workAddress2");
        assert_eq!(
            render_element(&element, &profile(), RenderMode::Edit).visual,
            Visual::Placeholder {
                label: "Work address 2".into()
            }
        );
        assert_eq!(render_element(&element, &profile(), RenderMode::Preview).visual, Visual::Empty);
        assert_eq!(render_element(&element, &profile(), RenderMode::Print).visual, Visual::Empty);

        let picture = CanvasElement::editor_default(ElementKind::Picture);
        assert_eq!(
            render_element(&picture, &profile(), RenderMode::Edit).visual,
            Visual::Placeholder {
                label: "Picture".into()
            }
        );
    }

    #[test]
    fn test_social_badge_follows_field() {
        let mut element = CanvasElement::editor_default(ElementKind::Social);
        element.set_field("instagram");
        let Visual::Badge { glyph, text } = render_element(&element, &profile(), RenderMode::Preview).visual else {
            panic!("expected badge");
        };
        assert_eq!(glyph.name, "instagram");
        assert_eq!(text, "@somchai");
    }

    #[test]
    fn test_unknown_icon_is_placeholder_glyph() {
        let mut element = CanvasElement::editor_default(ElementKind::Icon);
        element.set_icon_name("not-an-icon");
        for mode in [RenderMode::Edit, RenderMode::Preview, RenderMode::Print] {
            assert_eq!(
                render_element(&element, &profile(), mode).visual,
                Visual::Icon {
                    glyph: icons::PLACEHOLDER
                }
            );
        }
    }

    #[test]
    fn test_qr_restyled_on_every_render() {
        let mut element = CanvasElement::editor_default(ElementKind::QrCode).sized(120, 120);
        let Visual::Qr(first) = render_element(&element, &profile(), RenderMode::Preview).visual else {
            panic!("expected qr");
        };
        assert_eq!(first.config.dots_options.dot_type, DotType::Square);
        assert_eq!((first.config.width, first.config.height), (120, 120));
        assert_eq!(first.config.background_options.color, DEFAULT_QR_BACKGROUND);
        assert_eq!(first.logo, None);

        element.set_qr_style("dots");
        element.set_qr_logo("logo.png");
        element.set_style(StyleProperty::BackgroundColor("#FFEEDD".into()));
        let Visual::Qr(second) = render_element(&element, &profile(), RenderMode::Preview).visual else {
            panic!("expected qr");
        };
        assert_eq!(second.config.dots_options.dot_type, DotType::Dots);
        assert_eq!(second.config.background_options.color, "#FFEEDD");
        assert_eq!(second.logo.as_deref(), Some("logo.png"));
    }

    #[test]
    fn test_qr_bound_to_field() {
        let element = CanvasElement::editor_default(ElementKind::QrCode).bound_to("website");
        let Visual::Qr(qr) = render_element(&element, &profile(), RenderMode::Print).visual else {
            panic!("expected qr");
        };
        assert_eq!(qr.data, "https://somchai.dev");
    }

    #[test]
    fn test_view_serialization() {
        let element = CanvasElement::editor_default(ElementKind::Icon).with_id("i1");
        let json = serde_json::to_value(render_element(&element, &profile(), RenderMode::Edit)).unwrap();
        assert_eq!(json["type"], "icon");
        assert_eq!(json["justifyContent"], "flex-start");
        assert_eq!(json["visual"]["kind"], "icon");
        assert_eq!(json["visual"]["glyph"]["name"], "phone");
    }

    #[test]
    fn test_render_template_order() {
        let mut template = Template::default();
        template.place(ElementKind::Text, 0, 0);
        template.place(ElementKind::Icon, 10, 10);
        let views = render_template(&template, &profile(), RenderMode::Preview);
        let kinds: Vec<_> = views.iter().map(|v| v.kind).collect();
        assert_eq!(kinds, vec![ElementKind::Text, ElementKind::Icon]);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!(RenderMode::parse("PRINT"), Some(RenderMode::Print));
        assert_eq!(RenderMode::parse("draft"), None);
    }
}
