//! A placed canvas element.

use serde::{Deserialize, Deserializer, Serialize};

use super::editor::NumericInput;
use super::style::ElementStyle;
use super::types::{ElementMeta, Icon, Picture, QrCode, Social, TextArea, TextBlock};
use super::{ElementBody, ElementKind};
use crate::resolve::{self, FieldKey, ProfileData, ResolveOptions};

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Missing or blank ids get a fresh one.
fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let id: Option<String> = Option::deserialize(deserializer)?;
    Ok(id.filter(|s| !s.trim().is_empty()).unwrap_or_else(new_id))
}

fn deserialize_coordinate<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumericInput> = Option::deserialize(deserializer)?;
    Ok(raw.map(|n| n.coordinate()).unwrap_or(0))
}

fn deserialize_extent<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumericInput> = Option::deserialize(deserializer)?;
    Ok(raw.map(|n| n.extent()).unwrap_or(0))
}

/// One placed, positioned, styled block on the card canvas.
///
/// The element type is fixed at creation. Geometry is in canvas pixels
/// (96 DPI); `width`/`height` are unsigned so a negative size cannot exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasElement {
    #[serde(default = "new_id", deserialize_with = "deserialize_id")]
    id: String,
    #[serde(flatten)]
    pub(super) body: ElementBody,
    /// Semantic binding key. When set, `content` is not displayed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Literal text, shown only while `field` is unset.
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub x: i32,
    #[serde(default, deserialize_with = "deserialize_coordinate")]
    pub y: i32,
    #[serde(default, deserialize_with = "deserialize_extent")]
    pub width: u32,
    #[serde(default, deserialize_with = "deserialize_extent")]
    pub height: u32,
    #[serde(default)]
    pub style: ElementStyle,
}

impl CanvasElement {
    /// New element at the origin with a generated id and zero size.
    pub fn new(body: ElementBody) -> Self {
        CanvasElement {
            id: new_id(),
            body,
            field: None,
            content: String::new(),
            x: 0,
            y: 0,
            width: 0,
            height: 0,
            style: ElementStyle::default(),
        }
    }

    /// Fresh element of `kind` as the palette places it.
    pub fn editor_default(kind: ElementKind) -> Self {
        let (body, (width, height), content, field) = match kind {
            ElementKind::Text => palette_parts::<TextBlock>(ElementBody::Text),
            ElementKind::Textarea => palette_parts::<TextArea>(ElementBody::Textarea),
            ElementKind::Picture => palette_parts::<Picture>(ElementBody::Picture),
            ElementKind::Social => palette_parts::<Social>(ElementBody::Social),
            ElementKind::Icon => palette_parts::<Icon>(ElementBody::Icon),
            ElementKind::QrCode => palette_parts::<QrCode>(ElementBody::QrCode),
        };
        CanvasElement {
            field: field.map(str::to_string),
            content: content.to_string(),
            width,
            height,
            ..CanvasElement::new(body)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn sized(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn bound_to(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_style(mut self, style: ElementStyle) -> Self {
        self.style = style;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ElementKind {
        self.body.kind()
    }

    pub fn body(&self) -> &ElementBody {
        &self.body
    }

    /// The binding key, if set and non-blank.
    pub fn bound_field(&self) -> Option<&str> {
        self.field.as_deref().map(str::trim).filter(|f| !f.is_empty())
    }

    /// Whether the binding points at a composed address field.
    pub fn is_bound_to_address(&self) -> bool {
        self.bound_field()
            .and_then(FieldKey::parse)
            .is_some_and(FieldKey::is_address)
    }

    /// Resolver options for this element. Only a textarea can turn
    /// address prefixes off.
    pub fn resolve_options(&self) -> ResolveOptions {
        match &self.body {
            ElementBody::Textarea(area) => {
                ResolveOptions::with_prefix(area.use_address_prefix.unwrap_or(true))
            }
            _ => ResolveOptions::default(),
        }
    }

    /// Text this element displays.
    ///
    /// A bound element shows its resolved value, which may be empty; an
    /// unbound element shows `content`.
    pub fn resolved_content(&self, profile: &ProfileData) -> String {
        match self.bound_field() {
            Some(field) => resolve::resolve(field, profile, self.resolve_options()),
            None => self.content.clone(),
        }
    }

    /// Image reference for a picture: the resolved binding, else `imageUrl`.
    pub fn image_reference(&self, profile: &ProfileData) -> Option<String> {
        let ElementBody::Picture(picture) = &self.body else {
            return None;
        };
        let reference = match self.bound_field() {
            Some(_) => self.resolved_content(profile),
            None => picture.image_url.clone().unwrap_or_default(),
        };
        let reference = reference.trim();
        (!reference.is_empty()).then(|| reference.to_string())
    }

    /// Data encoded by a QR element: the resolved binding when bound,
    /// else `qrUrl`, else `content`.
    pub fn qr_data(&self, profile: &ProfileData) -> Option<String> {
        let ElementBody::QrCode(qr) = &self.body else {
            return None;
        };
        let data = match self.bound_field() {
            Some(_) => self.resolved_content(profile),
            None => qr
                .qr_url
                .as_deref()
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| self.content.clone()),
        };
        (!data.trim().is_empty()).then_some(data)
    }
}

fn palette_parts<M: ElementMeta>(
    wrap: fn(M) -> ElementBody,
) -> (ElementBody, (u32, u32), &'static str, Option<&'static str>) {
    (
        wrap(M::editor_default()),
        M::default_size(),
        M::starter_content(),
        M::starter_field(),
    )
}
