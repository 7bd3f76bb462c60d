//! # Template Element Model
//!
//! A [`Template`] is a paper (size, orientation, background) plus the list of
//! elements placed on it. The same types are the Rust API and the JSON wire
//! shape:
//!
//! ```
//! use cardsmith::template::Template;
//!
//! let template: Template = serde_json::from_str(r#"{
//!     "paper": {"size": "Business Card", "orientation": "landscape"},
//!     "elements": [
//!         {"type": "text", "field": "fullName", "x": 20, "y": 20, "width": 200, "height": 30},
//!         {"qrcode": "https://example.com", "x": 230, "y": 100, "width": 90, "height": 90}
//!     ]
//! }"#).unwrap();
//! assert_eq!(template.elements.len(), 2);
//! ```
//!
//! Elements without a `"type"` key may use a shorthand: the shorthand key
//! names the type and carries its primary value.

pub mod editor;
pub mod element;
pub mod paper;
pub mod style;
pub mod types;

pub use editor::{Axis, Dimension, NumericInput};
pub use element::CanvasElement;
pub use paper::{Background, Orientation, PaperSettings, PaperSize};
pub use style::{ElementStyle, StyleProperty};
pub use types::*;

use serde::{Deserialize, Serialize};

use crate::error::CardsmithError;

// ============================================================================
// SHORTHAND DESERIALIZATION
// ============================================================================

/// Shorthand keys: (shorthand_key, type_name, target_field).
///
/// Example: `{"text": "Hello", "x": 10}` → `{"type": "text", "content": "Hello", "x": 10}`
const SHORTHANDS: &[(&str, &str, &str)] = &[
    ("text", "text", "content"),
    ("textarea", "textarea", "content"),
    ("picture", "picture", "imageUrl"),
    ("social", "social", "field"),
    ("icon", "icon", "iconName"),
    ("qrcode", "qrcode", "qrUrl"),
];

/// Rewrite a shorthand element object to canonical `{"type": ...}` form.
fn normalize_shorthand(map: &mut serde_json::Map<String, serde_json::Value>) -> Result<(), String> {
    for &(key, type_name, field) in SHORTHANDS {
        if let Some(val) = map.remove(key) {
            map.insert("type".into(), serde_json::Value::String(type_name.into()));
            map.insert(field.into(), val);
            return Ok(());
        }
    }
    Err(format!(
        "element has no 'type' field and no shorthand key ({})",
        SHORTHANDS
            .iter()
            .map(|(k, _, _)| *k)
            .collect::<Vec<_>>()
            .join(", ")
    ))
}

fn deserialize_elements<'de, D>(deserializer: D) -> Result<Vec<CanvasElement>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let values: Vec<serde_json::Value> = Vec::deserialize(deserializer)?;
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| {
            let mut obj = match v {
                serde_json::Value::Object(map) => map,
                other => {
                    return Err(serde::de::Error::custom(format!(
                        "elements[{}]: expected object, got {}",
                        i, other
                    )));
                }
            };

            if !obj.contains_key("type") {
                normalize_shorthand(&mut obj)
                    .map_err(|e| serde::de::Error::custom(format!("elements[{}]: {}", i, e)))?;
            }

            serde_json::from_value(serde_json::Value::Object(obj))
                .map_err(|e| serde::de::Error::custom(format!("elements[{}]: {}", i, e)))
        })
        .collect()
}

// ============================================================================
// ELEMENT TYPES
// ============================================================================

/// Define the element kind enum, the body enum and their dispatch methods
/// from one list.
///
/// Adding an element type: add one line here, define the body struct in
/// `types.rs` with `impl ElementMeta`, then follow the exhaustive matches.
macro_rules! define_elements {
    ($($variant:ident($inner:ty) => $tag:literal),+ $(,)?) => {
        /// Element type. Fixed when the element is placed.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum ElementKind {
            $(#[serde(rename = $tag)] $variant,)+
        }

        impl ElementKind {
            pub const ALL: &'static [ElementKind] = &[$(ElementKind::$variant,)+];

            /// Wire tag (`"qrcode"`, ...).
            pub fn as_str(self) -> &'static str {
                match self { $(ElementKind::$variant => $tag,)+ }
            }

            pub fn parse(tag: &str) -> Option<Self> {
                let tag = tag.trim();
                Self::ALL.iter().copied().find(|k| k.as_str().eq_ignore_ascii_case(tag))
            }

            /// Display label (from [`ElementMeta::label`]).
            pub fn label(self) -> &'static str {
                match self { $(ElementKind::$variant => <$inner>::label(),)+ }
            }
        }

        /// Type-specific element state, tagged by `"type"`.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "type")]
        pub enum ElementBody {
            $(#[serde(rename = $tag)] $variant($inner),)+
        }

        impl ElementBody {
            pub fn kind(&self) -> ElementKind {
                match self { $(ElementBody::$variant(_) => ElementKind::$variant,)+ }
            }

            pub fn label(&self) -> &'static str {
                self.kind().label()
            }
        }
    };
}

define_elements! {
    Text(TextBlock) => "text",
    Textarea(TextArea) => "textarea",
    Picture(Picture) => "picture",
    Social(Social) => "social",
    Icon(Icon) => "icon",
    QrCode(QrCode) => "qrcode",
}

impl ElementKind {
    /// Shows bindable text (`text`, `textarea`, `social`).
    pub fn is_bindable_text(self) -> bool {
        matches!(self, ElementKind::Text | ElementKind::Textarea | ElementKind::Social)
    }

    pub fn is_multiline(self) -> bool {
        self == ElementKind::Textarea
    }

    pub fn is_image_source(self) -> bool {
        self == ElementKind::Picture
    }

    pub fn is_iconographic(self) -> bool {
        matches!(self, ElementKind::Social | ElementKind::Icon)
    }

    pub fn is_machine_readable(self) -> bool {
        self == ElementKind::QrCode
    }
}

/// Palette entry for editors.
#[derive(Debug, Clone, Serialize)]
pub struct ElementTypeMeta {
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub label: &'static str,
    /// The element a drop from the palette creates (id omitted).
    pub defaults: serde_json::Value,
}

/// Every element type with its editor default.
pub fn palette() -> Vec<ElementTypeMeta> {
    ElementKind::ALL
        .iter()
        .map(|&kind| {
            let mut defaults = serde_json::to_value(CanvasElement::editor_default(kind))
                .unwrap_or(serde_json::Value::Null);
            if let Some(obj) = defaults.as_object_mut() {
                obj.remove("id");
            }
            ElementTypeMeta {
                type_name: kind.as_str(),
                label: kind.label(),
                defaults,
            }
        })
        .collect()
}

// ============================================================================
// TEMPLATE
// ============================================================================

/// A card template: paper plus placed elements, in paint order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub paper: PaperSettings,
    #[serde(default, deserialize_with = "deserialize_elements")]
    pub elements: Vec<CanvasElement>,
}

impl Template {
    pub fn new(paper: PaperSettings) -> Self {
        Template {
            name: None,
            paper,
            elements: Vec::new(),
        }
    }

    /// Parse a template from JSON.
    pub fn from_json(json: &str) -> Result<Self, CardsmithError> {
        serde_json::from_str(json).map_err(|e| CardsmithError::Template(e.to_string()))
    }

    /// Drop a new element of `kind` from the palette at `(x, y)`.
    pub fn place(&mut self, kind: ElementKind, x: i32, y: i32) -> &mut CanvasElement {
        self.add(CanvasElement::editor_default(kind).at(x, y))
    }

    /// Append an element on top of the others.
    pub fn add(&mut self, element: CanvasElement) -> &mut CanvasElement {
        self.elements.push(element);
        let last = self.elements.len() - 1;
        &mut self.elements[last]
    }

    /// Delete the element with `id`, returning it.
    pub fn remove(&mut self, id: &str) -> Option<CanvasElement> {
        let index = self.elements.iter().position(|e| e.id() == id)?;
        Some(self.elements.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&CanvasElement> {
        self.elements.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut CanvasElement> {
        self.elements.iter_mut().find(|e| e.id() == id)
    }
}
