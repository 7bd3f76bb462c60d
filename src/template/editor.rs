//! Property editor operations.
//!
//! These are the only mutations a property panel performs on an element.
//! None of them changes the element's id or type. Setters that only make
//! sense for one element type return `false` and leave the element untouched
//! when called on another type.

use serde::Deserialize;

use super::element::CanvasElement;
use super::style::{ElementStyle, StyleProperty};
use super::ElementBody;

/// Raw numeric input from a form control: a number or the text of one.
///
/// Anything that is not a finite number coerces to 0.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl NumericInput {
    fn value(&self) -> f64 {
        let value = match self {
            NumericInput::Number(n) => *n,
            NumericInput::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        };
        if value.is_finite() { value } else { 0.0 }
    }

    /// Rounded to the nearest integer, saturating at the `i32` range.
    pub fn coordinate(&self) -> i32 {
        self.value().round() as i32
    }

    /// Like [`coordinate`](Self::coordinate), with negatives clamped to 0.
    pub fn extent(&self) -> u32 {
        self.value().round().max(0.0) as u32
    }
}

impl From<f64> for NumericInput {
    fn from(n: f64) -> Self {
        NumericInput::Number(n)
    }
}

impl From<i32> for NumericInput {
    fn from(n: i32) -> Self {
        NumericInput::Number(n.into())
    }
}

impl From<&str> for NumericInput {
    fn from(s: &str) -> Self {
        NumericInput::Text(s.to_string())
    }
}

impl From<String> for NumericInput {
    fn from(s: String) -> Self {
        NumericInput::Text(s)
    }
}

impl From<&serde_json::Value> for NumericInput {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => NumericInput::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => NumericInput::Text(s.clone()),
            _ => NumericInput::Number(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Width,
    Height,
}

/// Blank strings become `None`.
fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Text form of a JSON scalar, as a form control would submit it.
fn json_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl CanvasElement {
    /// Replace the literal content. Stays hidden while a field is bound.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Bind to `field`, or unbind when blank.
    ///
    /// `content` is kept. A textarea bound to anything other than an
    /// address drops its address-prefix override.
    pub fn set_field(&mut self, field: &str) {
        self.field = optional(field);
        let is_address = self.is_bound_to_address();
        if let ElementBody::Textarea(area) = &mut self.body
            && !is_address
        {
            area.use_address_prefix = None;
        }
    }

    /// Set one style attribute, keeping the others.
    pub fn set_style(&mut self, property: StyleProperty) {
        self.style.apply(property);
    }

    /// Parse and set one style attribute from form text. Returns `false`
    /// when the key or value is not understood.
    pub fn set_style_value(&mut self, key: &str, value: &str) -> bool {
        match StyleProperty::parse(key, value) {
            Some(property) => {
                self.set_style(property);
                true
            }
            None => false,
        }
    }

    /// Shallow-merge a style patch.
    pub fn merge_style(&mut self, patch: &ElementStyle) {
        self.style.merge(patch);
    }

    pub fn set_position(&mut self, axis: Axis, value: impl Into<NumericInput>) {
        let value = value.into().coordinate();
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }

    pub fn set_size(&mut self, dimension: Dimension, value: impl Into<NumericInput>) {
        let value = value.into().extent();
        match dimension {
            Dimension::Width => self.width = value,
            Dimension::Height => self.height = value,
        }
    }

    pub fn set_image_url(&mut self, url: &str) -> bool {
        let ElementBody::Picture(picture) = &mut self.body else {
            return false;
        };
        picture.image_url = optional(url);
        true
    }

    pub fn set_icon_name(&mut self, name: &str) -> bool {
        let ElementBody::Icon(icon) = &mut self.body else {
            return false;
        };
        icon.icon_name = name.trim().to_string();
        true
    }

    pub fn set_qr_url(&mut self, url: &str) -> bool {
        let ElementBody::QrCode(qr) = &mut self.body else {
            return false;
        };
        qr.qr_url = optional(url);
        true
    }

    /// Store a style token. Unknown tokens are kept as typed; rendering
    /// falls back to square dots.
    pub fn set_qr_style(&mut self, token: &str) -> bool {
        let ElementBody::QrCode(qr) = &mut self.body else {
            return false;
        };
        qr.qr_style = token.trim().to_string();
        true
    }

    pub fn set_qr_color(&mut self, color: &str) -> bool {
        let ElementBody::QrCode(qr) = &mut self.body else {
            return false;
        };
        qr.qr_color = optional(color);
        true
    }

    pub fn set_qr_logo(&mut self, logo: &str) -> bool {
        let ElementBody::QrCode(qr) = &mut self.body else {
            return false;
        };
        qr.qr_logo = optional(logo);
        true
    }

    pub fn set_use_address_prefix(&mut self, enabled: bool) -> bool {
        let ElementBody::Textarea(area) = &mut self.body else {
            return false;
        };
        area.use_address_prefix = Some(enabled);
        true
    }

    /// Apply a `(key, value)` edit from a property panel.
    ///
    /// Keys are the camelCase element keys (`x`, `qrStyle`, ...) or style
    /// keys (`fontSize`, ...). Returns `false` when nothing was changed
    /// because the key is unknown, the value does not parse, or the key
    /// belongs to another element type.
    pub fn set_property(&mut self, key: &str, value: &serde_json::Value) -> bool {
        match key {
            "content" => {
                self.set_content(json_text(value));
                true
            }
            "field" => {
                self.set_field(&json_text(value));
                true
            }
            "x" => {
                self.set_position(Axis::X, value);
                true
            }
            "y" => {
                self.set_position(Axis::Y, value);
                true
            }
            "width" => {
                self.set_size(Dimension::Width, value);
                true
            }
            "height" => {
                self.set_size(Dimension::Height, value);
                true
            }
            "imageUrl" => self.set_image_url(&json_text(value)),
            "iconName" => self.set_icon_name(&json_text(value)),
            "qrUrl" => self.set_qr_url(&json_text(value)),
            "qrStyle" => self.set_qr_style(&json_text(value)),
            "qrColor" => self.set_qr_color(&json_text(value)),
            "qrLogo" => self.set_qr_logo(&json_text(value)),
            "useAddressPrefix" => match value {
                serde_json::Value::Bool(enabled) => self.set_use_address_prefix(*enabled),
                _ => false,
            },
            "style" => match serde_json::from_value::<ElementStyle>(value.clone()) {
                Ok(patch) => {
                    self.merge_style(&patch);
                    true
                }
                Err(_) => false,
            },
            _ => self.set_style_value(key, &json_text(value)),
        }
    }
}
