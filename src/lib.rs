//! # Cardsmith - Business Card Template Library
//!
//! Cardsmith models the editable elements of a business card and fills them
//! from a person's profile. It provides:
//!
//! - **Element model**: typed canvas elements, styles and paper settings
//! - **Field resolution**: profile keys and Thai postal addresses to text
//! - **QR styling**: style tokens to concrete render configurations
//! - **Rendering**: per-element views, plus raster export to PNG
//!
//! ## Quick Start
//!
//! ```
//! use cardsmith::{
//!     render::{RenderMode, Visual, render_element},
//!     resolve::{Profile, ProfileData},
//!     template::{CanvasElement, ElementKind},
//! };
//!
//! let profile = ProfileData {
//!     profile: Profile {
//!         first_name: Some("Somchai".into()),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//!
//! let element = CanvasElement::editor_default(ElementKind::Text).bound_to("firstName");
//! let view = render_element(&element, &profile, RenderMode::Preview);
//! assert!(matches!(view.visual, Visual::Text { ref text, .. } if text == "Somchai"));
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | Elements, styles, paper settings, template JSON |
//! | [`resolve`] | Field keys and the profile resolver |
//! | [`qr`] | QR style tokens and render configurations |
//! | [`render`] | Element views and raster export |
//! | [`fetch`] | Remote image downloads |
//! | [`server`] | Preview HTTP service |
//! | [`error`] | Error types |

pub mod error;
pub mod fetch;
pub mod qr;
pub mod render;
pub mod resolve;
pub mod server;
pub mod template;

// Re-exports for convenience
pub use error::CardsmithError;
pub use template::{CanvasElement, ElementKind, Template};
