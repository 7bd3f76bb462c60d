//! # Template Tests
//!
//! End-to-end checks through the public API: a template loaded from JSON,
//! filled from a profile, edited the way an editor would, then rendered to
//! views and to pixels.

use std::collections::HashMap;

use cardsmith::qr::{DotType, style_of};
use cardsmith::render::images::{NoImages, image_references};
use cardsmith::render::raster::{RasterOptions, rasterize};
use cardsmith::render::{RenderMode, Visual, render_template};
use cardsmith::resolve::{ProfileData, ResolveOptions, resolve};
use cardsmith::template::{
    CanvasElement, Dimension, ElementKind, NumericInput, Orientation, PaperSize, StyleProperty, Template,
};
use image::{DynamicImage, Rgba, RgbaImage};
use pretty_assertions::assert_eq;
use serde_json::json;

const WHITE: [u8; 4] = [255, 255, 255, 255];

fn profile() -> ProfileData {
    serde_json::from_value(json!({
        "profile": {
            "firstName": "Somchai",
            "lastName": "Jaidee",
            "position": "Engineer",
            "line": "@somchai",
            "website": "https://somchai.dev"
        },
        "addresses": [
            {
                "type": "personal_1",
                "address": "99/1",
                "tambon": "ดินแดง",
                "district": "ดินแดง",
                "province": "กรุงเทพมหานคร",
                "postal_code": "10400"
            },
            {
                "type": "work_1",
                "address": "5 ถนนราชดำเนิน",
                "tambon": "ศรีภูมิ",
                "district": "เมืองเชียงใหม่",
                "province": "เชียงใหม่",
                "postal_code": 50200
            }
        ]
    }))
    .unwrap()
}

fn card() -> Template {
    Template::from_json(
        r#"{
            "name": "Standard",
            "paper": {"size": "Business Card", "orientation": "landscape"},
            "elements": [
                {"text": "Your name", "field": "fullName", "x": 20, "y": 20, "width": 200, "height": 30},
                {"textarea": "", "field": "personalAddress1", "x": 20, "y": 60, "width": 250, "height": 80},
                {"social": "line", "x": 20, "y": 150, "width": 180, "height": 30},
                {"qrcode": "https://fallback.example", "field": "website", "x": 240, "y": 110, "width": 90, "height": 90}
            ]
        }"#,
    )
    .unwrap()
}

fn text_of(visual: &Visual) -> &str {
    match visual {
        Visual::Text { text, .. } => text,
        other => panic!("expected text, got {:?}", other),
    }
}

#[test]
fn test_shorthand_template_renders_bound_values() {
    let template = card();
    let views = render_template(&template, &profile(), RenderMode::Preview);
    assert_eq!(views.len(), 4);

    assert_eq!(text_of(&views[0].visual), "Somchai Jaidee");

    let address = text_of(&views[1].visual);
    assert!(address.contains("เขตดินแดง"), "{}", address);
    assert!(address.contains("แขวงดินแดง"), "{}", address);
    assert!(!address.contains("อำเภอ") && !address.contains("ตำบล"), "{}", address);

    match &views[2].visual {
        Visual::Badge { glyph, text } => {
            assert_eq!(glyph.name, "line");
            assert_eq!(text, "@somchai");
        }
        other => panic!("expected badge, got {:?}", other),
    }

    match &views[3].visual {
        Visual::Qr(qr) => assert_eq!(qr.data, "https://somchai.dev"),
        other => panic!("expected qr, got {:?}", other),
    }
}

#[test]
fn test_address_prefix_toggle_on_textarea() {
    let mut template = card();
    let textarea = &mut template.elements[1];
    textarea.set_field("workAddress1");
    let with_prefix = textarea.resolved_content(&profile());
    assert!(with_prefix.contains("อำเภอเมืองเชียงใหม่"), "{}", with_prefix);
    assert!(with_prefix.contains("ตำบลศรีภูมิ"), "{}", with_prefix);

    assert!(textarea.set_use_address_prefix(false));
    let bare = textarea.resolved_content(&profile());
    assert!(!bare.contains("อำเภอ") && !bare.contains("ตำบล"), "{}", bare);
    assert!(bare.contains("ศรีภูมิ เมืองเชียงใหม่"), "{}", bare);
    assert_eq!(bare, resolve("workAddress1", &profile(), ResolveOptions::with_prefix(false)));
}

#[test]
fn test_missing_address_record_is_empty() {
    assert_eq!(resolve("workAddress2", &profile(), ResolveOptions::default()), "");
    let element = CanvasElement::editor_default(ElementKind::Textarea).bound_to("workAddress2");
    let mut template = Template::default();
    template.add(element);
    let views = render_template(&template, &profile(), RenderMode::Edit);
    assert!(matches!(views[0].visual, Visual::Placeholder { .. }));
}

#[test]
fn test_binding_precedence_and_unbinding() {
    let mut template = card();
    let name = &mut template.elements[0];
    name.set_content("Ignored while bound");
    assert_eq!(name.resolved_content(&profile()), "Somchai Jaidee");

    name.set_field("");
    assert_eq!(name.bound_field(), None);
    assert_eq!(name.resolved_content(&profile()), "Ignored while bound");
}

#[test]
fn test_setters_respect_element_type() {
    let mut template = card();
    let id = template.elements[0].id().to_string();
    let text = template.get_mut(&id).unwrap();
    let before = text.clone();

    assert!(!text.set_qr_style("dots"));
    assert!(!text.set_image_url("photo.png"));
    assert_eq!(*text, before);
    assert_eq!(text.kind(), ElementKind::Text);
}

#[test]
fn test_geometry_coercion_and_style_merge() {
    let mut element = CanvasElement::editor_default(ElementKind::Picture);
    element.set_size(Dimension::Width, "abc");
    assert_eq!(element.width, 0);
    element.set_size(Dimension::Height, NumericInput::from(-20.0));
    assert_eq!(element.height, 0);
    assert!(element.set_property("x", &json!("12.6")));
    assert_eq!(element.x, 13);

    element.set_style(StyleProperty::Color("#123456".into()));
    element.set_style(StyleProperty::FontSize(22.0));
    assert_eq!(element.style.color.as_deref(), Some("#123456"));
    assert_eq!(element.style.font_size, Some(22.0));
}

#[test]
fn test_qr_style_fallback_and_restyle() {
    assert_eq!(
        style_of("not-a-real-style", Some("#112233")),
        style_of("standard", Some("#112233"))
    );

    let mut template = card();
    let qr = &mut template.elements[3];
    assert!(qr.set_qr_style("classy-rounded"));
    let views = render_template(&template, &profile(), RenderMode::Print);
    let Visual::Qr(visual) = &views[3].visual else {
        panic!("expected qr");
    };
    assert_eq!(visual.config.dots_options.dot_type, DotType::ClassyRounded);
    assert_eq!((visual.config.width, visual.config.height), (90, 90));
}

#[test]
fn test_paper_size_and_orientation() {
    let mut template = card();
    assert_eq!(template.paper.canvas_size(), (340, 208));
    template.paper.set_orientation(Orientation::Portrait);
    assert_eq!(template.paper.canvas_size(), (208, 340));
    template.paper.set_size(PaperSize::A5);
    assert_eq!((template.paper.width, template.paper.height), (148.0, 210.0));
}

#[test]
fn test_json_round_trip_keeps_ids() {
    let template = card();
    let json = serde_json::to_string(&template).unwrap();
    let reloaded = Template::from_json(&json).unwrap();
    assert_eq!(reloaded, template);
}

#[test]
fn test_malformed_template_is_error() {
    let err = Template::from_json(r#"{"elements": [{"x": 1}]}"#).unwrap_err();
    assert!(err.to_string().contains("elements[0]"), "{}", err);
}

#[test]
fn test_raster_picture_from_image_map() {
    let template = Template::from_json(
        r#"{"elements": [{"picture": "red.png", "fit": "fill", "x": 0, "y": 0, "width": 50, "height": 50}]}"#,
    )
    .unwrap();

    let mut images = HashMap::new();
    images.insert(
        "red.png".to_string(),
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([255, 0, 0, 255]))),
    );
    assert_eq!(image_references(&template, &profile()), vec!["red.png".to_string()]);

    let options = RasterOptions {
        dpi: 96.0,
        mode: RenderMode::Print,
        font: None,
    };
    let img = rasterize(&template, &profile(), &images, &options);
    assert_eq!(img.get_pixel(25, 25).0, [255, 0, 0, 255]);
    assert_eq!(img.get_pixel(100, 100).0, WHITE);
}

#[test]
fn test_raster_missing_picture_placeholder_only_in_edit() {
    let mut template = Template::default();
    template.add(
        CanvasElement::editor_default(ElementKind::Picture)
            .at(10, 10)
            .sized(60, 60),
    );
    let options = |mode| RasterOptions {
        dpi: 96.0,
        mode,
        font: None,
    };

    let edit = rasterize(&template, &profile(), &NoImages, &options(RenderMode::Edit));
    assert_ne!(edit.get_pixel(12, 12).0, WHITE);
    let print = rasterize(&template, &profile(), &NoImages, &options(RenderMode::Print));
    assert_eq!(print.get_pixel(12, 12).0, WHITE);
}
