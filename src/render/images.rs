//! Image references and where their pixels come from.
//!
//! Elements only hold references (`imageUrl`, `qrLogo`, a bound
//! `profileImage`). The host decides how a reference becomes pixels by
//! handing the renderer an [`ImageSource`].

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use image::DynamicImage;

use crate::resolve::ProfileData;
use crate::template::{ElementBody, Template};

/// Resolves an image reference to decoded pixels.
pub trait ImageSource {
    fn image(&self, reference: &str) -> Option<&DynamicImage>;
}

/// A source with no images; every picture renders as missing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageSource for NoImages {
    fn image(&self, _reference: &str) -> Option<&DynamicImage> {
        None
    }
}

impl ImageSource for HashMap<String, DynamicImage> {
    fn image(&self, reference: &str) -> Option<&DynamicImage> {
        self.get(reference)
    }
}

/// Whether a reference points at an HTTP(S) resource.
pub fn is_remote(reference: &str) -> bool {
    let r = reference.trim_start();
    r.starts_with("http://") || r.starts_with("https://")
}

/// Every image reference a render of `template` may ask for, deduplicated
/// and sorted.
pub fn image_references(template: &Template, profile: &ProfileData) -> Vec<String> {
    let mut refs = BTreeSet::new();
    if let Some(url) = template.paper.background.image_url() {
        refs.insert(url.trim().to_string());
    }
    for element in &template.elements {
        if let Some(reference) = element.image_reference(profile) {
            refs.insert(reference);
        }
        if let ElementBody::QrCode(qr) = element.body()
            && let Some(logo) = qr.qr_logo.as_deref().map(str::trim).filter(|l| !l.is_empty())
        {
            refs.insert(logo.to_string());
        }
    }
    refs.into_iter().collect()
}

/// Load the non-remote references from disk, relative to `base_dir`.
///
/// Unreadable or undecodable files are logged and skipped.
pub fn load_local_images(references: &[String], base_dir: &Path) -> HashMap<String, DynamicImage> {
    let mut images = HashMap::new();
    for reference in references.iter().filter(|r| !is_remote(r)) {
        let path = base_dir.join(reference.strip_prefix("file://").unwrap_or(reference));
        match image::open(&path) {
            Ok(img) => {
                tracing::debug!(path = %path.display(), "loaded image");
                images.insert(reference.clone(), img);
            }
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping image"),
        }
    }
    images
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::Profile;

    #[test]
    fn test_collects_references() {
        let json = r#"{
            "paper": {"background": {"type": "image", "url": "bg.png"}},
            "elements": [
                {"type": "picture", "field": "companyLogo"},
                {"type": "picture", "imageUrl": "bg.png"},
                {"type": "picture"},
                {"type": "qrcode", "qrUrl": "https://example.com", "qrLogo": "https://cdn.example.com/logo.png"},
                {"type": "text", "content": "logo.png"}
            ]
        }"#;
        let template = Template::from_json(json).unwrap();
        let profile = ProfileData {
            profile: Profile {
                company_logo: Some("company.png".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            image_references(&template, &profile),
            vec![
                "bg.png".to_string(),
                "company.png".to_string(),
                "https://cdn.example.com/logo.png".to_string()
            ]
        );
    }

    #[test]
    fn test_remote_detection() {
        assert!(is_remote("https://example.com/a.png"));
        assert!(!is_remote("assets/a.png"));
    }

    #[test]
    fn test_missing_local_file_skipped() {
        let refs = vec!["does/not/exist.png".to_string(), "https://example.com/x.png".to_string()];
        let images = load_local_images(&refs, Path::new("."));
        assert!(images.is_empty());
    }

    #[test]
    fn test_map_source() {
        let mut map = HashMap::new();
        map.insert("a".to_string(), DynamicImage::new_rgba8(2, 2));
        assert!(map.image("a").is_some());
        assert!(map.image("b").is_none());
        assert!(NoImages.image("a").is_none());
    }
}
