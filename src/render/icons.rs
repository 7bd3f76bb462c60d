//! Icon lookup for `social` and `icon` elements.
//!
//! A glyph is a short mark drawn on a colored badge. Keys are matched
//! case-insensitively and several keys may share a glyph (`mobile` and
//! `phone`, for example). Unknown keys get [`PLACEHOLDER`].

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Glyph {
    pub name: &'static str,
    /// Text drawn on the badge.
    pub mark: &'static str,
    /// Badge color.
    pub color: &'static str,
}

/// Neutral glyph for keys with no icon.
pub const PLACEHOLDER: Glyph = Glyph {
    name: "placeholder",
    mark: "?",
    color: "#9E9E9E",
};

const GLYPHS: &[(&[&str], Glyph)] = &[
    (&["facebook", "fb"], Glyph { name: "facebook", mark: "f", color: "#1877F2" }),
    (&["line"], Glyph { name: "line", mark: "L", color: "#06C755" }),
    (&["instagram", "ig"], Glyph { name: "instagram", mark: "IG", color: "#E4405F" }),
    (&["twitter", "x"], Glyph { name: "twitter", mark: "X", color: "#000000" }),
    (&["linkedin"], Glyph { name: "linkedin", mark: "in", color: "#0A66C2" }),
    (&["tiktok"], Glyph { name: "tiktok", mark: "Tk", color: "#010101" }),
    (&["youtube"], Glyph { name: "youtube", mark: "YT", color: "#FF0000" }),
    (&["whatsapp"], Glyph { name: "whatsapp", mark: "WA", color: "#25D366" }),
    (&["wechat"], Glyph { name: "wechat", mark: "WC", color: "#07C160" }),
    (&["telegram"], Glyph { name: "telegram", mark: "TG", color: "#26A5E4" }),
    (&["website", "web", "globe", "url"], Glyph { name: "globe", mark: "www", color: "#455A64" }),
    (&["phone", "mobile", "workphone", "tel"], Glyph { name: "phone", mark: "Tel", color: "#43A047" }),
    (&["email", "workemail", "mail"], Glyph { name: "mail", mark: "@", color: "#EA4335" }),
    (&["fax"], Glyph { name: "fax", mark: "Fax", color: "#607D8B" }),
    (
        &["location", "address", "map", "pin", "personaladdress1", "personaladdress2", "workaddress1", "workaddress2"],
        Glyph { name: "location", mark: "Map", color: "#795548" },
    ),
    (&["user", "person", "fullname", "nickname"], Glyph { name: "user", mark: "ID", color: "#3F51B5" }),
    (&["company", "building", "companyname", "companynameen"], Glyph { name: "company", mark: "Co", color: "#5D4037" }),
];

/// Glyph for `key`, or [`PLACEHOLDER`].
pub fn lookup(key: &str) -> Glyph {
    find(key).unwrap_or(PLACEHOLDER)
}

pub fn is_known(key: &str) -> bool {
    find(key).is_some()
}

fn find(key: &str) -> Option<Glyph> {
    let key = key.trim().to_ascii_lowercase();
    GLYPHS
        .iter()
        .find(|(keys, _)| keys.contains(&key.as_str()))
        .map(|(_, glyph)| *glyph)
}
