//! # Field Resolver
//!
//! Turns an element's semantic `field` binding into the text (or image
//! reference) to render, given a profile snapshot.
//!
//! Field keys come in two families, modelled as [`FieldKey`]:
//!
//! | Family | Examples | Resolution |
//! |--------|----------|------------|
//! | [`FieldKey::Scalar`] | `firstName`, `workPhone`, `facebook` | direct profile lookup |
//! | [`FieldKey::Address`] | `personalAddress1`, `workAddress2` | address composition |
//!
//! Resolution is pure and total: unknown keys, missing profile values and
//! missing address records all resolve to an empty string.
//!
//! ```
//! use cardsmith::resolve::{resolve, ProfileData, ResolveOptions};
//!
//! let profile: ProfileData = serde_json::from_str(r#"{"profile": {"facebook": "somchai.j"}}"#).unwrap();
//! assert_eq!(resolve("facebook", &profile, ResolveOptions::default()), "somchai.j");
//! assert_eq!(resolve("workAddress2", &profile, ResolveOptions::default()), "");
//! ```

pub mod address;
pub mod profile;

pub use address::{CAPITAL_PROVINCE, compose_address};
pub use profile::{AddressRecord, Profile, ProfileData};

use serde::Serialize;

use profile::non_blank;

/// Options that tune resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Emit administrative-division prefixes in composed addresses.
    pub use_address_prefix: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            use_address_prefix: true,
        }
    }
}

impl ResolveOptions {
    pub fn with_prefix(use_address_prefix: bool) -> Self {
        Self { use_address_prefix }
    }
}

/// Define [`ProfileField`] and its lookup table from a single list.
macro_rules! profile_fields {
    ($($variant:ident => $key:literal, $label:literal, |$p:ident| $read:expr;)+) => {
        /// A directly-mapped profile scalar.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ProfileField {
            $($variant,)+
        }

        impl ProfileField {
            /// Every scalar field, in editor order.
            pub const ALL: &'static [ProfileField] = &[$(ProfileField::$variant,)+];

            /// Binding key as stored on elements.
            pub fn key(self) -> &'static str {
                match self { $(ProfileField::$variant => $key,)+ }
            }

            /// Human-readable label for field pickers.
            pub fn label(self) -> &'static str {
                match self { $(ProfileField::$variant => $label,)+ }
            }

            /// Parse a binding key.
            pub fn parse(key: &str) -> Option<Self> {
                match key { $($key => Some(ProfileField::$variant),)+ _ => None }
            }

            /// Read this field from a profile. Missing values read as `""`.
            pub fn read(self, profile: &Profile) -> String {
                match self {
                    $(ProfileField::$variant => {
                        let $p = profile;
                        $read
                    })+
                }
            }
        }
    };
}

fn scalar(value: &Option<String>) -> String {
    non_blank(value.as_deref()).unwrap_or_default().to_string()
}

profile_fields! {
    FirstName => "firstName", "First name", |p| scalar(&p.first_name);
    LastName => "lastName", "Last name", |p| scalar(&p.last_name);
    FullName => "fullName", "Full name", |p| {
        [scalar(&p.first_name), scalar(&p.last_name)]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    };
    Nickname => "nickname", "Nickname", |p| scalar(&p.nickname);
    Position => "position", "Position", |p| scalar(&p.position);
    Department => "department", "Department", |p| scalar(&p.department);
    CompanyName => "companyName", "Company name", |p| scalar(&p.company_name);
    CompanyNameEn => "companyNameEn", "Company name (English)", |p| scalar(&p.company_name_en);
    Phone => "phone", "Phone", |p| scalar(&p.phone);
    Mobile => "mobile", "Mobile", |p| scalar(&p.mobile);
    WorkPhone => "workPhone", "Work phone", |p| scalar(&p.work_phone);
    Fax => "fax", "Fax", |p| scalar(&p.fax);
    Email => "email", "Email", |p| scalar(&p.email);
    WorkEmail => "workEmail", "Work email", |p| scalar(&p.work_email);
    Website => "website", "Website", |p| scalar(&p.website);
    TaxId => "taxId", "Tax ID", |p| scalar(&p.tax_id);
    CompanyTaxId => "companyTaxId", "Company tax ID", |p| scalar(&p.company_tax_id);
    Facebook => "facebook", "Facebook", |p| scalar(&p.facebook);
    Line => "line", "LINE", |p| scalar(&p.line);
    Instagram => "instagram", "Instagram", |p| scalar(&p.instagram);
    Twitter => "twitter", "X (Twitter)", |p| scalar(&p.twitter);
    Linkedin => "linkedin", "LinkedIn", |p| scalar(&p.linkedin);
    Tiktok => "tiktok", "TikTok", |p| scalar(&p.tiktok);
    Youtube => "youtube", "YouTube", |p| scalar(&p.youtube);
    Whatsapp => "whatsapp", "WhatsApp", |p| scalar(&p.whatsapp);
    Wechat => "wechat", "WeChat", |p| scalar(&p.wechat);
    Telegram => "telegram", "Telegram", |p| scalar(&p.telegram);
    ProfileImage => "profileImage", "Profile photo", |p| scalar(&p.profile_image);
    CompanyLogo => "companyLogo", "Company logo", |p| scalar(&p.company_logo);
}

impl ProfileField {
    /// Whether this field holds an image reference rather than text.
    pub fn is_image(self) -> bool {
        matches!(self, ProfileField::ProfileImage | ProfileField::CompanyLogo)
    }

    /// Whether this field is a social-network handle.
    pub fn is_social(self) -> bool {
        matches!(
            self,
            ProfileField::Facebook
                | ProfileField::Line
                | ProfileField::Instagram
                | ProfileField::Twitter
                | ProfileField::Linkedin
                | ProfileField::Tiktok
                | ProfileField::Youtube
                | ProfileField::Whatsapp
                | ProfileField::Wechat
                | ProfileField::Telegram
        )
    }
}

/// One of the four address-book slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressSlot {
    Personal1,
    Personal2,
    Work1,
    Work2,
}

impl AddressSlot {
    pub const ALL: &'static [AddressSlot] = &[
        AddressSlot::Personal1,
        AddressSlot::Personal2,
        AddressSlot::Work1,
        AddressSlot::Work2,
    ];

    /// Binding key as stored on elements.
    pub fn key(self) -> &'static str {
        match self {
            AddressSlot::Personal1 => "personalAddress1",
            AddressSlot::Personal2 => "personalAddress2",
            AddressSlot::Work1 => "workAddress1",
            AddressSlot::Work2 => "workAddress2",
        }
    }

    /// The `type` tag of the matching [`AddressRecord`].
    pub fn tag(self) -> &'static str {
        match self {
            AddressSlot::Personal1 => "personal_1",
            AddressSlot::Personal2 => "personal_2",
            AddressSlot::Work1 => "work_1",
            AddressSlot::Work2 => "work_2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AddressSlot::Personal1 => "Personal address 1",
            AddressSlot::Personal2 => "Personal address 2",
            AddressSlot::Work1 => "Work address 1",
            AddressSlot::Work2 => "Work address 2",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|slot| slot.key() == key)
    }

    /// Compose this slot's address, or `""` when the profile has no record
    /// for it.
    pub fn resolve(self, profile: &ProfileData, options: ResolveOptions) -> String {
        profile
            .address(self.tag())
            .map(|record| compose_address(record, options.use_address_prefix))
            .unwrap_or_default()
    }
}

/// A parsed field binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    /// Direct profile scalar.
    Scalar(ProfileField),
    /// Composed address line.
    Address(AddressSlot),
}

impl FieldKey {
    /// Parse a binding key. Surrounding whitespace is ignored.
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim();
        ProfileField::parse(key)
            .map(FieldKey::Scalar)
            .or_else(|| AddressSlot::parse(key).map(FieldKey::Address))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldKey::Scalar(f) => f.key(),
            FieldKey::Address(a) => a.key(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FieldKey::Scalar(f) => f.label(),
            FieldKey::Address(a) => a.label(),
        }
    }

    pub fn is_address(self) -> bool {
        matches!(self, FieldKey::Address(_))
    }

    pub fn is_image(self) -> bool {
        matches!(self, FieldKey::Scalar(f) if f.is_image())
    }

    /// Every bindable field: scalars first, then address slots.
    pub fn all() -> Vec<FieldKey> {
        ProfileField::ALL
            .iter()
            .copied()
            .map(FieldKey::Scalar)
            .chain(AddressSlot::ALL.iter().copied().map(FieldKey::Address))
            .collect()
    }

    /// Resolve this key against a profile.
    pub fn resolve(self, profile: &ProfileData, options: ResolveOptions) -> String {
        match self {
            FieldKey::Scalar(field) => field.read(&profile.profile),
            FieldKey::Address(slot) => slot.resolve(profile, options),
        }
    }
}

/// Resolve a field binding to display text.
///
/// Unknown keys and missing data resolve to `""`.
pub fn resolve(field: &str, profile: &ProfileData, options: ResolveOptions) -> String {
    FieldKey::parse(field)
        .map(|key| key.resolve(profile, options))
        .unwrap_or_default()
}

/// Field metadata for editors and the HTTP catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    pub key: &'static str,
    pub label: &'static str,
    pub is_address: bool,
    pub is_image: bool,
}

/// Metadata for every bindable field.
pub fn field_catalog() -> Vec<FieldMeta> {
    FieldKey::all()
        .into_iter()
        .map(|key| FieldMeta {
            key: key.as_str(),
            label: key.label(),
            is_address: key.is_address(),
            is_image: key.is_image(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_profile() -> ProfileData {
        serde_json::from_str(
            r#"{
                "profile": {
                    "firstName": "Somchai",
                    "lastName": "Jaidee",
                    "workPhone": "02-123-4567",
                    "facebook": "somchai.j",
                    "companyLogo": "https://cdn.example.com/logo.png"
                },
                "addresses": [
                    {
                        "type": "personal_1",
                        "address": "123 ถนนวิภาวดี",
                        "tambon": "ดินแดง",
                        "district": "ดินแดง",
                        "province": "กรุงเทพมหานคร",
                        "postal_code": "10400"
                    },
                    {
                        "type": "work_1",
                        "street": "5 ถนนราชดำเนิน",
                        "subdistrict": "ศรีภูมิ",
                        "district": "เมืองเชียงใหม่",
                        "province": "เชียงใหม่",
                        "postalCode": "50200"
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_scalar_lookup() {
        let p = sample_profile();
        let opts = ResolveOptions::default();
        assert_eq!(resolve("firstName", &p, opts), "Somchai");
        assert_eq!(resolve("workPhone", &p, opts), "02-123-4567");
        assert_eq!(resolve("facebook", &p, opts), "somchai.j");
        assert_eq!(resolve("companyLogo", &p, opts), "https://cdn.example.com/logo.png");
    }

    #[test]
    fn test_full_name_skips_missing_parts() {
        let mut p = sample_profile();
        assert_eq!(resolve("fullName", &p, ResolveOptions::default()), "Somchai Jaidee");
        p.profile.first_name = None;
        assert_eq!(resolve("fullName", &p, ResolveOptions::default()), "Jaidee");
    }

    #[test]
    fn test_missing_scalar_is_empty() {
        let p = sample_profile();
        assert_eq!(resolve("instagram", &p, ResolveOptions::default()), "");
        assert_eq!(resolve("email", &ProfileData::default(), ResolveOptions::default()), "");
    }

    #[test]
    fn test_unknown_field_is_empty() {
        let p = sample_profile();
        assert_eq!(resolve("favouriteColor", &p, ResolveOptions::default()), "");
        assert_eq!(resolve("", &p, ResolveOptions::default()), "");
    }

    #[test]
    fn test_capital_address() {
        let line = resolve("personalAddress1", &sample_profile(), ResolveOptions::with_prefix(true));
        assert!(line.contains("เขตดินแดง"));
        assert!(line.contains("แขวงดินแดง"));
        assert!(!line.contains("อำเภอ"));
        assert!(!line.contains("ตำบล"));
    }

    #[test]
    fn test_provincial_address() {
        let line = resolve("workAddress1", &sample_profile(), ResolveOptions::with_prefix(true));
        assert!(line.contains("อำเภอเมืองเชียงใหม่"));
        assert!(line.contains("ตำบลศรีภูมิ"));
        assert!(line.ends_with("50200"));
    }

    #[test]
    fn test_prefix_suppression() {
        let line = resolve("workAddress1", &sample_profile(), ResolveOptions::with_prefix(false));
        assert_eq!(line, "5 ถนนราชดำเนิน ศรีภูมิ เมืองเชียงใหม่ เชียงใหม่ 50200");
    }

    #[test]
    fn test_missing_address_record() {
        let p = sample_profile();
        assert_eq!(resolve("workAddress2", &p, ResolveOptions::default()), "");
        assert_eq!(resolve("personalAddress2", &p, ResolveOptions::default()), "");
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let p = sample_profile();
        let opts = ResolveOptions::default();
        for key in FieldKey::all() {
            let first = resolve(key.as_str(), &p, opts);
            let second = resolve(key.as_str(), &p, opts);
            assert_eq!(first, second, "field {}", key.as_str());
        }
    }

    #[test]
    fn test_field_keys_roundtrip_and_unique() {
        let keys = FieldKey::all();
        let mut seen = std::collections::HashSet::new();
        for key in &keys {
            assert!(seen.insert(key.as_str()), "duplicate key {}", key.as_str());
            assert_eq!(FieldKey::parse(key.as_str()), Some(*key));
        }
        assert_eq!(keys.len(), ProfileField::ALL.len() + AddressSlot::ALL.len());
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(
            FieldKey::parse("  workAddress1 "),
            Some(FieldKey::Address(AddressSlot::Work1))
        );
    }

    #[test]
    fn test_catalog_flags() {
        let catalog = field_catalog();
        let logo = catalog.iter().find(|f| f.key == "companyLogo").unwrap();
        assert!(logo.is_image);
        let addr = catalog.iter().find(|f| f.key == "workAddress2").unwrap();
        assert!(addr.is_address);
        assert!(!addr.is_image);
    }
}
