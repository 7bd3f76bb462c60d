//! Profile data snapshot consumed by the field resolver.
//!
//! The host owns this data and hands a fresh snapshot to every resolution
//! pass. Keys are accepted in both camelCase and snake_case, and values that
//! hosts commonly store as numbers (phones, postal codes, tax IDs) are
//! accepted as numbers too.

use serde::{Deserialize, Deserializer, Serialize};

/// Accept a string, an integer, a float, or null.
fn deserialize_loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Text(String),
        Int(i64),
        Float(f64),
    }

    let opt: Option<Loose> = Option::deserialize(deserializer)?;
    Ok(opt.map(|v| match v {
        Loose::Text(s) => s,
        Loose::Int(n) => n.to_string(),
        Loose::Float(f) => f.to_string(),
    }))
}

/// A profile bag: flat scalar profile plus the address book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileData {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub addresses: Vec<AddressRecord>,
}

impl ProfileData {
    /// First address record tagged with `tag` (e.g. `"work_1"`).
    pub fn address(&self, tag: &str) -> Option<&AddressRecord> {
        self.addresses.iter().find(|a| a.kind.trim() == tag)
    }
}

/// Flat profile scalars.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    #[serde(alias = "first_name")]
    pub first_name: Option<String>,
    #[serde(alias = "last_name")]
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    #[serde(alias = "company_name")]
    pub company_name: Option<String>,
    #[serde(alias = "company_name_en")]
    pub company_name_en: Option<String>,

    #[serde(deserialize_with = "deserialize_loose_string")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "deserialize_loose_string")]
    pub mobile: Option<String>,
    #[serde(alias = "work_phone", deserialize_with = "deserialize_loose_string")]
    pub work_phone: Option<String>,
    #[serde(deserialize_with = "deserialize_loose_string")]
    pub fax: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "work_email")]
    pub work_email: Option<String>,
    pub website: Option<String>,
    #[serde(alias = "tax_id", deserialize_with = "deserialize_loose_string")]
    pub tax_id: Option<String>,
    #[serde(alias = "company_tax_id", deserialize_with = "deserialize_loose_string")]
    pub company_tax_id: Option<String>,

    pub facebook: Option<String>,
    pub line: Option<String>,
    pub instagram: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub tiktok: Option<String>,
    pub youtube: Option<String>,
    #[serde(deserialize_with = "deserialize_loose_string")]
    pub whatsapp: Option<String>,
    pub wechat: Option<String>,
    pub telegram: Option<String>,

    /// Image reference for the person's photo.
    #[serde(alias = "profile_image")]
    pub profile_image: Option<String>,
    /// Image reference for the company logo.
    #[serde(alias = "company_logo")]
    pub company_logo: Option<String>,
}

/// One entry of the address book.
///
/// `type` is one of `personal_1`, `personal_2`, `work_1`, `work_2`. Unknown
/// tags are kept so a malformed record never rejects the whole profile; they
/// simply never match an address field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddressRecord {
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Street / address line.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// Sub-district (tambon / khwaeng).
    #[serde(default)]
    pub tambon: Option<String>,
    #[serde(
        default,
        alias = "subDistrict",
        alias = "sub_district",
        skip_serializing_if = "Option::is_none"
    )]
    pub subdistrict: Option<String>,
    #[serde(default)]
    pub district: Option<String>,
    #[serde(default)]
    pub province: Option<String>,
    #[serde(
        default,
        rename = "postal_code",
        deserialize_with = "deserialize_loose_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub postal_code: Option<String>,
    #[serde(
        default,
        rename = "postalCode",
        deserialize_with = "deserialize_loose_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub postal_code_alt: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl AddressRecord {
    /// Create an empty record with the given type tag.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Street line, preferring `address` over `street`. Returned as written.
    pub fn street_line(&self) -> Option<&str> {
        present(self.address.as_deref()).or_else(|| present(self.street.as_deref()))
    }

    /// Sub-district name, preferring `tambon` over `subdistrict`.
    pub fn subdistrict_name(&self) -> Option<&str> {
        non_blank(self.tambon.as_deref()).or_else(|| non_blank(self.subdistrict.as_deref()))
    }

    /// Postal code, preferring `postal_code` over `postalCode`. Returned as
    /// written.
    ///
    /// A blank `postal_code` counts as absent.
    pub fn postal_code(&self) -> Option<&str> {
        present(self.postal_code.as_deref()).or_else(|| present(self.postal_code_alt.as_deref()))
    }
}

/// Untrimmed value, or `None` when missing or blank.
fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Trimmed value, or `None` when missing or blank.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
