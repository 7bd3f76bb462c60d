//! Thai postal address composition.
//!
//! An address record is flattened into one display line:
//!
//! ```text
//! street  [แขวง|ตำบล]sub-district  [เขต|อำเภอ]district  [จังหวัด]province  postal-code
//! ```
//!
//! The administrative prefixes are only emitted when prefixing is enabled.
//! Bangkok uses khwaeng/khet (`แขวง`/`เขต`), every other province uses
//! tambon/amphoe (`ตำบล`/`อำเภอ`). The choice is made on the record's own
//! province.

use super::profile::{AddressRecord, non_blank};

/// Province name that switches sub-district/district prefixes to the
/// capital-city forms.
pub const CAPITAL_PROVINCE: &str = "กรุงเทพมหานคร";

const SUBDISTRICT_CAPITAL: &str = "แขวง";
const SUBDISTRICT_PROVINCIAL: &str = "ตำบล";
const DISTRICT_CAPITAL: &str = "เขต";
const DISTRICT_PROVINCIAL: &str = "อำเภอ";
const PROVINCE: &str = "จังหวัด";

/// Compose an address record into a single space-joined line.
///
/// Absent or blank parts are skipped. Street and postal code are emitted as
/// written; names are trimmed before prefixing. The country is not part of
/// the line.
pub fn compose_address(record: &AddressRecord, use_prefix: bool) -> String {
    let province = non_blank(record.province.as_deref());
    let is_capital = province == Some(CAPITAL_PROVINCE);

    let (subdistrict_prefix, district_prefix, province_prefix) = match (use_prefix, is_capital) {
        (false, _) => ("", "", ""),
        (true, true) => (SUBDISTRICT_CAPITAL, DISTRICT_CAPITAL, PROVINCE),
        (true, false) => (SUBDISTRICT_PROVINCIAL, DISTRICT_PROVINCIAL, PROVINCE),
    };

    let parts = [
        record.street_line().map(str::to_string),
        record.subdistrict_name().map(|s| format!("{subdistrict_prefix}{s}")),
        non_blank(record.district.as_deref()).map(|s| format!("{district_prefix}{s}")),
        province.map(|s| format!("{province_prefix}{s}")),
        record.postal_code().map(str::to_string),
    ];

    parts.into_iter().flatten().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(street: &str, tambon: &str, district: &str, province: &str, postal: &str) -> AddressRecord {
        AddressRecord {
            kind: "personal_1".into(),
            address: Some(street.into()),
            tambon: Some(tambon.into()),
            district: Some(district.into()),
            province: Some(province.into()),
            postal_code: Some(postal.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_capital_prefixes() {
        let r = record("123 ถนนวิภาวดี", "ดินแดง", "ดินแดง", "กรุงเทพมหานคร", "10400");
        let line = compose_address(&r, true);
        assert_eq!(
            line,
            "123 ถนนวิภาวดี แขวงดินแดง เขตดินแดง จังหวัดกรุงเทพมหานคร 10400"
        );
        assert!(!line.contains("อำเภอ"));
        assert!(!line.contains("ตำบล"));
    }

    #[test]
    fn test_provincial_prefixes() {
        let r = record("5 ถนนราชดำเนิน", "ศรีภูมิ", "เมืองเชียงใหม่", "เชียงใหม่", "50200");
        let line = compose_address(&r, true);
        assert!(line.contains("ตำบลศรีภูมิ"));
        assert!(line.contains("อำเภอเมืองเชียงใหม่"));
        assert!(line.contains("จังหวัดเชียงใหม่"));
        assert!(!line.contains("แขวง"));
        assert!(!line.contains("เขต"));
    }

    #[test]
    fn test_prefix_suppressed() {
        let r = record("5 ถนนราชดำเนิน", "ศรีภูมิ", "เมืองเชียงใหม่", "เชียงใหม่", "50200");
        assert_eq!(
            compose_address(&r, false),
            "5 ถนนราชดำเนิน ศรีภูมิ เมืองเชียงใหม่ เชียงใหม่ 50200"
        );
    }

    #[test]
    fn test_missing_parts_skipped() {
        let r = AddressRecord {
            kind: "work_1".into(),
            district: Some("บางรัก".into()),
            province: Some("กรุงเทพมหานคร".into()),
            tambon: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(compose_address(&r, true), "เขตบางรัก จังหวัดกรุงเทพมหานคร");
    }

    #[test]
    fn test_no_province_uses_provincial_forms() {
        let r = AddressRecord {
            tambon: Some("หนองป่าครั่ง".into()),
            ..Default::default()
        };
        assert_eq!(compose_address(&r, true), "ตำบลหนองป่าครั่ง");
    }

    #[test]
    fn test_street_and_postal_code_verbatim() {
        let r = record("  99/1  หมู่ 3", "ศรีภูมิ", "เมืองเชียงใหม่", "เชียงใหม่", "50200 ");
        assert_eq!(
            compose_address(&r, false),
            "  99/1  หมู่ 3 ศรีภูมิ เมืองเชียงใหม่ เชียงใหม่ 50200 "
        );
    }

    #[test]
    fn test_empty_record() {
        assert_eq!(compose_address(&AddressRecord::new("work_2"), true), "");
    }
}
