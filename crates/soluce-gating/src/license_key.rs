//! License key syntax and display masking.
//!
//! Format: `TIER-XXXX-XXXX-XXXX-XXXX`, tier one of FREE/PRO/ENTERPRISE,
//! segments `[A-Z0-9]`. Input is case-insensitive and normalized to
//! uppercase before matching.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use soluce_core::{GateError, GateResult, Tier};

const KEY_PATTERN: &str =
    r"^(FREE|PRO|ENTERPRISE)-[A-Z0-9]{4}-[A-Z0-9]{4}-[A-Z0-9]{4}-[A-Z0-9]{4}$";

fn key_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(KEY_PATTERN).ok()).as_ref()
}

/// A syntactically valid, uppercase license key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LicenseKey {
    normalized: String,
    tier: Tier,
}

impl LicenseKey {
    pub fn parse(raw: &str) -> GateResult<Self> {
        let normalized = raw.trim().to_uppercase();
        let caps = key_regex()
            .and_then(|re| re.captures(&normalized))
            .ok_or(GateError::InvalidLicenseFormat)?;
        let tier = caps
            .get(1)
            .and_then(|m| Tier::parse(m.as_str()))
            .ok_or(GateError::InvalidLicenseFormat)?;
        Ok(Self { normalized, tier })
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// Tier named by the key prefix.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn masked(&self) -> String {
        mask_license_key(&self.normalized)
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}

/// Show only the first and last four characters. Dashes in the hidden
/// middle stay visible so the shape of the key is preserved.
pub fn mask_license_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let n = chars.len();
    if n <= 8 {
        return "*".repeat(n);
    }
    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if i < 4 || i >= n - 4 || c == '-' {
                c
            } else {
                '*'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use soluce_core::SoluceErrorCode;

    #[test]
    fn test_parse_normalizes_case() {
        let key = LicenseKey::parse("  pro-aaaa-bbbb-cccc-dddd ").unwrap();
        assert_eq!(key.as_str(), "PRO-AAAA-BBBB-CCCC-DDDD");
        assert_eq!(key.tier(), Tier::Pro);
    }

    #[test]
    fn test_parse_rejects_bad_shapes() {
        for raw in [
            "",
            "PRO-AAAA-BBBB-CCCC",
            "GOLD-AAAA-BBBB-CCCC-DDDD",
            "PRO-AAA!-BBBB-CCCC-DDDD",
            "PRO-AAAA-BBBB-CCCC-DDDDD",
            "PROAAAABBBBCCCCDDDD",
        ] {
            let err = LicenseKey::parse(raw).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_LICENSE_FORMAT", "{raw}");
        }
    }

    #[test]
    fn test_enterprise_prefix() {
        let key = LicenseKey::parse("ENTERPRISE-1A2B-3C4D-5E6F-7G8H").unwrap();
        assert_eq!(key.tier(), Tier::Enterprise);
    }

    #[test]
    fn test_mask() {
        assert_eq!(
            mask_license_key("PRO-AAAA-BBBB-CCCC-DDDD"),
            "PRO-****-****-****-DDDD"
        );
        assert_eq!(mask_license_key("ABCDEFGH"), "********");
        assert_eq!(mask_license_key("ABCDEFGHI"), "ABCD*FGHI");
        assert_eq!(mask_license_key(""), "");
    }

    #[test]
    fn test_display_is_masked() {
        let key = LicenseKey::parse("PRO-AAAA-BBBB-CCCC-DDDD").unwrap();
        assert!(!key.to_string().contains("BBBB"));
    }
}
