//! Argument types shared by the tools
//!
//! Enumerations accept any casing and are sent upstream in canonical upper case.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_uppercase().as_str() {
                    $($value => Ok($name::$variant),)+
                    _ => Err(format!(
                        "invalid {} '{}', expected one of: {}",
                        stringify!($name),
                        s,
                        Self::VALUES.join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

string_enum!(
    /// Issue priority
    Priority { P1 => "P1", P2 => "P2", P3 => "P3", P4 => "P4" }
);

string_enum!(
    IssueStatus { Active => "ACTIVE", Ignored => "IGNORED", Resolved => "RESOLVED" }
);

string_enum!(
    /// Whether an issue was raised by AI-driven analytics
    AiDriven { Yes => "YES", No => "NO" }
);

string_enum!(
    SiteType { Area => "AREA", Building => "BUILDING" }
);

string_enum!(
    ComplianceStatus {
        Compliant => "COMPLIANT",
        NonCompliant => "NON_COMPLIANT",
        InProgress => "IN_PROGRESS",
        NotAvailable => "NOT_AVAILABLE",
        NotApplicable => "NOT_APPLICABLE",
        Error => "ERROR",
    }
);

static MAC_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9A-Fa-f]{2}(:[0-9A-Fa-f]{2}){5}$").expect("valid MAC address pattern")
});

/// A client MAC address in `xx:xx:xx:xx:xx:xx` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacAddress(String);

impl MacAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for MacAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if MAC_ADDRESS.is_match(trimmed) {
            Ok(MacAddress(trimmed.to_ascii_lowercase()))
        } else {
            Err(format!("invalid MAC address '{}', expected format xx:xx:xx:xx:xx:xx", s))
        }
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Clamp a page size into `1..=max`
pub fn clamp_limit(limit: u32, max: u32) -> u32 {
    limit.clamp(1, max)
}

/// Pagination offsets are 1-based upstream
pub fn clamp_offset(offset: u32) -> u32 {
    offset.max(1)
}

/// Drop empty strings so `""` behaves like an omitted filter
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_case_insensitive() {
        assert_eq!("p1".parse::<Priority>().unwrap(), Priority::P1);
        assert_eq!(" resolved ".parse::<IssueStatus>().unwrap(), IssueStatus::Resolved);
        assert_eq!("non_compliant".parse::<ComplianceStatus>().unwrap().as_str(), "NON_COMPLIANT");
        assert_eq!(SiteType::Building.to_string(), "BUILDING");
    }

    #[test]
    fn test_enum_rejects_unknown_value() {
        let err = "P9".parse::<Priority>().unwrap_err();
        assert!(err.contains("P1, P2, P3, P4"));
    }

    #[test]
    fn test_enum_deserialize() {
        let value: AiDriven = serde_json::from_value(serde_json::json!("yes")).unwrap();
        assert_eq!(value, AiDriven::Yes);
        assert!(serde_json::from_value::<AiDriven>(serde_json::json!("maybe")).is_err());
    }

    #[test]
    fn test_mac_address_validation() {
        assert_eq!("AA:bb:01:23:45:67".parse::<MacAddress>().unwrap().as_str(), "aa:bb:01:23:45:67");
        assert!("aa:bb:cc:dd:ee".parse::<MacAddress>().is_err());
        assert!("aa-bb-cc-dd-ee-ff".parse::<MacAddress>().is_err());
        assert!("zz:bb:cc:dd:ee:ff".parse::<MacAddress>().is_err());
    }

    #[test]
    fn test_pagination_clamps() {
        assert_eq!(clamp_limit(0, 50), 1);
        assert_eq!(clamp_limit(25, 50), 25);
        assert_eq!(clamp_limit(900, 500), 500);
        assert_eq!(clamp_offset(0), 1);
        assert_eq!(clamp_offset(7), 7);
    }
}
