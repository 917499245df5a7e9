//! Blood group classification.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing a [`BloodGroup`] from a string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognised blood group: {0:?}")]
pub struct BloodGroupError(pub String);

/// One of the eight ABO/Rh blood groups.
///
/// Parsing is case-insensitive and tolerates surrounding whitespace
/// (`"o+"`, `" O+ "` and `"O+"` all name the same group); the canonical
/// rendering is the upper-case ABO type with the Rh sign appended.
///
/// Matching between donors and requests is exact-equality only; no
/// compatibility logic (such as treating O- as a universal donor) exists
/// anywhere in Bloodlink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "blood_group"))]
pub enum BloodGroup {
    #[serde(rename = "A+")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "A+"))]
    APositive,
    #[serde(rename = "A-")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "A-"))]
    ANegative,
    #[serde(rename = "B+")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "B+"))]
    BPositive,
    #[serde(rename = "B-")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "B-"))]
    BNegative,
    #[serde(rename = "O+")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "O+"))]
    OPositive,
    #[serde(rename = "O-")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "O-"))]
    ONegative,
    #[serde(rename = "AB+")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "AB+"))]
    AbPositive,
    #[serde(rename = "AB-")]
    #[cfg_attr(feature = "postgres", sqlx(rename = "AB-"))]
    AbNegative,
}

impl BloodGroup {
    /// All eight groups, in the order they are shown in form selects.
    pub const ALL: [Self; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::OPositive,
        Self::ONegative,
        Self::AbPositive,
        Self::AbNegative,
    ];

    /// The canonical rendering, e.g. `"AB-"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BloodGroup {
    type Err = BloodGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A+" => Ok(Self::APositive),
            "A-" => Ok(Self::ANegative),
            "B+" => Ok(Self::BPositive),
            "B-" => Ok(Self::BNegative),
            "O+" => Ok(Self::OPositive),
            "O-" => Ok(Self::ONegative),
            "AB+" => Ok(Self::AbPositive),
            "AB-" => Ok(Self::AbNegative),
            _ => Err(BloodGroupError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("o+".parse::<BloodGroup>().unwrap(), BloodGroup::OPositive);
        assert_eq!("O+".parse::<BloodGroup>().unwrap(), BloodGroup::OPositive);
        assert_eq!("ab-".parse::<BloodGroup>().unwrap(), BloodGroup::AbNegative);
        assert_eq!("Ab-".parse::<BloodGroup>().unwrap(), BloodGroup::AbNegative);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(" b- ".parse::<BloodGroup>().unwrap(), BloodGroup::BNegative);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<BloodGroup>().is_err());
        assert!("C+".parse::<BloodGroup>().is_err());
        assert!("O".parse::<BloodGroup>().is_err());
        assert!("universal".parse::<BloodGroup>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for group in BloodGroup::ALL {
            assert_eq!(group.to_string().parse::<BloodGroup>().unwrap(), group);
        }
    }

    #[test]
    fn test_serde_uses_canonical_labels() {
        let json = serde_json::to_string(&BloodGroup::AbPositive).unwrap();
        assert_eq!(json, "\"AB+\"");
        let parsed: BloodGroup = serde_json::from_str("\"O-\"").unwrap();
        assert_eq!(parsed, BloodGroup::ONegative);
    }
}
