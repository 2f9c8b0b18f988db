//! Names shared between the core and its configuration layer

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ScrubError;

/// How a detected address is replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ReplacementType {
    /// One fixed placeholder per family
    Static,
    /// Sequence-numbered placeholder, stable per distinct original
    #[default]
    Consistent,
}

impl ReplacementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Consistent => "consistent",
        }
    }
}

impl FromStr for ReplacementType {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static" => Ok(Self::Static),
            "consistent" => Ok(Self::Consistent),
            other => Err(ScrubError::UnsupportedReplacementType(other.to_string())),
        }
    }
}

impl TryFrom<String> for ReplacementType {
    type Error = ScrubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ReplacementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Obfuscator families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum ObfuscatorKind {
    /// IPv4 through the linear scanner
    #[serde(rename = "ipv4")]
    FastIpv4,
    /// IPv4 through the regex matcher
    #[serde(rename = "ipv4-pattern")]
    Ipv4Pattern,
    #[serde(rename = "ipv6")]
    Ipv6,
    #[serde(rename = "mac")]
    Mac,
}

impl ObfuscatorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FastIpv4 => "ipv4",
            Self::Ipv4Pattern => "ipv4-pattern",
            Self::Ipv6 => "ipv6",
            Self::Mac => "mac",
        }
    }
}

impl FromStr for ObfuscatorKind {
    type Err = ScrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ipv4" => Ok(Self::FastIpv4),
            "ipv4-pattern" => Ok(Self::Ipv4Pattern),
            "ipv6" => Ok(Self::Ipv6),
            "mac" => Ok(Self::Mac),
            other => Err(ScrubError::UnsupportedObfuscatorKind(other.to_string())),
        }
    }
}

impl TryFrom<String> for ObfuscatorKind {
    type Error = ScrubError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for ObfuscatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_replacement_type() {
        assert_eq!("static".parse::<ReplacementType>().unwrap(), ReplacementType::Static);
        assert_eq!(
            "consistent".parse::<ReplacementType>().unwrap(),
            ReplacementType::Consistent
        );
    }

    #[test]
    fn test_unsupported_replacement_type() {
        let err = "random".parse::<ReplacementType>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported replacement type: random");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in [
            ObfuscatorKind::FastIpv4,
            ObfuscatorKind::Ipv4Pattern,
            ObfuscatorKind::Ipv6,
            ObfuscatorKind::Mac,
        ] {
            assert_eq!(kind.as_str().parse::<ObfuscatorKind>().unwrap(), kind);
        }
        assert!("domain".parse::<ObfuscatorKind>().is_err());
    }
}
