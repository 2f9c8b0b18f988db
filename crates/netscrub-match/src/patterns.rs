//! Regex matchers for address-shaped substrings
//!
//! The patterns are deliberately loose. Callers validate IP candidates with
//! `std::net::IpAddr` and drop the ones that fail.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // ASCII word boundary; dotted and dashed forms never mix separators
    static ref IPV4_PATTERN: Regex =
        Regex::new(r"(?-u:\b)(([0-9]{1,3}[.]){3}|([0-9]{1,3}[-]){3})([0-9]{1,3})").unwrap();

    // also catches words like `:face:bad`
    static ref IPV6_PATTERN: Regex = Regex::new(r"([a-f0-9]{0,4}[:]){1,8}[a-f0-9]{1,4}").unwrap();

    // no squashed `69806FE67C05` form, those collide with UUID fragments
    static ref MAC_PATTERN: Regex = Regex::new(r"([0-9a-fA-F]{2}[:-]){5}[0-9a-fA-F]{2}").unwrap();
}

/// Address families with a regex matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressPattern {
    Ipv4,
    Ipv6,
    Mac,
}

impl AddressPattern {
    pub fn regex(&self) -> &'static Regex {
        match self {
            Self::Ipv4 => &*IPV4_PATTERN,
            Self::Ipv6 => &*IPV6_PATTERN,
            Self::Mac => &*MAC_PATTERN,
        }
    }

    /// All non-overlapping candidates in `text`, left to right
    pub fn find_all<'t>(&self, text: &'t str) -> Vec<&'t str> {
        self.regex().find_iter(text).map(|m| m.as_str()).collect()
    }
}

/// Canonical MAC spelling: `:` separators, uppercase hex digits
pub fn normalize_mac(mac: &str) -> String {
    mac.replace('-', ":").to_ascii_uppercase()
}
