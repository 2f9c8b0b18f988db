//! Linear IPv4 scanner
//!
//! Finds dotted (`10.0.129.220`) and dashed (`10-0-129-220`) IPv4 addresses
//! without going through the regex engine. Candidates never start with `0`,
//! and octets of 255 or more are rejected.

use std::net::Ipv4Addr;

const MAX_OCTET: u32 = 0xFF;

/// Result of scanning a text for the next IPv4 address.
///
/// When nothing was found `address` is `None` and `start..end` covers the
/// whole scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Match {
    pub address: Option<Ipv4Addr>,
    /// Byte offset of the first character of the literal (inclusive)
    pub start: usize,
    /// Byte offset after the last character of the literal (exclusive)
    pub end: usize,
}

impl Ipv4Match {
    pub fn is_found(&self) -> bool {
        self.address.is_some()
    }

    /// Dotted-decimal form of the address, whatever separator the literal used
    pub fn normalized(&self) -> Option<String> {
        self.address.map(|addr| addr.to_string())
    }

    /// The literal substring of `text` this match was produced from
    pub fn literal<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }
}

/// Find the next IPv4 address in `text`.
pub fn find_next_ipv4(text: &str) -> Ipv4Match {
    let bytes = text.as_bytes();

    for start in 0..bytes.len() {
        if !matches!(bytes[start], b'1'..=b'9') {
            continue;
        }
        if let Some((address, len)) = try_parse_ipv4(&bytes[start..]) {
            return Ipv4Match {
                address: Some(address),
                start,
                end: start + len,
            };
        }
    }

    Ipv4Match {
        address: None,
        start: 0,
        end: bytes.len(),
    }
}

/// Parse four octets from the start of `s`. Returns the address and the
/// number of bytes consumed.
fn try_parse_ipv4(s: &[u8]) -> Option<(Ipv4Addr, usize)> {
    let mut octets = [0u8; 4];
    let mut separator: Option<u8> = None;
    let mut pos = 0;

    for (idx, octet) in octets.iter_mut().enumerate() {
        if idx > 0 {
            let c = *s.get(pos)?;
            // all separators of one address must be the same character
            match separator {
                None if c == b'.' || c == b'-' => separator = Some(c),
                Some(expected) if c == expected => {}
                _ => return None,
            }
            pos += 1;
        }

        let (value, consumed) = parse_octet(&s[pos..])?;
        *octet = value;
        pos += consumed;
    }

    Some((Ipv4Addr::from(octets), pos))
}

/// Returns the octet value and the number of digits consumed.
fn parse_octet(s: &[u8]) -> Option<(u8, usize)> {
    let mut value: u32 = 0;
    let mut digits = 0;

    while let Some(c) = s.get(digits).filter(|c| c.is_ascii_digit()) {
        value = value * 10 + u32::from(c - b'0');
        if value >= MAX_OCTET {
            return None;
        }
        digits += 1;
    }

    if digits == 0 {
        return None;
    }
    Some((value as u8, digits))
}
