//! Address matchers for netscrub
//!
//! This crate contains:
//! - A hand-written IPv4 scanner for the hot path (`ipv4`)
//! - Regex matchers for IPv4, IPv6 and MAC addresses (`patterns`)

pub mod ipv4;
pub mod patterns;

pub use ipv4::{Ipv4Match, find_next_ipv4};
pub use patterns::{AddressPattern, normalize_mac};
