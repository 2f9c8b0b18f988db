//! Core of netscrub: consistent obfuscation of network identifiers
//!
//! This crate contains:
//! - Placeholder generators (static and sequence-numbered)
//! - Replacement trackers (single lock and lock-striped)
//! - Per-family obfuscators for IPv4, IPv6 and MAC addresses

pub mod error;
pub mod generator;
pub mod obfuscator;
pub mod schema;
pub mod tracker;

pub use error::{Result, ScrubError};
pub use generator::{Generator, ReplacementTemplate};
pub use obfuscator::{
    FastIpv4Obfuscator, Ipv4Obfuscator, Ipv6Obfuscator, MacAddressObfuscator, Obfuscator, ObfuscatorSet,
    build_obfuscator, build_obfuscator_with_generator, new_obfuscator,
};
pub use schema::{ObfuscatorKind, ReplacementType};
pub use tracker::{ReplacementTracker, SimpleTracker, StripedTracker, TrackerKind};
