use std::borrow::Cow;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use netscrub_match::AddressPattern;
use tracing::trace;

use super::{Obfuscator, Replacer};
use crate::generator::{Generator, IPV6_TEMPLATE};
use crate::tracker::{ReplacementTracker, SimpleTracker};
use crate::{ObfuscatorKind, ReplacementType, Result};

const EXCLUDED_IPV6S: [&str; 1] = ["::1"];

/// IPv6 obfuscator
///
/// The pattern also catches tokens like `:face:bad` or UUID fragments; only
/// candidates that parse as an IP address are replaced.
pub struct Ipv6Obfuscator {
    replacer: Replacer,
}

impl Ipv6Obfuscator {
    pub fn new(replacement_type: ReplacementType) -> Self {
        Self::with_tracker(replacement_type, Arc::new(SimpleTracker::new()))
    }

    pub fn with_tracker(replacement_type: ReplacementType, tracker: Arc<dyn ReplacementTracker>) -> Self {
        Self {
            replacer: Replacer::new(IPV6_TEMPLATE, replacement_type, tracker),
        }
    }

    /// Share a generator with other obfuscators on the same tracker
    pub fn with_generator(
        replacement_type: ReplacementType,
        tracker: Arc<dyn ReplacementTracker>,
        generator: Arc<Generator>,
    ) -> Self {
        Self {
            replacer: Replacer::with_generator(replacement_type, tracker, generator),
        }
    }
}

fn normalize(candidate: &str) -> Option<String> {
    if EXCLUDED_IPV6S.contains(&candidate) {
        return None;
    }

    match candidate.parse::<IpAddr>() {
        Ok(_) => Some(candidate.to_string()),
        Err(_) => {
            trace!("Skipping invalid IPv6 candidate {}", candidate);
            None
        }
    }
}

impl Obfuscator for Ipv6Obfuscator {
    fn kind(&self) -> ObfuscatorKind {
        ObfuscatorKind::Ipv6
    }

    fn tracker(&self) -> &dyn ReplacementTracker {
        self.replacer.tracker.as_ref()
    }

    fn initialize(&self, replacements: HashMap<String, String>) -> Result<()> {
        self.replacer.initialize(replacements)
    }

    fn contents<'a>(&self, contents: &'a str) -> Result<Cow<'a, str>> {
        let candidates = AddressPattern::Ipv6.find_all(contents);
        self.replacer.replace_candidates(contents, candidates, normalize)
    }
}
