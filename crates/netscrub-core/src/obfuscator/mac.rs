use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use netscrub_match::{AddressPattern, normalize_mac};

use super::{Obfuscator, Replacer};
use crate::generator::{Generator, MAC_TEMPLATE};
use crate::tracker::{ReplacementTracker, SimpleTracker};
use crate::{ObfuscatorKind, ReplacementType, Result};

/// MAC address obfuscator
///
/// Spellings are normalized to uppercase with `:` before lookup, so
/// `29-7e-8c-8c-60-c9` and `29:7E:8C:8C:60:C9` share one replacement.
pub struct MacAddressObfuscator {
    replacer: Replacer,
}

impl MacAddressObfuscator {
    pub fn new(replacement_type: ReplacementType) -> Self {
        Self::with_tracker(replacement_type, Arc::new(SimpleTracker::new()))
    }

    pub fn with_tracker(replacement_type: ReplacementType, tracker: Arc<dyn ReplacementTracker>) -> Self {
        Self {
            replacer: Replacer::new(MAC_TEMPLATE, replacement_type, tracker),
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

impl Obfuscator for MacAddressObfuscator {
    fn kind(&self) -> ObfuscatorKind {
        ObfuscatorKind::Mac
    }

    fn tracker(&self) -> &dyn ReplacementTracker {
        self.replacer.tracker.as_ref()
    }

    fn initialize(&self, replacements: HashMap<String, String>) -> Result<()> {
        self.replacer.initialize(replacements)
    }

    fn contents<'a>(&self, contents: &'a str) -> Result<Cow<'a, str>> {
        let candidates = AddressPattern::Mac.find_all(contents);
        self.replacer
            .replace_candidates(contents, candidates, |mac| Some(normalize_mac(mac)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_static() {
        let cases = [
            (
                "received from 29-7E-8C-8C-60-C9",
                "received from xx:xx:xx:xx:xx:xx",
                report(&[
                    ("29:7E:8C:8C:60:C9", "xx:xx:xx:xx:xx:xx"),
                    ("29-7E-8C-8C-60-C9", "xx:xx:xx:xx:xx:xx"),
                ]),
            ),
            (
                "link/ether 52:54:00:ab:cd:ef brd ff:ff:ff:ff:ff:ff",
                "link/ether xx:xx:xx:xx:xx:xx brd xx:xx:xx:xx:xx:xx",
                report(&[
                    ("52:54:00:AB:CD:EF", "xx:xx:xx:xx:xx:xx"),
                    ("52:54:00:ab:cd:ef", "xx:xx:xx:xx:xx:xx"),
                    ("FF:FF:FF:FF:FF:FF", "xx:xx:xx:xx:xx:xx"),
                    ("ff:ff:ff:ff:ff:ff", "xx:xx:xx:xx:xx:xx"),
                ]),
            ),
            (
                "squashed 69806FE67C05 is not matched",
                "squashed 69806FE67C05 is not matched",
                report(&[]),
            ),
        ];

        for (input, expected, expected_report) in cases {
            let o = MacAddressObfuscator::new(ReplacementType::Static);
            assert_eq!(o.contents(input).unwrap(), expected, "input: {input}");
            assert_eq!(o.report(), expected_report, "input: {input}");
        }
    }

    #[test]
    fn test_consistent_collapses_spellings() {
        let o = MacAddressObfuscator::new(ReplacementType::Consistent);

        let output = o
            .contents("eth0 29-7e-8c-8c-60-c9, eth1 29:7E:8C:8C:60:C9, eth2 00:1A:2B:3C:4D:5E")
            .unwrap();

        assert_eq!(
            output,
            "eth0 xxx-mac-000001-xxx, eth1 xxx-mac-000001-xxx, eth2 xxx-mac-000002-xxx"
        );
        assert_eq!(
            o.report(),
            report(&[
                ("29:7E:8C:8C:60:C9", "xxx-mac-000001-xxx"),
                ("29-7e-8c-8c-60-c9", "xxx-mac-000001-xxx"),
                ("00:1A:2B:3C:4D:5E", "xxx-mac-000002-xxx"),
            ])
        );
    }

    #[test]
    fn test_uuid_is_left_alone() {
        let o = MacAddressObfuscator::new(ReplacementType::Consistent);
        let input = "pod uid 0f3c2a9e-55b1-4c3d-9a7e-1b2c3d4e5f60";

        assert_eq!(o.contents(input).unwrap(), input);
        assert!(o.report().is_empty());
    }
}
