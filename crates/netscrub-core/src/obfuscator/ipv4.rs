use std::borrow::Cow;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

use netscrub_match::AddressPattern;
use tracing::trace;

use super::{Obfuscator, Replacer};
use crate::generator::{Generator, IPV4_TEMPLATE};
use crate::tracker::{ReplacementTracker, SimpleTracker};
use crate::{ObfuscatorKind, ReplacementType, Result};

const EXCLUDED_IPV4S: [&str; 2] = ["127.0.0.1", "0.0.0.0"];

/// IPv4 obfuscator on top of the regex matcher
pub struct Ipv4Obfuscator {
    replacer: Replacer,
}

impl Ipv4Obfuscator {
    pub fn new(replacement_type: ReplacementType) -> Self {
        Self::with_tracker(replacement_type, Arc::new(SimpleTracker::new()))
    }

    pub fn with_tracker(replacement_type: ReplacementType, tracker: Arc<dyn ReplacementTracker>) -> Self {
        Self {
            replacer: Replacer::new(IPV4_TEMPLATE, replacement_type, tracker),
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
    if EXCLUDED_IPV4S.contains(&candidate) {
        return None;
    }

    let cleaned = candidate.replace('-', ".");
    match cleaned.parse::<Ipv4Addr>() {
        Ok(_) => Some(cleaned),
        Err(_) => {
            trace!("Skipping invalid IPv4 candidate {}", candidate);
            None
        }
    }
}

impl Obfuscator for Ipv4Obfuscator {
    fn kind(&self) -> ObfuscatorKind {
        ObfuscatorKind::Ipv4Pattern
    }

    fn tracker(&self) -> &dyn ReplacementTracker {
        self.replacer.tracker.as_ref()
    }

    fn initialize(&self, replacements: HashMap<String, String>) -> Result<()> {
        self.replacer.initialize(replacements)
    }

    fn contents<'a>(&self, contents: &'a str) -> Result<Cow<'a, str>> {
        let candidates = AddressPattern::Ipv4.find_all(contents);
        self.replacer.replace_candidates(contents, candidates, normalize)
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
                "received request from 192.168.1.10",
                "received request from xxx.xxx.xxx.xxx",
                report(&[("192.168.1.10", "xxx.xxx.xxx.xxx")]),
            ),
            (
                "ip-10-0-129-220.ec2.aws.yaml",
                "ip-xxx.xxx.xxx.xxx.ec2.aws.yaml",
                report(&[
                    ("10.0.129.220", "xxx.xxx.xxx.xxx"),
                    ("10-0-129-220", "xxx.xxx.xxx.xxx"),
                ]),
            ),
            (
                "Listening on 0.0.0.0:8080",
                "Listening on 0.0.0.0:8080",
                report(&[]),
            ),
            ("ping 127.0.0.1", "ping 127.0.0.1", report(&[])),
            ("ip+10+0+129+220", "ip+10+0+129+220", report(&[])),
            ("version: 4.8.12", "version: 4.8.12", report(&[])),
            (
                "version: 4.8.0-0.nightly-2021-07-31-065602",
                "version: 4.8.0-0.nightly-2021-07-31-065602",
                report(&[]),
            ),
        ];

        for (input, expected, expected_report) in cases {
            let o = Ipv4Obfuscator::new(ReplacementType::Static);
            assert_eq!(o.contents(input).unwrap(), expected, "input: {input}");
            assert_eq!(o.report(), expected_report, "input: {input}");
        }
    }

    #[test]
    fn test_out_of_range_octets_are_left_alone() {
        let o = Ipv4Obfuscator::new(ReplacementType::Consistent);
        assert_eq!(o.contents("bad 999.1.1.1").unwrap(), "bad 999.1.1.1");
        assert!(o.report().is_empty());
    }

    #[test]
    fn test_consistent_replaces_every_occurrence() {
        let o = Ipv4Obfuscator::new(ReplacementType::Consistent);

        let output = o
            .contents("from 192.168.1.10 to 10.0.0.1, again from 192.168.1.10")
            .unwrap();

        assert_eq!(
            output,
            "from x-ipv4-0000000001-x to x-ipv4-0000000002-x, again from x-ipv4-0000000001-x"
        );
        assert_eq!(
            o.report(),
            report(&[
                ("192.168.1.10", "x-ipv4-0000000001-x"),
                ("10.0.0.1", "x-ipv4-0000000002-x"),
            ])
        );
    }

    #[test]
    fn test_rewritten_candidates_are_not_reported() {
        let o = Ipv4Obfuscator::new(ReplacementType::Consistent);

        // the first replace also hits the middle of the longer address
        assert_eq!(
            o.contents("a 1.2.3.4 b 11.2.3.45").unwrap(),
            "a x-ipv4-0000000001-x b 1x-ipv4-0000000001-x5"
        );
        assert_eq!(o.report(), report(&[("1.2.3.4", "x-ipv4-0000000001-x")]));

        assert_eq!(o.contents("c 10.0.0.1").unwrap(), "c x-ipv4-0000000002-x");
    }

    #[test]
    fn test_consistent_across_spellings() {
        let o = Ipv4Obfuscator::new(ReplacementType::Consistent);

        assert_eq!(
            o.contents("192.168.1.10 and 192-168-1-10").unwrap(),
            "x-ipv4-0000000001-x and x-ipv4-0000000001-x"
        );
        assert_eq!(
            o.report(),
            report(&[
                ("192.168.1.10", "x-ipv4-0000000001-x"),
                ("192-168-1-10", "x-ipv4-0000000001-x"),
            ])
        );
    }
}
