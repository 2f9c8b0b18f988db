use std::borrow::Cow;
use std::collections::HashMap;

use super::Obfuscator;
use crate::{ObfuscatorKind, Result};

/// Ordered list of obfuscators applied one after the other
#[derive(Default)]
pub struct ObfuscatorSet {
    obfuscators: Vec<Box<dyn Obfuscator>>,
}

impl ObfuscatorSet {
    pub fn new(obfuscators: Vec<Box<dyn Obfuscator>>) -> Self {
        Self { obfuscators }
    }

    pub fn push(&mut self, obfuscator: Box<dyn Obfuscator>) {
        self.obfuscators.push(obfuscator);
    }

    pub fn len(&self) -> usize {
        self.obfuscators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obfuscators.is_empty()
    }

    pub fn kinds(&self) -> Vec<ObfuscatorKind> {
        self.obfuscators.iter().map(|o| o.kind()).collect()
    }

    pub fn contents<'a>(&self, contents: &'a str) -> Result<Cow<'a, str>> {
        self.apply(contents, |o, s| o.contents(s))
    }

    pub fn path<'a>(&self, path: &'a str) -> Result<Cow<'a, str>> {
        self.apply(path, |o, s| o.path(s))
    }

    /// Reports of every obfuscator, keyed by family
    pub fn reports(&self) -> Vec<(ObfuscatorKind, HashMap<String, String>)> {
        self.obfuscators.iter().map(|o| (o.kind(), o.report())).collect()
    }

    /// All reports merged into one original -> replacement map
    pub fn report(&self) -> HashMap<String, String> {
        self.obfuscators.iter().flat_map(|o| o.report()).collect()
    }

    fn apply<'a>(
        &self,
        input: &'a str,
        step: impl for<'s> Fn(&dyn Obfuscator, &'s str) -> Result<Cow<'s, str>>,
    ) -> Result<Cow<'a, str>> {
        let mut output = Cow::Borrowed(input);

        for obfuscator in &self.obfuscators {
            let replaced = match step(obfuscator.as_ref(), &*output)? {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            if let Some(s) = replaced {
                output = Cow::Owned(s);
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReplacementType;
    use crate::obfuscator::{FastIpv4Obfuscator, Ipv6Obfuscator, MacAddressObfuscator};

    fn consistent_set() -> ObfuscatorSet {
        ObfuscatorSet::new(vec![
            Box::new(FastIpv4Obfuscator::new(ReplacementType::Consistent)),
            Box::new(Ipv6Obfuscator::new(ReplacementType::Consistent)),
            Box::new(MacAddressObfuscator::new(ReplacementType::Consistent)),
        ])
    }

    #[test]
    fn test_applies_every_family() {
        let set = consistent_set();

        let output = set
            .contents("node 10.0.0.1 peer 2001:db8::1 nic 52:54:00:ab:cd:ef")
            .unwrap();

        assert_eq!(
            output,
            "node x-ipv4-0000000001-x peer xx-ipv6-000000000000000001-xx nic xxx-mac-000001-xxx"
        );
        assert_eq!(set.report().len(), 4);
        assert_eq!(
            set.kinds(),
            vec![ObfuscatorKind::FastIpv4, ObfuscatorKind::Ipv6, ObfuscatorKind::Mac]
        );
    }

    #[test]
    fn test_reports_per_family() {
        let set = consistent_set();
        set.path("must-gather/ip-10-0-0-1/logs").unwrap();

        let reports = set.reports();
        assert_eq!(reports[0].0, ObfuscatorKind::FastIpv4);
        assert_eq!(reports[0].1.len(), 2);
        assert!(reports[1].1.is_empty());
        assert!(reports[2].1.is_empty());
    }

    #[test]
    fn test_untouched_input_stays_borrowed() {
        let set = consistent_set();
        assert!(matches!(set.contents("nothing to see").unwrap(), Cow::Borrowed(_)));
        assert!(ObfuscatorSet::default().is_empty());
    }
}
