use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use netscrub_match::find_next_ipv4;

use super::{Obfuscator, Replacer};
use crate::generator::{Generator, IPV4_TEMPLATE};
use crate::tracker::{ReplacementTracker, SimpleTracker};
use crate::{ObfuscatorKind, ReplacementType, Result};

/// IPv4 obfuscator on top of the linear scanner
///
/// Dotted and dashed spellings of one address share a replacement, and both
/// spellings end up in the report.
pub struct FastIpv4Obfuscator {
    replacer: Replacer,
}

impl FastIpv4Obfuscator {
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

impl Obfuscator for FastIpv4Obfuscator {
    fn kind(&self) -> ObfuscatorKind {
        ObfuscatorKind::FastIpv4
    }

    fn tracker(&self) -> &dyn ReplacementTracker {
        self.replacer.tracker.as_ref()
    }

    fn initialize(&self, replacements: HashMap<String, String>) -> Result<()> {
        self.replacer.initialize(replacements)
    }

    fn contents<'a>(&self, contents: &'a str) -> Result<Cow<'a, str>> {
        let mut output = String::new();
        let mut cursor = 0;

        while cursor < contents.len() {
            let rest = &contents[cursor..];
            let found = find_next_ipv4(rest);
            let Some(normalized) = found.normalized() else {
                break;
            };

            let replacement = self.replacer.replacement_for(&normalized)?;
            self.replacer.record(&normalized, &replacement)?;
            // the literal may be the dashed spelling
            self.replacer.record(found.literal(rest), &replacement)?;

            output.push_str(&rest[..found.start]);
            output.push_str(&replacement);
            cursor += found.end;
        }

        if cursor == 0 {
            return Ok(Cow::Borrowed(contents));
        }
        output.push_str(&contents[cursor..]);
        Ok(Cow::Owned(output))
    }
}
