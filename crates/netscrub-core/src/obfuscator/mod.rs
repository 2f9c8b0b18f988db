//! Per-family obfuscators
//!
//! An obfuscator binds a matcher, a generator and a tracker. `path` and
//! `contents` return the input with every detected address replaced;
//! `report` returns every original spelling seen so far and its replacement.
//!
//! Obfuscators are `Send + Sync`; share one instance between threads to get
//! one consistent report for the whole run.

mod fast_ipv4;
mod ipv4;
mod ipv6;
mod mac;
mod set;

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::generator::{Generator, ReplacementTemplate};
use crate::tracker::{ReplacementTracker, SimpleTracker};
use crate::{ObfuscatorKind, ReplacementType, Result};

pub use fast_ipv4::FastIpv4Obfuscator;
pub use ipv4::Ipv4Obfuscator;
pub use ipv6::Ipv6Obfuscator;
pub use mac::MacAddressObfuscator;
pub use set::ObfuscatorSet;

/// Replaces one family of identifiers in text
pub trait Obfuscator: Send + Sync {
    fn kind(&self) -> ObfuscatorKind;

    /// Tracker holding this obfuscator's replacements
    fn tracker(&self) -> &dyn ReplacementTracker;

    /// Obfuscate file contents. Returns the input unchanged (borrowed) when
    /// nothing was replaced.
    fn contents<'a>(&self, contents: &'a str) -> Result<Cow<'a, str>>;

    /// Obfuscate a file path
    fn path<'a>(&self, path: &'a str) -> Result<Cow<'a, str>> {
        self.contents(path)
    }

    fn report(&self) -> HashMap<String, String> {
        self.tracker().report()
    }

    /// Seed the replacements from a previous run, see
    /// [`ReplacementTracker::initialize`]. The family obfuscators also move
    /// their generator past every seeded placeholder, so new addresses never
    /// reuse a seeded number.
    fn initialize(&self, replacements: HashMap<String, String>) -> Result<()> {
        self.tracker().initialize(replacements)
    }
}

/// Build an obfuscator from a replacement type name such as `"consistent"`.
pub fn new_obfuscator(kind: ObfuscatorKind, replacement_type: &str) -> Result<Box<dyn Obfuscator>> {
    let replacement_type: ReplacementType = replacement_type.parse()?;
    Ok(build_obfuscator(kind, replacement_type, Arc::new(SimpleTracker::new())))
}

/// Build an obfuscator on top of an existing tracker
///
/// The obfuscator gets its own generator. Consistent obfuscators of the same
/// family that share a tracker must also share a generator, see
/// [`build_obfuscator_with_generator`]; otherwise both hand out the same
/// numbers to different addresses.
pub fn build_obfuscator(
    kind: ObfuscatorKind,
    replacement_type: ReplacementType,
    tracker: Arc<dyn ReplacementTracker>,
) -> Box<dyn Obfuscator> {
    debug!("Building {} obfuscator ({})", kind, replacement_type);
    match kind {
        ObfuscatorKind::FastIpv4 => Box::new(FastIpv4Obfuscator::with_tracker(replacement_type, tracker)),
        ObfuscatorKind::Ipv4Pattern => Box::new(Ipv4Obfuscator::with_tracker(replacement_type, tracker)),
        ObfuscatorKind::Ipv6 => Box::new(Ipv6Obfuscator::with_tracker(replacement_type, tracker)),
        ObfuscatorKind::Mac => Box::new(MacAddressObfuscator::with_tracker(replacement_type, tracker)),
    }
}

/// Build an obfuscator on top of an existing tracker and generator. The
/// generator's template decides the placeholders, whatever the family.
pub fn build_obfuscator_with_generator(
    kind: ObfuscatorKind,
    replacement_type: ReplacementType,
    tracker: Arc<dyn ReplacementTracker>,
    generator: Arc<Generator>,
) -> Box<dyn Obfuscator> {
    debug!("Building {} obfuscator ({}, shared generator)", kind, replacement_type);
    match kind {
        ObfuscatorKind::FastIpv4 => Box::new(FastIpv4Obfuscator::with_generator(replacement_type, tracker, generator)),
        ObfuscatorKind::Ipv4Pattern => Box::new(Ipv4Obfuscator::with_generator(replacement_type, tracker, generator)),
        ObfuscatorKind::Ipv6 => Box::new(Ipv6Obfuscator::with_generator(replacement_type, tracker, generator)),
        ObfuscatorKind::Mac => Box::new(MacAddressObfuscator::with_generator(replacement_type, tracker, generator)),
    }
}

/// State shared by every family: generator, tracker and replacement mode
struct Replacer {
    replacement_type: ReplacementType,
    generator: Arc<Generator>,
    tracker: Arc<dyn ReplacementTracker>,
}

impl Replacer {
    fn new(
        template: ReplacementTemplate,
        replacement_type: ReplacementType,
        tracker: Arc<dyn ReplacementTracker>,
    ) -> Self {
        Self::with_generator(replacement_type, tracker, Arc::new(Generator::new(template)))
    }

    fn with_generator(
        replacement_type: ReplacementType,
        tracker: Arc<dyn ReplacementTracker>,
        generator: Arc<Generator>,
    ) -> Self {
        Self {
            replacement_type,
            generator,
            tracker,
        }
    }

    /// Seed the tracker, then resume numbering after the seeded placeholders
    fn initialize(&self, replacements: HashMap<String, String>) -> Result<()> {
        self.tracker.initialize(replacements.clone())?;
        self.generator
            .resume_after(replacements.values().map(String::as_str));
        Ok(())
    }

    /// Replacement for `normalized`, generated on first sight
    fn replacement_for(&self, normalized: &str) -> Result<String> {
        let generate = |key: &str| self.generator.generate(self.replacement_type, key);
        self.tracker
            .generate_if_absent(normalized, normalized, Some(&generate))
    }

    fn record(&self, original: &str, replacement: &str) -> Result<()> {
        self.tracker.add_replacement(original, replacement)
    }

    /// Pattern flavour of the algorithm: every candidate is normalized (or
    /// dropped when `normalize` returns `None`), and each literal is replaced
    /// everywhere in the text at once.
    ///
    /// The global replace also rewrites a literal inside a longer address
    /// (`1.2.3.4` inside `11.2.3.45`). A later candidate that no longer
    /// appears in the output is skipped: nothing is generated or recorded
    /// for it, so the report only holds spellings that were replaced.
    fn replace_candidates<'a>(
        &self,
        input: &'a str,
        candidates: Vec<&str>,
        normalize: impl Fn(&str) -> Option<String>,
    ) -> Result<Cow<'a, str>> {
        let mut output = Cow::Borrowed(input);

        for literal in candidates {
            if !output.contains(literal) {
                trace!("Candidate {} already rewritten", literal);
                continue;
            }
            let Some(normalized) = normalize(literal) else {
                continue;
            };

            let replacement = self.replacement_for(&normalized)?;
            output = Cow::Owned(output.replace(literal, &replacement));
            self.record(literal, &replacement)?;
        }

        Ok(output)
    }
}
