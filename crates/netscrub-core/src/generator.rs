//! Placeholder generation
//!
//! Each obfuscator owns one `Generator`. In consistent mode the generator
//! hands out `prefix` + zero-padded counter + `suffix`, the counter starting
//! at 1 and never reused. Generating past the template's ceiling is fatal.
//! Seeding an obfuscator moves its counter past the seeded placeholders.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::{ReplacementType, Result, ScrubError};

/// Shape of the placeholders for one address family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplacementTemplate {
    pub kind: &'static str,
    pub prefix: &'static str,
    pub width: usize,
    pub suffix: &'static str,
    pub static_value: &'static str,
    pub ceiling: u64,
}

/// `xxx.xxx.xxx.xxx` / `x-ipv4-%010d-x`
pub const IPV4_TEMPLATE: ReplacementTemplate = ReplacementTemplate {
    kind: "ipv4",
    prefix: "x-ipv4-",
    width: 10,
    suffix: "-x",
    static_value: "xxx.xxx.xxx.xxx",
    ceiling: 9_999_999_999,
};

/// `xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:xxxx` / `xx-ipv6-%018d-xx`
pub const IPV6_TEMPLATE: ReplacementTemplate = ReplacementTemplate {
    kind: "ipv6",
    prefix: "xx-ipv6-",
    width: 18,
    suffix: "-xx",
    static_value: "xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:xxxx:xxxx",
    ceiling: 999_999_999_999_999_999,
};

/// `xx:xx:xx:xx:xx:xx` / `xxx-mac-%06d-xxx`
pub const MAC_TEMPLATE: ReplacementTemplate = ReplacementTemplate {
    kind: "mac",
    prefix: "xxx-mac-",
    width: 6,
    suffix: "-xxx",
    static_value: "xx:xx:xx:xx:xx:xx",
    ceiling: 999_999,
};

impl ReplacementTemplate {
    pub fn sequenced(&self, n: u64) -> String {
        format!("{}{:0width$}{}", self.prefix, n, self.suffix, width = self.width)
    }

    /// Counter value of a consistent placeholder, `None` for anything else
    pub fn sequence_of(&self, replacement: &str) -> Option<u64> {
        let digits = replacement
            .strip_prefix(self.prefix)?
            .strip_suffix(self.suffix)?;
        if digits.len() != self.width || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    }
}

pub struct Generator {
    template: ReplacementTemplate,
    counter: AtomicU64,
}

impl Generator {
    pub fn new(template: ReplacementTemplate) -> Self {
        Self {
            template,
            counter: AtomicU64::new(1),
        }
    }

    pub fn template(&self) -> &ReplacementTemplate {
        &self.template
    }

    pub fn generate(&self, replacement_type: ReplacementType, key: &str) -> Result<String> {
        match replacement_type {
            ReplacementType::Static => Ok(self.generate_static(key)),
            ReplacementType::Consistent => self.generate_consistent(key),
        }
    }

    pub fn generate_static(&self, _key: &str) -> String {
        self.template.static_value.to_string()
    }

    /// Takes the next counter value, whatever the key.
    pub fn generate_consistent(&self, _key: &str) -> Result<String> {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        if n > self.template.ceiling {
            return Err(ScrubError::CounterExhausted {
                kind: self.template.kind,
                ceiling: self.template.ceiling,
            });
        }
        Ok(self.template.sequenced(n))
    }

    /// Move the counter past every placeholder in `replacements` that this
    /// template could have produced. Never moves it backwards.
    pub fn resume_after<'r>(&self, replacements: impl IntoIterator<Item = &'r str>) {
        let Some(last) = replacements
            .into_iter()
            .filter_map(|r| self.template.sequence_of(r))
            .max()
        else {
            return;
        };
        self.counter.fetch_max(last.saturating_add(1), Ordering::Relaxed);
    }
}
