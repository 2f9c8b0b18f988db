//! Replacement tracking
//!
//! A tracker remembers which replacement every original spelling received,
//! so the same address gets the same placeholder for the whole run. Two
//! implementations share one contract:
//! - `SimpleTracker`: one `RwLock` around one map
//! - `StripedTracker`: keys spread over independently locked shards
//!
//! Recording an original twice with different replacements is fatal, see
//! [`ScrubError::is_fatal`].

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::{Result, ScrubError};

/// Produces a replacement for a generation key
pub type GenerateReplacement<'a> = &'a dyn Fn(&str) -> Result<String>;

/// Tracks and generates the replacements used by obfuscators
pub trait ReplacementTracker: Send + Sync {
    /// Seed the tracker with replacements from a previous run. Must be called
    /// at most once, before anything else was recorded.
    fn initialize(&self, replacements: HashMap<String, String>) -> Result<()>;

    /// Copy of every original -> replacement recorded so far
    fn report(&self) -> HashMap<String, String>;

    /// Record `original` as replaced by `replacement`. Recording an existing
    /// original with a different replacement is a fatal error.
    fn add_replacement(&self, original: &str, replacement: &str) -> Result<()>;

    /// Look up `original`; if absent, call `generator` with `key` and record
    /// the result. Without a generator an empty string is returned and
    /// nothing is recorded.
    fn generate_if_absent(
        &self,
        original: &str,
        key: &str,
        generator: Option<GenerateReplacement<'_>>,
    ) -> Result<String>;
}

/// Which tracker implementation to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackerKind {
    #[default]
    Simple,
    Striped,
}

impl TrackerKind {
    pub fn build(&self) -> Arc<dyn ReplacementTracker> {
        match self {
            Self::Simple => Arc::new(SimpleTracker::new()),
            Self::Striped => Arc::new(StripedTracker::new()),
        }
    }
}

fn record(entries: &mut HashMap<String, String>, original: &str, replacement: &str) -> Result<()> {
    match entries.get(original) {
        Some(existing) if existing == replacement => Ok(()),
        Some(existing) => {
            error!(
                "'{}' already has a value reported as '{}', tried to report '{}'",
                original, existing, replacement
            );
            Err(ScrubError::ConflictingReplacement {
                original: original.to_string(),
                existing: existing.clone(),
                attempted: replacement.to_string(),
            })
        }
        None => {
            entries.insert(original.to_string(), replacement.to_string());
            Ok(())
        }
    }
}

fn generate(
    entries: &mut HashMap<String, String>,
    original: &str,
    key: &str,
    generator: Option<GenerateReplacement<'_>>,
) -> Result<String> {
    if let Some(existing) = entries.get(original) {
        return Ok(existing.clone());
    }
    let Some(generator) = generator else {
        return Ok(String::new());
    };

    let replacement = generator(key)?;
    debug!("New replacement {} for {}", replacement, original);
    entries.insert(original.to_string(), replacement.clone());
    Ok(replacement)
}

fn already_initialized() -> ScrubError {
    error!("tracker was initialized more than once or after some replacements were already added");
    ScrubError::AlreadyInitialized
}

#[derive(Default)]
struct Mapping {
    initialized: bool,
    entries: HashMap<String, String>,
}

/// Single `RwLock` tracker; readers share, writers serialize
#[derive(Default)]
pub struct SimpleTracker {
    state: RwLock<Mapping>,
}

impl SimpleTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplacementTracker for SimpleTracker {
    fn initialize(&self, replacements: HashMap<String, String>) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.initialized || !state.entries.is_empty() {
            return Err(already_initialized());
        }

        info!("Seeding tracker with {} replacements", replacements.len());
        state.initialized = true;
        state.entries.extend(replacements);
        Ok(())
    }

    fn report(&self) -> HashMap<String, String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.entries.clone()
    }

    fn add_replacement(&self, original: &str, replacement: &str) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        record(&mut state.entries, original, replacement)
    }

    fn generate_if_absent(
        &self,
        original: &str,
        key: &str,
        generator: Option<GenerateReplacement<'_>>,
    ) -> Result<String> {
        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = state.entries.get(original) {
                return Ok(existing.clone());
            }
        }

        // re-checked under the write lock, another writer may have won
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        generate(&mut state.entries, original, key, generator)
    }
}

const REPORT_KEY: &str = "report";

/// Lock-striped tracker for heavily parallel runs
///
/// Every key lives in exactly one shard, picked by an FNV-1a hash, and each
/// operation only locks that shard. `report` is serialized against other
/// `report` calls but not against writers in other shards, so a report taken
/// during a run is a best-effort snapshot.
pub struct StripedTracker {
    initialized: AtomicBool,
    stripes: Box<[Mutex<HashMap<String, String>>]>,
}

impl StripedTracker {
    /// Four stripes per available core
    pub fn new() -> Self {
        let cores = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        Self::with_stripes(4 * cores)
    }

    pub fn with_stripes(count: usize) -> Self {
        let stripes = (0..count.max(1)).map(|_| Mutex::new(HashMap::new())).collect();
        Self {
            initialized: AtomicBool::new(false),
            stripes,
        }
    }

    pub fn stripe_count(&self) -> usize {
        self.stripes.len()
    }

    fn stripe_index(&self, key: &str) -> usize {
        fnv1a32(key.as_bytes()) as usize % self.stripes.len()
    }

    fn lock(&self, idx: usize) -> MutexGuard<'_, HashMap<String, String>> {
        self.stripes[idx].lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_for(&self, key: &str) -> MutexGuard<'_, HashMap<String, String>> {
        self.lock(self.stripe_index(key))
    }
}

impl Default for StripedTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacementTracker for StripedTracker {
    fn initialize(&self, replacements: HashMap<String, String>) -> Result<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(already_initialized());
        }
        if (0..self.stripes.len()).any(|idx| !self.lock(idx).is_empty()) {
            return Err(already_initialized());
        }

        info!("Seeding tracker with {} replacements", replacements.len());
        for (original, replacement) in replacements {
            self.lock_for(&original).insert(original, replacement);
        }
        Ok(())
    }

    fn report(&self) -> HashMap<String, String> {
        let report_idx = self.stripe_index(REPORT_KEY);
        let report_stripe = self.lock(report_idx);

        let mut copy = HashMap::new();
        for idx in 0..self.stripes.len() {
            if idx == report_idx {
                copy.extend(report_stripe.iter().map(|(k, v)| (k.clone(), v.clone())));
            } else {
                let stripe = self.lock(idx);
                copy.extend(stripe.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        copy
    }

    fn add_replacement(&self, original: &str, replacement: &str) -> Result<()> {
        record(&mut self.lock_for(original), original, replacement)
    }

    fn generate_if_absent(
        &self,
        original: &str,
        key: &str,
        generator: Option<GenerateReplacement<'_>>,
    ) -> Result<String> {
        generate(&mut self.lock_for(original), original, key, generator)
    }
}

/// 32-bit FNV-1a
fn fnv1a32(bytes: &[u8]) -> u32 {
    const FNV_OFFSET: u32 = 0x811c_9dc5;
    const FNV_PRIME: u32 = 0x0100_0193;

    let mut hash = FNV_OFFSET;
    for &b in bytes {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
