use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrubError {
    #[error("unsupported replacement type: {0}")]
    UnsupportedReplacementType(String),

    #[error("unsupported obfuscator type: {0}")]
    UnsupportedObfuscatorKind(String),

    #[error("'{original}' already has a value reported as '{existing}', tried to report '{attempted}'")]
    ConflictingReplacement {
        original: String,
        existing: String,
        attempted: String,
    },

    #[error("tracker was initialized more than once or after some replacements were already added")]
    AlreadyInitialized,

    #[error("{kind} replacements exhausted: counter passed {ceiling}")]
    CounterExhausted { kind: &'static str, ceiling: u64 },
}

impl ScrubError {
    /// Fatal errors mean the replacement mapping can no longer be trusted.
    /// Callers must stop the whole run and discard any partial report.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConflictingReplacement { .. } | Self::AlreadyInitialized | Self::CounterExhausted { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ScrubError>;
