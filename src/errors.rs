use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClaimError {
    #[error("brand already owns a collection")]
    DuplicateCollection,

    #[error("caller is not the collection creator")]
    Unauthorized,

    /// Covers both a wrong secret and an already redeemed one.
    #[error("invalid secret")]
    InvalidSecret,

    #[error("commitment already minted in this collection")]
    DuplicateCommitment,

    #[error("commitment was already claimed and cannot be minted again")]
    CommitmentConsumed,

    #[error("unknown collection")]
    UnknownCollection,

    #[error("invalid length: expected {expected} got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid signature")]
    InvalidSignature,

    /// The signer's next transaction must carry `expected`.
    #[error("bad nonce: expected {expected} got {got}")]
    BadNonce { expected: u64, got: u64 },

    #[error("field too long: max {max} got {got}")]
    FieldTooLong { max: usize, got: usize },

    #[error("decode error: {0}")]
    DecodeError(&'static str),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
