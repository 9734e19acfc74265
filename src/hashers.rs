use claim_primitives::sha3_256;
use serde::{Deserialize, Serialize};

use crate::types::CommitmentKey;

/// Turns a plaintext secret into the fixed-length key it is stored under.
///
/// Mint-time key production (off-band or via [`crate::Platform::commit`]) and
/// claim-time lookup must use the same implementation.
pub trait HashCommitment: Send + Sync {
    fn commit(&self, secret: &[u8]) -> CommitmentKey;
}

/// key = SHA3-256(secret), untagged so it can be reproduced with stock tools.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha3Commitment;

impl HashCommitment for Sha3Commitment {
    fn commit(&self, secret: &[u8]) -> CommitmentKey {
        CommitmentKey(sha3_256(secret))
    }
}

/// key = BLAKE3(secret), 32-byte output.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Commitment;

impl HashCommitment for Blake3Commitment {
    fn commit(&self, secret: &[u8]) -> CommitmentKey {
        CommitmentKey(*blake3::hash(secret).as_bytes())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[default]
    #[serde(rename = "sha3-256")]
    Sha3_256,
    #[serde(rename = "blake3")]
    Blake3,
}

impl HashCommitment for HashAlgorithm {
    fn commit(&self, secret: &[u8]) -> CommitmentKey {
        match self {
            Self::Sha3_256 => Sha3Commitment.commit(secret),
            Self::Blake3 => Blake3Commitment.commit(secret),
        }
    }
}
