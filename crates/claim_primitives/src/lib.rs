#![forbid(unsafe_code)]
#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

//! Claim registry primitives: hashing and fixed-width little-endian encodings.
#![cfg_attr(not(feature = "std"), no_std)]
//
// Normative utilities shared by the registry, the vault and the transaction codec:
//
// - Domain-tagged SHA3-256 with length framing (identifiers, signing messages)
// - Plain SHA3-256 (secret commitments reproducible off-band)
// - Fixed-width little-endian integer encodings

use sha3::{Digest, Sha3_256};

/// 32-byte hash (SHA3-256 output).
pub type Hash256 = [u8; 32];

/// 32-byte public key (Ed25519).
pub type Pk32 = [u8; 32];

/// 64-byte signature (Ed25519 canonical encoding).
pub type Sig64 = [u8; 64];

pub mod constants;

/// Convert an unsigned integer to fixed-width little-endian bytes.
///
/// The output is exactly `W` bytes (no overlong encodings).
#[must_use]
pub fn le_bytes<const W: usize>(mut x: u128) -> [u8; W] {
    let mut out = [0u8; W];
    let mut i = 0usize;
    while i < W {
        out[i] = (x & 0xFF) as u8;
        x >>= 8;
        i += 1;
    }
    out
}

/// Domain-tagged SHA3-256 with length framing:
/// `H(tag_ascii, parts[])` = `SHA3_256`( UTF8(tag) || Σ ( LE(|p|,8) || p ) )
#[must_use]
pub fn h_tag(tag: &str, parts: &[&[u8]]) -> Hash256 {
    debug_assert!(
        constants::ALL_TAGS.contains(&tag),
        "unregistered tag used in registry hashing: {tag}"
    );
    let mut hasher = Sha3_256::new();
    hasher.update(tag.as_bytes());
    for p in parts {
        let len_le = le_bytes::<8>(p.len() as u128);
        hasher.update(len_le);
        hasher.update(p);
    }
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Plain SHA3-256 with no tag and no framing.
#[must_use]
pub fn sha3_256(data: &[u8]) -> Hash256 {
    let digest = Sha3_256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
