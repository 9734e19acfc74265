#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

//! Claim Registry
//!
//! A commit-reveal registry: a brand creates exactly one collection, mints items
//! into it under the hash of a secret code, and whoever presents the plaintext
//! code redeems the item, once.
//!
//! Trust assumption: knowing the plaintext secret *is* the authorization to claim.
//! No identity check is made on the claimer.

// Fixed choices:
// - Commitment hash: SHA3-256 of the raw secret (BLAKE3 selectable)
// - Identifiers: domain-tagged, length-framed SHA3-256 ("claim.*" tags)
// - Transaction signatures: Ed25519, strict verification, per-signer nonces
// - Re-mint after claim: rejected unless configured otherwise

// Core modules
pub mod types;
pub mod errors;
pub mod hashers;
pub mod vault;
pub mod collection;
pub mod registry;
pub mod events;
pub mod config;
pub mod platform;
pub mod ser;
pub mod dispatch;

// Re-export commonly used types and functions
pub use types::*;
pub use errors::{ClaimError, ConfigError};
pub use hashers::{Blake3Commitment, HashAlgorithm, HashCommitment, Sha3Commitment};
pub use vault::{ClaimVault, RemintPolicy};
pub use collection::{collection_id, item_id, Collection};
pub use registry::{registry_id, CollectionRegistry};
pub use events::{EventLog, EventSink, NullSink, RegistryEvent, TracingSink};
pub use config::PlatformConfig;
pub use platform::Platform;
pub use ser::{decode_signed_tx, decode_tx, encode_signed_tx, encode_tx, MAX_SECRET_LEN, MAX_TEXT_LEN};
pub use dispatch::{generate_key, identity_of, sign_tx, tx_signing_message, verify_tx, Receipt, SignedTx, TxBody};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
