//! The process-wide container: one registry, one hash, one event sink.
//!
//! Built once at bootstrap and shared by reference (or `Arc`) with every
//! caller; there is no global instance.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use crate::{
    collection::Collection,
    config::PlatformConfig,
    errors::ClaimError,
    events::{EventSink, TracingSink},
    hashers::{HashAlgorithm, HashCommitment},
    registry::{registry_id, CollectionRegistry},
    types::{ClaimedItem, CollectionId, CommitmentKey, Identity, ItemId, MintRequest},
};

pub struct Platform {
    registry: CollectionRegistry,
    hash: HashAlgorithm,
    events: Arc<dyn EventSink>,
    /// Next nonce each signer must use; see [`Self::apply`].
    pub(crate) nonces: DashMap<Identity, u64>,
}

impl Platform {
    #[must_use]
    pub fn new(config: &PlatformConfig, events: Arc<dyn EventSink>) -> Self {
        let id = registry_id(&config.registry_name);
        info!(registry = %id, name = %config.registry_name, hash = ?config.hash, remint = ?config.remint, "platform initialised");
        Self {
            registry: CollectionRegistry::new(id, config.remint),
            hash: config.hash,
            events,
            nonces: DashMap::new(),
        }
    }

    /// Default configuration, events written to `tracing`.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(&PlatformConfig::default(), Arc::new(TracingSink))
    }

    #[must_use]
    pub const fn registry(&self) -> &CollectionRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash
    }

    /// Nonce the next signed transaction from `signer` must carry.
    #[must_use]
    pub fn nonce_of(&self, signer: &Identity) -> u64 {
        self.nonces.get(signer).map_or(0, |n| *n)
    }

    /// The key `claim` will look up for `secret`. For brands producing commitments in-process.
    #[must_use]
    pub fn commit(&self, secret: &[u8]) -> CommitmentKey {
        self.hash.commit(secret)
    }

    pub fn create_collection(
        &self,
        caller: Identity,
        name: &str,
        description: &str,
    ) -> Result<Arc<Collection>, ClaimError> {
        self.registry.create_collection(caller, name, description, self.events.as_ref())
    }

    pub fn collection(&self, id: &CollectionId) -> Result<Arc<Collection>, ClaimError> {
        self.registry.get(id).ok_or(ClaimError::UnknownCollection)
    }

    pub fn mint(
        &self,
        caller: Identity,
        collection: &CollectionId,
        req: MintRequest,
    ) -> Result<ItemId, ClaimError> {
        self.collection(collection)?.mint(caller, req, self.events.as_ref())
    }

    /// Anyone presenting the right secret may claim; the secret is the authorization.
    pub fn claim(
        &self,
        caller: Identity,
        collection: &CollectionId,
        secret: &[u8],
    ) -> Result<ClaimedItem, ClaimError> {
        self.collection(collection)?.claim(caller, secret, &self.hash, self.events.as_ref())
    }
}
