use std::sync::atomic::{AtomicU64, Ordering};

use claim_primitives::{constants, h_tag, le_bytes};
use tracing::{debug, info};

use crate::{
    errors::ClaimError,
    events::{EventSink, RegistryEvent},
    hashers::HashCommitment,
    types::{ClaimedItem, CollectionId, CommitmentKey, Identity, Item, ItemId, MintRequest, RegistryId},
    vault::{ClaimVault, RemintPolicy},
};

/// CollectionId = H("claim.collection.id", [registry_id, brand])
#[must_use]
pub fn collection_id(registry: &RegistryId, brand: &Identity) -> CollectionId {
    CollectionId(h_tag(constants::TAG_COLLECTION_ID, &[&registry.0, &brand.0]))
}

/// ItemId = H("claim.item.id", [collection_id, LE64(sequence)])
#[must_use]
pub fn item_id(collection: &CollectionId, sequence: u64) -> ItemId {
    ItemId(h_tag(
        constants::TAG_ITEM_ID,
        &[&collection.0, &le_bytes::<8>(u128::from(sequence))],
    ))
}

/// A brand's collection. Creator, name and description never change after creation.
#[derive(Debug)]
pub struct Collection {
    id: CollectionId,
    creator: Identity,
    name: String,
    description: String,
    vault: ClaimVault,
    next_sequence: AtomicU64,
}

impl Collection {
    #[must_use]
    pub fn new(
        registry: &RegistryId,
        creator: Identity,
        name: String,
        description: String,
        policy: RemintPolicy,
    ) -> Self {
        Self {
            id: collection_id(registry, &creator),
            creator,
            name,
            description,
            vault: ClaimVault::new(policy),
            next_sequence: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub const fn id(&self) -> CollectionId {
        self.id
    }

    #[must_use]
    pub const fn creator(&self) -> Identity {
        self.creator
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn vault(&self) -> &ClaimVault {
        &self.vault
    }

    /// Mint an item under `req.commitment`. Only the creator may mint.
    ///
    /// The commitment is stored exactly as given; nothing is hashed here.
    pub fn mint(
        &self,
        caller: Identity,
        req: MintRequest,
        events: &dyn EventSink,
    ) -> Result<ItemId, ClaimError> {
        if caller != self.creator {
            debug!(collection = %self.id, %caller, "mint rejected: not the creator");
            return Err(ClaimError::Unauthorized);
        }
        let MintRequest { commitment, name, description, url } = req;
        self.vault.insert_with(
            commitment,
            || Item {
                id: item_id(&self.id, self.next_sequence.fetch_add(1, Ordering::Relaxed)),
                name,
                description,
                url,
                creator: caller,
            },
            |item| {
                info!(collection = %self.id, item = %item.id, %commitment, "item minted");
                events.emit(RegistryEvent::NftMinted { collection: self.id, commitment });
            },
        )
    }

    /// Redeem the item committed to by `secret` and hand it to `caller`.
    ///
    /// No identity check: knowing the secret is the authorization.
    pub fn claim<H: HashCommitment + ?Sized>(
        &self,
        caller: Identity,
        secret: &[u8],
        hasher: &H,
        events: &dyn EventSink,
    ) -> Result<ClaimedItem, ClaimError> {
        let item = self
            .vault
            .claim_take_with(hasher, secret, |item| {
                info!(collection = %self.id, item = %item.id, claimer = %caller, "item claimed");
                events.emit(RegistryEvent::NftClaimed { collection: self.id, item: item.id, claimer: caller });
            })
            .inspect_err(|_| {
                debug!(collection = %self.id, %caller, "claim rejected: invalid secret");
            })?;
        Ok(ClaimedItem { owner: caller, item })
    }

    #[must_use]
    pub fn is_claimable(&self, key: &CommitmentKey) -> bool {
        self.vault.is_claimable(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventLog;
    use crate::hashers::Sha3Commitment;

    const BRAND: Identity = Identity([0xA1; 32]);
    const OTHER: Identity = Identity([0xB2; 32]);

    fn gold() -> Collection {
        Collection::new(
            &RegistryId([0u8; 32]),
            BRAND,
            "Gold".into(),
            "desc".into(),
            RemintPolicy::Reject,
        )
    }

    fn bar(commitment: CommitmentKey) -> MintRequest {
        MintRequest {
            commitment,
            name: "Bar#1".into(),
            description: "24k bar".into(),
            url: "https://img/1".into(),
        }
    }

    #[test]
    fn non_creator_cannot_mint() {
        let c = gold();
        let log = EventLog::new();
        let key = Sha3Commitment.commit(b"SECRET1");
        assert_eq!(c.mint(OTHER, bar(key), &log), Err(ClaimError::Unauthorized));
        assert!(!c.is_claimable(&key));
        assert!(log.is_empty());
    }

    #[test]
    fn minted_items_get_distinct_ids() {
        let c = gold();
        let log = EventLog::new();
        let a = c.mint(BRAND, bar(CommitmentKey([1u8; 32])), &log).unwrap();
        let b = c.mint(BRAND, bar(CommitmentKey([2u8; 32])), &log).unwrap();
        assert_ne!(a, b);
        assert_eq!(a, item_id(&c.id(), 0));
        assert_eq!(b, item_id(&c.id(), 1));
    }

    #[test]
    fn failed_mint_does_not_consume_a_sequence_number() {
        let c = gold();
        let log = EventLog::new();
        let key = CommitmentKey([1u8; 32]);
        c.mint(BRAND, bar(key), &log).unwrap();
        assert_eq!(c.mint(BRAND, bar(key), &log), Err(ClaimError::DuplicateCommitment));
        let next = c.mint(BRAND, bar(CommitmentKey([2u8; 32])), &log).unwrap();
        assert_eq!(next, item_id(&c.id(), 1));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn claim_transfers_to_caller_and_emits() {
        let c = gold();
        let log = EventLog::new();
        let id = c.mint(BRAND, bar(Sha3Commitment.commit(b"SECRET1")), &log).unwrap();
        let claimed = c.claim(OTHER, b"SECRET1", &Sha3Commitment, &log).unwrap();
        assert_eq!(claimed.owner, OTHER);
        assert_eq!(claimed.item.id, id);
        assert_eq!(claimed.item.creator, BRAND);
        assert_eq!(
            log.snapshot().last(),
            Some(&RegistryEvent::NftClaimed { collection: c.id(), item: id, claimer: OTHER })
        );
    }

    #[test]
    fn collection_id_is_per_brand() {
        let r = RegistryId([9u8; 32]);
        assert_ne!(collection_id(&r, &BRAND), collection_id(&r, &OTHER));
        assert_ne!(collection_id(&r, &BRAND), collection_id(&RegistryId([8u8; 32]), &BRAND));
    }
}
