//! Per-collection store from commitment key to an unclaimed item.
//!
//! Every key moves through `ABSENT -> MINTED -> CLAIMED`. The move to `CLAIMED`
//! happens under the same shard lock as the lookup, so of any number of
//! concurrent claims presenting one secret exactly one takes the item.
//!
//! The `on_insert`/`on_take` hooks run while the key's entry is still locked.
//! Whatever they record for one key therefore lands in transition order.
//! Hooks must not call back into the vault.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    errors::ClaimError,
    hashers::HashCommitment,
    types::{CommitmentKey, Item, ItemId},
};

/// What a vault does with a key whose item has been claimed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemintPolicy {
    /// Keep a tombstone; minting under the key again fails with `CommitmentConsumed`.
    #[default]
    Reject,
    /// Drop the key entirely; it may be minted again.
    Allow,
}

#[derive(Debug)]
enum Slot {
    Minted(Item),
    Consumed,
}

#[derive(Debug, Default)]
pub struct ClaimVault {
    slots: DashMap<CommitmentKey, Slot>,
    policy: RemintPolicy,
}

impl ClaimVault {
    #[must_use]
    pub fn new(policy: RemintPolicy) -> Self {
        Self { slots: DashMap::new(), policy }
    }

    #[must_use]
    pub const fn policy(&self) -> RemintPolicy {
        self.policy
    }

    /// Store `item` under `key`. Never overwrites.
    pub fn insert(&self, key: CommitmentKey, item: Item) -> Result<ItemId, ClaimError> {
        self.insert_with(key, || item, |_| {})
    }

    /// Like [`Self::insert`], but `make` runs only once the key is known to be free,
    /// and `on_insert` sees the stored item before the entry is unlocked.
    /// A rejected insert leaves no trace and runs neither.
    pub fn insert_with(
        &self,
        key: CommitmentKey,
        make: impl FnOnce() -> Item,
        on_insert: impl FnOnce(&Item),
    ) -> Result<ItemId, ClaimError> {
        match self.slots.entry(key) {
            Entry::Vacant(v) => {
                let item = make();
                let id = item.id;
                let slot = v.insert(Slot::Minted(item));
                if let Slot::Minted(item) = &*slot {
                    on_insert(item);
                }
                Ok(id)
            }
            Entry::Occupied(o) => {
                let err = match o.get() {
                    Slot::Minted(_) => ClaimError::DuplicateCommitment,
                    Slot::Consumed => ClaimError::CommitmentConsumed,
                };
                debug!(commitment = %key, error = %err, "vault insert rejected");
                Err(err)
            }
        }
    }

    /// Hash `secret` and take the item stored under the result.
    ///
    /// A wrong secret and an already claimed one both yield `InvalidSecret`.
    pub fn claim_take<H: HashCommitment + ?Sized>(
        &self,
        hasher: &H,
        secret: &[u8],
    ) -> Result<Item, ClaimError> {
        self.claim_take_with(hasher, secret, |_| {})
    }

    /// Like [`Self::claim_take`]; `on_take` sees the item before the entry is unlocked.
    pub fn claim_take_with<H: HashCommitment + ?Sized>(
        &self,
        hasher: &H,
        secret: &[u8],
        on_take: impl FnOnce(&Item),
    ) -> Result<Item, ClaimError> {
        let key = hasher.commit(secret);
        self.take(&key, on_take)
    }

    fn take(&self, key: &CommitmentKey, on_take: impl FnOnce(&Item)) -> Result<Item, ClaimError> {
        let Entry::Occupied(mut entry) = self.slots.entry(*key) else {
            return Err(ClaimError::InvalidSecret);
        };
        let Slot::Minted(item) = entry.get() else {
            return Err(ClaimError::InvalidSecret);
        };
        on_take(item);
        let taken = match self.policy {
            RemintPolicy::Allow => entry.remove(),
            RemintPolicy::Reject => std::mem::replace(entry.get_mut(), Slot::Consumed),
        };
        match taken {
            Slot::Minted(item) => Ok(item),
            Slot::Consumed => Err(ClaimError::InvalidSecret),
        }
    }

    /// True while an unclaimed item sits under `key`.
    #[must_use]
    pub fn is_claimable(&self, key: &CommitmentKey) -> bool {
        self.slots.get(key).is_some_and(|slot| matches!(*slot, Slot::Minted(_)))
    }

    /// True once the item under `key` has been claimed. Always false under [`RemintPolicy::Allow`].
    #[must_use]
    pub fn is_consumed(&self, key: &CommitmentKey) -> bool {
        self.slots.get(key).is_some_and(|slot| matches!(*slot, Slot::Consumed))
    }

    /// Number of unclaimed items.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|e| matches!(e.value(), Slot::Minted(_))).count()
    }
}
