//! Brand → collection map enforcing one collection per brand.

use std::sync::Arc;

use claim_primitives::{constants, h_tag};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};

use crate::{
    collection::Collection,
    errors::ClaimError,
    events::{EventSink, RegistryEvent},
    types::{CollectionId, Identity, RegistryId},
    vault::RemintPolicy,
};

/// RegistryId = H("claim.registry.id", [name])
#[must_use]
pub fn registry_id(name: &str) -> RegistryId {
    RegistryId(h_tag(constants::TAG_REGISTRY_ID, &[name.as_bytes()]))
}

#[derive(Debug)]
pub struct CollectionRegistry {
    id: RegistryId,
    policy: RemintPolicy,
    by_brand: DashMap<Identity, CollectionId>,
    collections: DashMap<CollectionId, Arc<Collection>>,
}

impl CollectionRegistry {
    #[must_use]
    pub fn new(id: RegistryId, policy: RemintPolicy) -> Self {
        Self { id, policy, by_brand: DashMap::new(), collections: DashMap::new() }
    }

    #[must_use]
    pub const fn registry_id(&self) -> RegistryId {
        self.id
    }

    /// Create `brand`'s collection. Fails with `DuplicateCollection` if it already has one.
    pub fn create_collection(
        &self,
        brand: Identity,
        name: &str,
        description: &str,
        events: &dyn EventSink,
    ) -> Result<Arc<Collection>, ClaimError> {
        // The brand entry stays locked until the collection is reachable by id,
        // so a concurrent create for the same brand sees it as occupied.
        let collection = match self.by_brand.entry(brand) {
            Entry::Occupied(_) => {
                debug!(registry = %self.id, %brand, "create rejected: brand already has a collection");
                return Err(ClaimError::DuplicateCollection);
            }
            Entry::Vacant(slot) => {
                let collection = Arc::new(Collection::new(
                    &self.id,
                    brand,
                    name.to_owned(),
                    description.to_owned(),
                    self.policy,
                ));
                // Emitted before the collection is reachable, so it precedes every mint event.
                info!(registry = %self.id, collection = %collection.id(), %brand, name, "collection created");
                events.emit(RegistryEvent::CollectionCreated {
                    registry: self.id,
                    collection: collection.id(),
                    brand,
                    name: name.to_owned(),
                });
                self.collections.insert(collection.id(), Arc::clone(&collection));
                slot.insert(collection.id());
                collection
            }
        };
        Ok(collection)
    }

    #[must_use]
    pub fn get(&self, id: &CollectionId) -> Option<Arc<Collection>> {
        self.collections.get(id).map(|c| Arc::clone(c.value()))
    }

    #[must_use]
    pub fn collection_of(&self, brand: &Identity) -> Option<CollectionId> {
        self.by_brand.get(brand).map(|id| *id.value())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_brand.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_brand.is_empty()
    }
}
