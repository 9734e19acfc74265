//! Fire-and-forget notifications for external observers.
//!
//! Nothing in the registry reads these back. Sinks are called once the
//! emitting operation can no longer fail. Mint and claim events are emitted
//! while the commitment's vault entry is locked, so for one key `NftMinted`
//! always precedes the `NftClaimed` of that item. Events for different keys
//! may interleave in any order.
//!
//! A sink must not call back into the registry.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tracing::info;

use crate::types::{CollectionId, CommitmentKey, Identity, ItemId, RegistryId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum RegistryEvent {
    CollectionCreated {
        registry: RegistryId,
        collection: CollectionId,
        brand: Identity,
        name: String,
    },
    /// Carries the commitment only; the plaintext never reaches mint.
    NftMinted {
        collection: CollectionId,
        commitment: CommitmentKey,
    },
    NftClaimed {
        collection: CollectionId,
        item: ItemId,
        claimer: Identity,
    },
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: RegistryEvent);
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: RegistryEvent) {}
}

/// Writes each event as a structured `tracing` record under the `claim_registry::events` target.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: RegistryEvent) {
        match event {
            RegistryEvent::CollectionCreated { registry, collection, brand, name } => {
                info!(target: "claim_registry::events", %registry, %collection, %brand, %name, "CollectionCreated");
            }
            RegistryEvent::NftMinted { collection, commitment } => {
                info!(target: "claim_registry::events", %collection, %commitment, "NftMinted");
            }
            RegistryEvent::NftClaimed { collection, item, claimer } => {
                info!(target: "claim_registry::events", %collection, %item, %claimer, "NftClaimed");
            }
        }
    }
}

/// Append-only in-memory log.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<RegistryEvent>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // A poisoned log is still usable; pushes never leave the Vec half-written.
    fn entries(&self) -> MutexGuard<'_, Vec<RegistryEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of everything emitted so far, in emission order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<RegistryEvent> {
        self.entries().clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: RegistryEvent) {
        self.entries().push(event);
    }
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn emit(&self, event: RegistryEvent) {
        (**self).emit(event);
    }
}
