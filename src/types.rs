use core::fmt;

use claim_primitives::{Hash256, Pk32};
use serde::{Serialize, Serializer};

use crate::errors::ClaimError;

pub const DIGEST_LEN: usize = 32;

// Fixed-size newtypes prevent misuse
macro_rules! digest_newtype {
    ($(#[$meta:meta])* $t:ident, $inner:ty) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $t(pub $inner);

        impl $t {
            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
                &self.0
            }
        }

        impl From<$inner> for $t {
            fn from(b: $inner) -> Self {
                Self(b)
            }
        }

        // Exact-sized decode helper
        impl TryFrom<&[u8]> for $t {
            type Error = ClaimError;
            fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
                if b.len() != DIGEST_LEN {
                    return Err(ClaimError::InvalidLength { expected: DIGEST_LEN, got: b.len() });
                }
                let mut arr = [0u8; DIGEST_LEN];
                arr.copy_from_slice(b);
                Ok(Self(arr))
            }
        }

        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl fmt::Debug for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($t), hex::encode(self.0))
            }
        }

        impl Serialize for $t {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }
    };
}

digest_newtype!(
    /// Identity of a calling party: a brand, a claimer, or any signer.
    Identity, Pk32
);
digest_newtype!(
    /// Digest standing in for a plaintext secret. Opaque; only compared for equality.
    CommitmentKey, Hash256
);
digest_newtype!(RegistryId, Hash256);
digest_newtype!(CollectionId, Hash256);
digest_newtype!(ItemId, Hash256);

/// The record minted into a vault. Immutable once constructed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    /// Not checked for reachability or syntax.
    pub url: String,
    pub creator: Identity,
}

/// An item after redemption, held solely by `owner`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClaimedItem {
    pub owner: Identity,
    pub item: Item,
}

/// Fields supplied by a brand when minting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintRequest {
    pub commitment: CommitmentKey,
    pub name: String,
    pub description: String,
    pub url: String,
}
