#![forbid(unsafe_code)]

pub const TAG_REGISTRY_ID: &str = "claim.registry.id";
pub const TAG_COLLECTION_ID: &str = "claim.collection.id";
pub const TAG_ITEM_ID: &str = "claim.item.id";

pub const TAG_TX_BODY_V1: &str = "claim.tx.body.v1";
pub const TAG_TX_SIG: &str = "claim.tx.sig";

/// Every tag accepted by [`crate::h_tag`].
pub const ALL_TAGS: &[&str] = &[
    TAG_REGISTRY_ID,
    TAG_COLLECTION_ID,
    TAG_ITEM_ID,
    TAG_TX_BODY_V1,
    TAG_TX_SIG,
];
