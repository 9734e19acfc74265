//! Signed transactions driving the full create → mint → claim pipeline.

use std::sync::Arc;

use claim_registry::*;
use ed25519_dalek::SigningKey;
use rand_core::OsRng;

fn platform_with(remint: RemintPolicy) -> (Platform, Arc<EventLog>) {
    let log = Arc::new(EventLog::new());
    let cfg = PlatformConfig { remint, ..PlatformConfig::default() };
    (Platform::new(&cfg, log.clone()), log)
}

fn platform() -> (Platform, Arc<EventLog>) {
    platform_with(RemintPolicy::default())
}

fn create(brand: &SigningKey, nonce: u64) -> SignedTx {
    sign_tx(brand, nonce, TxBody::CreateCollection { name: "Gold".into(), description: "desc".into() }).unwrap()
}

fn mint(brand: &SigningKey, nonce: u64, collection: CollectionId, commitment: CommitmentKey) -> SignedTx {
    sign_tx(
        brand,
        nonce,
        TxBody::Mint {
            collection,
            commitment,
            name: "Bar#1".into(),
            description: "24k bar".into(),
            url: "https://img/1".into(),
        },
    )
    .unwrap()
}

fn claim(claimer: &SigningKey, nonce: u64, collection: CollectionId, secret: &[u8]) -> SignedTx {
    sign_tx(claimer, nonce, TxBody::Claim { collection, secret: secret.to_vec() }).unwrap()
}

fn who(sk: &SigningKey) -> Identity {
    identity_of(&sk.verifying_key())
}

#[test]
fn signed_pipeline_round_trip() {
    let (p, log) = platform();
    let brand = generate_key(&mut OsRng);
    let alice = generate_key(&mut OsRng);

    let Receipt::CollectionCreated { collection } = p.apply(&create(&brand, 0)).unwrap() else {
        panic!("expected CollectionCreated");
    };
    let Receipt::Minted { item, .. } = p.apply(&mint(&brand, 1, collection, p.commit(b"SECRET1"))).unwrap() else {
        panic!("expected Minted");
    };
    let Receipt::Claimed { claimed, .. } = p.apply(&claim(&alice, 0, collection, b"SECRET1")).unwrap() else {
        panic!("expected Claimed");
    };
    assert_eq!(claimed.item.id, item);
    assert_eq!(claimed.owner, who(&alice));
    assert_eq!(claimed.item.creator, who(&brand));
    assert_eq!(log.len(), 3);
    assert_eq!(p.nonce_of(&who(&brand)), 2);
    assert_eq!(p.nonce_of(&who(&alice)), 1);

    // Fresh nonces still hit the one-time rules of each operation.
    assert_eq!(p.apply(&create(&brand, 2)), Err(ClaimError::DuplicateCollection));
    assert_eq!(
        p.apply(&mint(&brand, 2, collection, p.commit(b"SECRET1"))),
        Err(ClaimError::CommitmentConsumed)
    );
    assert_eq!(p.apply(&claim(&alice, 1, collection, b"SECRET1")), Err(ClaimError::InvalidSecret));
    assert_eq!(log.len(), 3);
}

#[test]
fn replayed_transactions_are_rejected() {
    let (p, log) = platform();
    let brand = generate_key(&mut OsRng);
    let alice = generate_key(&mut OsRng);
    let create_tx = create(&brand, 0);
    let Ok(Receipt::CollectionCreated { collection }) = p.apply(&create_tx) else {
        panic!("expected CollectionCreated");
    };
    let mint_tx = mint(&brand, 1, collection, p.commit(b"SECRET1"));
    let claim_tx = claim(&alice, 0, collection, b"SECRET1");
    p.apply(&mint_tx).unwrap();
    p.apply(&claim_tx).unwrap();

    assert_eq!(p.apply(&create_tx), Err(ClaimError::BadNonce { expected: 2, got: 0 }));
    assert_eq!(p.apply(&mint_tx), Err(ClaimError::BadNonce { expected: 2, got: 1 }));
    assert_eq!(p.apply(&claim_tx), Err(ClaimError::BadNonce { expected: 1, got: 0 }));
    assert_eq!(log.len(), 3);
}

#[test]
fn replayed_mint_cannot_revive_a_claimed_item_under_allow() {
    let (p, log) = platform_with(RemintPolicy::Allow);
    let brand = generate_key(&mut OsRng);
    let alice = generate_key(&mut OsRng);
    let mallory = generate_key(&mut OsRng);
    let Ok(Receipt::CollectionCreated { collection }) = p.apply(&create(&brand, 0)) else {
        panic!("expected CollectionCreated");
    };
    let key = p.commit(b"SECRET1");
    let mint_tx = mint(&brand, 1, collection, key);
    p.apply(&mint_tx).unwrap();
    // Alice's claim puts the plaintext secret on the wire.
    p.apply(&claim(&alice, 0, collection, b"SECRET1")).unwrap();

    assert_eq!(p.apply(&mint_tx), Err(ClaimError::BadNonce { expected: 2, got: 1 }));
    assert!(!p.collection(&collection).unwrap().is_claimable(&key));
    assert_eq!(p.apply(&claim(&mallory, 0, collection, b"SECRET1")), Err(ClaimError::InvalidSecret));
    assert_eq!(log.len(), 3);

    // The brand itself may still re-mint with a fresh signature.
    assert!(matches!(p.apply(&mint(&brand, 2, collection, key)), Ok(Receipt::Minted { .. })));
    assert!(p.collection(&collection).unwrap().is_claimable(&key));
}

#[test]
fn out_of_order_nonce_is_rejected() {
    let (p, _log) = platform();
    let brand = generate_key(&mut OsRng);
    assert_eq!(p.apply(&create(&brand, 1)), Err(ClaimError::BadNonce { expected: 0, got: 1 }));
    assert!(p.registry().is_empty());
    assert_eq!(p.nonce_of(&who(&brand)), 0);
}

#[test]
fn forged_mint_is_unauthorized() {
    let (p, _log) = platform();
    let brand = generate_key(&mut OsRng);
    let mallory = generate_key(&mut OsRng);
    let Ok(Receipt::CollectionCreated { collection }) = p.apply(&create(&brand, 0)) else {
        panic!("expected CollectionCreated");
    };
    assert_eq!(
        p.apply(&mint(&mallory, 0, collection, p.commit(b"X"))),
        Err(ClaimError::Unauthorized)
    );
}

#[test]
fn tampered_transaction_is_rejected_before_dispatch() {
    let (p, log) = platform();
    let brand = generate_key(&mut OsRng);
    let mut tx = create(&brand, 0);
    tx.sig[0] ^= 0x01;
    assert_eq!(p.apply(&tx), Err(ClaimError::InvalidSignature));
    assert!(p.registry().is_empty());
    assert!(log.is_empty());
}

#[test]
fn oversize_fields_are_rejected_without_the_codec() {
    let (p, log) = platform();
    let alice = generate_key(&mut OsRng);
    let tx = SignedTx {
        signer: alice.verifying_key().to_bytes(),
        nonce: 0,
        body: TxBody::Claim { collection: CollectionId([1u8; 32]), secret: vec![7u8; MAX_SECRET_LEN + 1] },
        sig: [0u8; 64],
    };
    assert_eq!(
        p.apply(&tx),
        Err(ClaimError::FieldTooLong { max: MAX_SECRET_LEN, got: MAX_SECRET_LEN + 1 })
    );
    assert!(matches!(
        sign_tx(&alice, 0, tx.body.clone()),
        Err(ClaimError::FieldTooLong { .. })
    ));
    assert_eq!(p.nonce_of(&who(&alice)), 0);
    assert!(log.is_empty());
}

#[test]
fn transport_bytes_apply_after_decode() {
    let (p, _log) = platform();
    let brand = SigningKey::from_bytes(&[7u8; 32]);
    let wire = encode_signed_tx(&create(&brand, 0)).unwrap();
    let tx = decode_signed_tx(&wire).unwrap();
    assert!(matches!(p.apply(&tx), Ok(Receipt::CollectionCreated { .. })));
    assert_eq!(p.apply(&tx), Err(ClaimError::BadNonce { expected: 1, got: 0 }));
}
