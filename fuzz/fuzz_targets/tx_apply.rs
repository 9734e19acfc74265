#![no_main]

use std::sync::Arc;

use claim_registry::{
    decode_signed_tx, sign_tx, NullSink, Platform, PlatformConfig, Receipt, RemintPolicy, TxBody,
    MAX_SECRET_LEN,
};
use ed25519_dalek::SigningKey;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let cfg = PlatformConfig { remint: RemintPolicy::Allow, ..PlatformConfig::default() };
    let p = Platform::new(&cfg, Arc::new(NullSink));

    // Raw transport bytes must never panic, whatever they decode to.
    if let Ok(tx) = decode_signed_tx(data) {
        let _ = p.apply(&tx);
    }

    // Signed pipeline with the input as the secret: the claim succeeds exactly once,
    // and replaying the mint cannot bring the item back.
    let brand = SigningKey::from_bytes(&[1u8; 32]);
    let claimer = SigningKey::from_bytes(&[2u8; 32]);
    let create = TxBody::CreateCollection { name: "fuzz".into(), description: String::new() };
    let Ok(Receipt::CollectionCreated { collection }) = p.apply(&sign_tx(&brand, 0, create).unwrap()) else {
        return;
    };
    let Ok(mint) = sign_tx(
        &brand,
        1,
        TxBody::Mint {
            collection,
            commitment: p.commit(data),
            name: "item".into(),
            description: String::new(),
            url: String::new(),
        },
    ) else {
        return;
    };
    assert!(p.apply(&mint).is_ok());
    let claim = TxBody::Claim { collection, secret: data.to_vec() };
    if data.len() > MAX_SECRET_LEN {
        assert!(sign_tx(&claimer, 0, claim).is_err());
        return;
    }
    let claim = sign_tx(&claimer, 0, claim).unwrap();
    assert!(p.apply(&claim).is_ok());
    assert!(p.apply(&claim).is_err());
    assert!(p.apply(&mint).is_err());
    assert!(!p.collection(&collection).unwrap().is_claimable(&p.commit(data)));
});
