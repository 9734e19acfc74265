//! Signed transactions: the outer layer a chain dispatcher or RPC handler drives.
//!
//! The caller identity of every operation is the Ed25519 key that signed it.
//! Each signer has a nonce, starting at 0, and a transaction applies only when
//! it carries the signer's current nonce. The nonce advances when the operation
//! succeeds, so a signed transaction takes effect at most once, even a `Mint`
//! under [`crate::RemintPolicy::Allow`].

use claim_primitives::{constants, h_tag, le_bytes, Hash256, Pk32, Sig64};
use ed25519_dalek::{Signature, Signer, SigningKey, VerifyingKey};
use rand_core::CryptoRngCore;
use tracing::debug;

use crate::{
    errors::ClaimError,
    platform::Platform,
    ser::encode_tx,
    types::{ClaimedItem, CollectionId, CommitmentKey, Identity, ItemId, MintRequest},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxBody {
    CreateCollection {
        name: String,
        description: String,
    },
    Mint {
        collection: CollectionId,
        commitment: CommitmentKey,
        name: String,
        description: String,
        url: String,
    },
    Claim {
        collection: CollectionId,
        secret: Vec<u8>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTx {
    pub signer: Pk32,
    pub nonce: u64,
    pub body: TxBody,
    pub sig: Sig64,
}

/// Outcome of an applied transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Receipt {
    CollectionCreated { collection: CollectionId },
    Minted { collection: CollectionId, item: ItemId },
    Claimed { collection: CollectionId, claimed: ClaimedItem },
}

/// Message signed for a body: H("claim.tx.sig", [LE64(nonce), `encode_tx(body)`]).
pub fn tx_signing_message(nonce: u64, body: &TxBody) -> Result<Hash256, ClaimError> {
    let nonce_le = le_bytes::<8>(u128::from(nonce));
    Ok(h_tag(constants::TAG_TX_SIG, &[&nonce_le, &encode_tx(body)?]))
}

/// Sign `body` as the `nonce`-th transaction of `sk`'s identity.
pub fn sign_tx(sk: &SigningKey, nonce: u64, body: TxBody) -> Result<SignedTx, ClaimError> {
    let sig = sk.sign(&tx_signing_message(nonce, &body)?).to_bytes();
    Ok(SignedTx { signer: sk.verifying_key().to_bytes(), nonce, body, sig })
}

/// Fresh signing key for a brand or claimer.
pub fn generate_key<R: CryptoRngCore + ?Sized>(rng: &mut R) -> SigningKey {
    SigningKey::generate(rng)
}

#[must_use]
pub fn identity_of(vk: &VerifyingKey) -> Identity {
    Identity(vk.to_bytes())
}

/// Check the signature and return the signer's identity.
///
/// Oversize fields fail with `FieldTooLong` before any signature work.
pub fn verify_tx(tx: &SignedTx) -> Result<Identity, ClaimError> {
    let msg = tx_signing_message(tx.nonce, &tx.body)?;
    let vk = VerifyingKey::from_bytes(&tx.signer).map_err(|_| ClaimError::InvalidSignature)?;
    let sig = Signature::from_bytes(&tx.sig);
    vk.verify_strict(&msg, &sig).map_err(|_| ClaimError::InvalidSignature)?;
    Ok(identity_of(&vk))
}

impl Platform {
    /// Verify `tx`, check its nonce and run the operation it carries as its signer.
    ///
    /// The signer's nonce entry stays locked until the operation returns, so two
    /// transactions from one signer never both pass the nonce check.
    pub fn apply(&self, tx: &SignedTx) -> Result<Receipt, ClaimError> {
        let caller = verify_tx(tx).inspect_err(|err| {
            debug!(signer = %hex::encode(tx.signer), error = %err, "tx rejected");
        })?;
        let mut next = self.nonces.entry(caller).or_insert(0);
        if *next != tx.nonce {
            debug!(%caller, expected = *next, got = tx.nonce, "tx rejected: bad nonce");
            return Err(ClaimError::BadNonce { expected: *next, got: tx.nonce });
        }
        let receipt = self.dispatch(caller, &tx.body)?;
        *next += 1;
        Ok(receipt)
    }

    fn dispatch(&self, caller: Identity, body: &TxBody) -> Result<Receipt, ClaimError> {
        match body {
            TxBody::CreateCollection { name, description } => {
                let c = self.create_collection(caller, name, description)?;
                Ok(Receipt::CollectionCreated { collection: c.id() })
            }
            TxBody::Mint { collection, commitment, name, description, url } => {
                let item = self.mint(
                    caller,
                    collection,
                    MintRequest {
                        commitment: *commitment,
                        name: name.clone(),
                        description: description.clone(),
                        url: url.clone(),
                    },
                )?;
                Ok(Receipt::Minted { collection: *collection, item })
            }
            TxBody::Claim { collection, secret } => {
                let claimed = self.claim(caller, collection, secret)?;
                Ok(Receipt::Claimed { collection: *collection, claimed })
            }
        }
    }
}
