use claim_primitives::{constants::TAG_TX_BODY_V1, le_bytes, Pk32, Sig64};

use crate::{
    dispatch::{SignedTx, TxBody},
    errors::ClaimError,
    types::{CollectionId, CommitmentKey, DIGEST_LEN},
};

/// Cap on any text field (name, description, url), enforced on encode and decode.
pub const MAX_TEXT_LEN: usize = 4_096;
/// Cap on a presented secret, enforced on encode and decode.
pub const MAX_SECRET_LEN: usize = 1_024;

const KIND_CREATE_COLLECTION: u8 = 0;
const KIND_MINT: u8 = 1;
const KIND_CLAIM: u8 = 2;

const fn check_cap(len: usize, max: usize) -> Result<(), ClaimError> {
    if len > max {
        return Err(ClaimError::FieldTooLong { max, got: len });
    }
    Ok(())
}

#[inline]
fn put_var(out: &mut Vec<u8>, b: &[u8], max: usize) -> Result<(), ClaimError> {
    check_cap(b.len(), max)?;
    // Every cap is far below u32::MAX, so the length prefix is exact.
    out.extend_from_slice(&le_bytes::<4>(b.len() as u128));
    out.extend_from_slice(b);
    Ok(())
}

/// Canonical `TxBody` encoding, the exact bytes that get signed.
/// `TAG_TX_BODY_V1` || kind(1) || fields; fixed fields raw, variable fields `LE32(len)` || bytes.
///
/// # Errors
///
/// Returns `ClaimError::FieldTooLong` when a text field exceeds [`MAX_TEXT_LEN`] or the
/// secret exceeds [`MAX_SECRET_LEN`].
pub fn encode_tx(body: &TxBody) -> Result<Vec<u8>, ClaimError> {
    let mut out = Vec::with_capacity(TAG_TX_BODY_V1.len() + 1 + 2 * DIGEST_LEN + 64);
    out.extend_from_slice(TAG_TX_BODY_V1.as_bytes());
    match body {
        TxBody::CreateCollection { name, description } => {
            out.push(KIND_CREATE_COLLECTION);
            put_var(&mut out, name.as_bytes(), MAX_TEXT_LEN)?;
            put_var(&mut out, description.as_bytes(), MAX_TEXT_LEN)?;
        }
        TxBody::Mint { collection, commitment, name, description, url } => {
            out.push(KIND_MINT);
            out.extend_from_slice(&collection.0);
            out.extend_from_slice(&commitment.0);
            put_var(&mut out, name.as_bytes(), MAX_TEXT_LEN)?;
            put_var(&mut out, description.as_bytes(), MAX_TEXT_LEN)?;
            put_var(&mut out, url.as_bytes(), MAX_TEXT_LEN)?;
        }
        TxBody::Claim { collection, secret } => {
            out.push(KIND_CLAIM);
            out.extend_from_slice(&collection.0);
            put_var(&mut out, secret, MAX_SECRET_LEN)?;
        }
    }
    Ok(out)
}

fn read_exact<'a>(src: &mut &'a [u8], n: usize) -> Result<&'a [u8], ClaimError> {
    if src.len() < n {
        return Err(ClaimError::DecodeError("short input"));
    }
    let (a, b) = src.split_at(n);
    *src = b;
    Ok(a)
}

fn read_array<const N: usize>(src: &mut &[u8]) -> Result<[u8; N], ClaimError> {
    let mut a = [0u8; N];
    a.copy_from_slice(read_exact(src, N)?);
    Ok(a)
}

fn read_var<'a>(src: &mut &'a [u8], max: usize) -> Result<&'a [u8], ClaimError> {
    let len = u32::from_le_bytes(read_array::<4>(src)?) as usize;
    check_cap(len, max)?;
    read_exact(src, len)
}

fn read_text(src: &mut &[u8]) -> Result<String, ClaimError> {
    let raw = read_var(src, MAX_TEXT_LEN)?;
    core::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|_| ClaimError::DecodeError("text is not utf-8"))
}

/// Decode a `TxBody` from its canonical encoding.
///
/// # Errors
///
/// Returns `ClaimError::FieldTooLong` on an oversize field, and `ClaimError::DecodeError`
/// on a wrong version tag, unknown kind, non-UTF-8 text, short input or trailing bytes.
pub fn decode_tx(mut src: &[u8]) -> Result<TxBody, ClaimError> {
    if read_exact(&mut src, TAG_TX_BODY_V1.len())? != TAG_TX_BODY_V1.as_bytes() {
        return Err(ClaimError::DecodeError("invalid version tag"));
    }
    let body = match read_array::<1>(&mut src)?[0] {
        KIND_CREATE_COLLECTION => {
            let name = read_text(&mut src)?;
            let description = read_text(&mut src)?;
            TxBody::CreateCollection { name, description }
        }
        KIND_MINT => {
            let collection = CollectionId(read_array(&mut src)?);
            let commitment = CommitmentKey(read_array(&mut src)?);
            let name = read_text(&mut src)?;
            let description = read_text(&mut src)?;
            let url = read_text(&mut src)?;
            TxBody::Mint { collection, commitment, name, description, url }
        }
        KIND_CLAIM => {
            let collection = CollectionId(read_array(&mut src)?);
            let secret = read_var(&mut src, MAX_SECRET_LEN)?.to_vec();
            TxBody::Claim { collection, secret }
        }
        _ => return Err(ClaimError::DecodeError("unknown tx kind")),
    };
    if !src.is_empty() {
        return Err(ClaimError::DecodeError("trailing bytes"));
    }
    Ok(body)
}

/// Transport framing: signer(32) || sig(64) || LE64(nonce) || `encode_tx(body)`.
pub fn encode_signed_tx(tx: &SignedTx) -> Result<Vec<u8>, ClaimError> {
    let body = encode_tx(&tx.body)?;
    let mut out = Vec::with_capacity(32 + 64 + 8 + body.len());
    out.extend_from_slice(&tx.signer);
    out.extend_from_slice(&tx.sig);
    out.extend_from_slice(&le_bytes::<8>(u128::from(tx.nonce)));
    out.extend_from_slice(&body);
    Ok(out)
}

/// Decode transport bytes produced by [`encode_signed_tx`]. Does not verify the signature.
///
/// # Errors
///
/// Fails when the frame is short or the body fails to decode.
pub fn decode_signed_tx(mut src: &[u8]) -> Result<SignedTx, ClaimError> {
    let signer: Pk32 = read_array(&mut src)?;
    let sig: Sig64 = read_array(&mut src)?;
    let nonce = u64::from_le_bytes(read_array(&mut src)?);
    let body = decode_tx(src)?;
    Ok(SignedTx { signer, nonce, body, sig })
}
