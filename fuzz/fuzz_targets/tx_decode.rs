#![no_main]

use claim_registry::{decode_tx, encode_tx};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Encoding is canonical: anything that decodes re-encodes to the same bytes.
    if let Ok(body) = decode_tx(data) {
        assert_eq!(encode_tx(&body).as_deref(), Ok(data));
    }
});
