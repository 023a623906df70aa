#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tonvault_crypto::{decrypt, decrypt_json};

#[derive(Debug, Arbitrary)]
struct EnvelopeInput {
    blob: Vec<u8>,
    encoded: String,
}

fuzz_target!(|input: EnvelopeInput| {
    // Malformed envelopes are errors, never panics
    let _ = decrypt(&input.blob, "fuzz");
    let _ = decrypt_json::<serde_json::Value>(&input.encoded, "fuzz");
});
