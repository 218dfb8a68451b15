//! Proptest generators for property-based testing.

use proptest::prelude::*;

use certifier_core::ContentDigest;

/// Content payload bytes of up to `max_len`, including empty.
pub fn content(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Non-empty signature bytes, sized like RSA-2048 to RSA-4096 output.
pub fn signature_bytes() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..=512)
}

/// A random digest.
pub fn digest() -> impl Strategy<Value = ContentDigest> {
    any::<[u8; 32]>().prop_map(ContentDigest::from_bytes)
}

/// Text that is never valid standard base64.
pub fn malformed_base64() -> impl Strategy<Value = String> {
    "[A-Za-z0-9+/]{0,16}[!@#$%^&*]{1,4}"
}

/// Hex text of the wrong length for a digest.
pub fn wrong_length_hex() -> impl Strategy<Value = String> {
    prop::collection::vec(any::<u8>(), 0..64)
        .prop_filter("not digest length", |b| b.len() != 32)
        .prop_map(hex::encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use certifier_core::{decode_digest, decode_signature};

    proptest! {
        #[test]
        fn malformed_base64_never_decodes(text in malformed_base64()) {
            prop_assert!(decode_signature(&text).is_err());
        }

        #[test]
        fn wrong_length_hex_never_decodes(text in wrong_length_hex()) {
            prop_assert!(decode_digest(&text).is_err());
        }
    }
}
