//! Wire codec for signatures and digests.
//!
//! - Signatures: standard base64 with padding.
//! - Digests: lowercase hex, exactly [`DIGEST_LEN`] bytes.
//!
//! Decoding validates format before anything leaves the process. Encoding
//! never fails.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::digest::{ContentDigest, DIGEST_LEN};
use crate::error::{CodecError, Result};

/// Encode raw signature bytes as base64.
pub fn encode_signature(signature: &[u8]) -> String {
    STANDARD.encode(signature)
}

/// Decode base64 signature text.
///
/// Empty text is rejected: no authority accepts an empty signature.
pub fn decode_signature(text: &str) -> Result<Vec<u8>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CodecError::malformed("signature", "empty"));
    }
    STANDARD
        .decode(text)
        .map_err(|e| CodecError::malformed("signature", e.to_string()))
}

/// Encode a digest as lowercase hex.
pub fn encode_digest(digest: &ContentDigest) -> String {
    digest.to_hex()
}

/// Decode hex digest text. Accepts either case.
pub fn decode_digest(text: &str) -> Result<ContentDigest> {
    let text = text.trim();
    if text.len() != DIGEST_LEN * 2 {
        return Err(CodecError::malformed(
            "digest",
            format!("expected {} hex characters, got {}", DIGEST_LEN * 2, text.len()),
        ));
    }
    let mut bytes = [0u8; DIGEST_LEN];
    hex::decode_to_slice(text, &mut bytes)
        .map_err(|e| CodecError::malformed("digest", e.to_string()))?;
    Ok(ContentDigest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_signature_known_vector() {
        assert_eq!(encode_signature(&[0x01, 0x02]), "AQI=");
        assert_eq!(decode_signature("AQI=").unwrap(), vec![0x01, 0x02]);
    }

    #[test]
    fn test_signature_rejects_garbage() {
        let err = decode_signature("not base64!!").unwrap_err();
        assert_eq!(err.field(), "signature");
        assert!(decode_signature("AQI").is_err());
    }

    #[test]
    fn test_signature_rejects_empty() {
        assert!(decode_signature("").is_err());
        assert!(decode_signature("   ").is_err());
    }

    #[test]
    fn test_signature_trims_whitespace() {
        assert_eq!(decode_signature("AQI=\n").unwrap(), vec![0x01, 0x02]);
    }

    #[test]
    fn test_digest_decode_hello() {
        let hex = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        let digest = decode_digest(hex).unwrap();
        assert_eq!(digest, ContentDigest::of(b"hello"));
        assert_eq!(encode_digest(&digest), hex);
    }

    #[test]
    fn test_digest_accepts_uppercase() {
        let upper = "2CF24DBA5FB0A30E26E83B2AC5B9E29E1B161E5C1FA7425E73043362938B9824";
        assert_eq!(decode_digest(upper).unwrap(), ContentDigest::of(b"hello"));
    }

    #[test]
    fn test_digest_rejects_wrong_length() {
        assert!(decode_digest("abcd").is_err());
        assert!(decode_digest(&"ab".repeat(33)).is_err());
        assert!(decode_digest("").is_err());
    }

    #[test]
    fn test_digest_rejects_non_hex() {
        let err = decode_digest(&"zz".repeat(32)).unwrap_err();
        assert_eq!(err.field(), "digest");
    }

    proptest! {
        #[test]
        fn signature_roundtrip(bytes in prop::collection::vec(any::<u8>(), 1..600)) {
            let text = encode_signature(&bytes);
            prop_assert_eq!(decode_signature(&text).unwrap(), bytes);
        }

        #[test]
        fn digest_roundtrip(bytes in any::<[u8; 32]>()) {
            let digest = ContentDigest::from_bytes(bytes);
            let text = encode_digest(&digest);
            prop_assert_eq!(text.clone(), text.to_lowercase());
            prop_assert_eq!(decode_digest(&text).unwrap(), digest);
        }
    }
}
