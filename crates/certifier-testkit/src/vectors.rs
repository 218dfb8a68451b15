//! Golden test vectors.
//!
//! Every deployment must produce the same digest for the same content, and
//! the same certificate text for the same signer output.

/// A golden test vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Content payload.
    pub content: &'static [u8],
    /// Expected SHA-256 digest (lowercase hex).
    pub digest_hex: &'static str,
    /// Raw bytes the mock signer returns.
    pub signer_output: &'static [u8],
    /// Expected base64 certificate.
    pub certificate: &'static str,
}

/// Get all golden test vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        GoldenVector {
            name: "hello",
            content: b"hello",
            digest_hex: "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
            signer_output: &[0x01, 0x02],
            certificate: "AQI=",
        },
        GoldenVector {
            name: "empty content",
            content: b"",
            digest_hex: "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
            signer_output: &[0x00],
            certificate: "AA==",
        },
        GoldenVector {
            name: "pangram",
            content: b"The quick brown fox jumps over the lazy dog",
            digest_hex: "d7a8fbb307d7809469ca9abcb0082e4f8d5651e46d3cdb762d02d0bf37c9e592",
            signer_output: &[0xff, 0xff, 0xff],
            certificate: "////",
        },
    ]
}
