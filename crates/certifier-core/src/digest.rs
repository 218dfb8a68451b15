//! Content digests.
//!
//! The signing authority signs and verifies SHA-256 digests, never raw
//! content. Every signature issued so far is bound to this exact function.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of a [`ContentDigest`] in bytes.
pub const DIGEST_LEN: usize = 32;

/// A 32-byte SHA-256 digest of a content payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest(pub [u8; DIGEST_LEN]);

impl ContentDigest {
    /// Compute the digest of `content`. Infallible, including for empty input.
    pub fn of(content: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

/// Compute the digest of `content`.
pub fn digest(content: &[u8]) -> ContentDigest {
    ContentDigest::of(content)
}

impl fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl AsRef<[u8]> for ContentDigest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; DIGEST_LEN]> for ContentDigest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for ContentDigest {
    type Error = std::array::TryFromSliceError;

    fn try_from(slice: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; DIGEST_LEN] = slice.try_into()?;
        Ok(Self(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_hello_vector() {
        assert_eq!(
            ContentDigest::of(b"hello").to_hex(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            digest(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_debug_is_truncated() {
        let d = ContentDigest::from_bytes([0xab; 32]);
        assert_eq!(format!("{:?}", d), "SHA256(abababababababab)");
        assert_eq!(format!("{}", d).len(), 64);
    }

    #[test]
    fn test_try_from_wrong_length() {
        assert!(ContentDigest::try_from(&[0u8; 31][..]).is_err());
        assert!(ContentDigest::try_from(&[0u8; 32][..]).is_ok());
    }

    proptest! {
        #[test]
        fn digest_is_deterministic(content in prop::collection::vec(any::<u8>(), 0..512)) {
            let a = ContentDigest::of(&content);
            let b = ContentDigest::of(&content);
            prop_assert_eq!(a, b);
            prop_assert_eq!(a.as_bytes().len(), DIGEST_LEN);
        }

        #[test]
        fn distinct_content_distinct_digest(
            a in prop::collection::vec(any::<u8>(), 0..128),
            b in prop::collection::vec(any::<u8>(), 0..128),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(ContentDigest::of(&a), ContentDigest::of(&b));
        }
    }
}
