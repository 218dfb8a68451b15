//! Value types shared by the orchestrators and the transport.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec::encode_signature;
use crate::error::CodecError;

/// Signing algorithm used for every sign and verify call.
///
/// Probabilistic RSA padding over a SHA-256 digest. There is exactly one
/// variant; the algorithm is fixed for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SigningAlgorithm {
    #[default]
    #[serde(rename = "RSASSA_PSS_SHA_256")]
    RsassaPssSha256,
}

impl SigningAlgorithm {
    /// Wire name understood by the signing authority.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SigningAlgorithm::RsassaPssSha256 => "RSASSA_PSS_SHA_256",
        }
    }
}

impl fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The key used for both signing and verification.
///
/// Loaded once from configuration and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SigningKeyHandle {
    key_id: String,
    algorithm: SigningAlgorithm,
}

impl SigningKeyHandle {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            algorithm: SigningAlgorithm::default(),
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }
}

/// The classifier's verdict on a piece of content.
///
/// Deliberately not `Copy`: the certification flow consumes it once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationDecision {
    /// Content was produced by a human. The only verdict that permits signing.
    Human,
    /// Anything else.
    Other,
}

impl ClassificationDecision {
    /// Map a classifier label. Only `HUMAN` (any case) is human.
    pub fn from_label(label: &str) -> Self {
        if label.trim().eq_ignore_ascii_case("human") {
            ClassificationDecision::Human
        } else {
            ClassificationDecision::Other
        }
    }
}

/// Outcome of certifying a payload.
///
/// `certificate` is present if and only if `certified` is true. The fields
/// are private so the invariant holds by construction, and deserialization
/// rejects documents that break it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCertificationResult")]
pub struct CertificationResult {
    certified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    certificate: Option<String>,
}

impl CertificationResult {
    /// A positive result carrying the base64 signature.
    pub fn certified(signature: &[u8]) -> Self {
        Self {
            certified: true,
            certificate: Some(encode_signature(signature)),
        }
    }

    /// A negative result. Not an error.
    pub fn not_certified() -> Self {
        Self {
            certified: false,
            certificate: None,
        }
    }

    pub fn is_certified(&self) -> bool {
        self.certified
    }

    /// Base64 signature text, if certified.
    pub fn certificate(&self) -> Option<&str> {
        self.certificate.as_deref()
    }
}

#[derive(Deserialize)]
struct RawCertificationResult {
    certified: bool,
    #[serde(default)]
    certificate: Option<String>,
}

impl TryFrom<RawCertificationResult> for CertificationResult {
    type Error = CodecError;

    fn try_from(raw: RawCertificationResult) -> Result<Self, Self::Error> {
        match (raw.certified, raw.certificate) {
            (true, Some(certificate)) if !certificate.is_empty() => Ok(Self {
                certified: true,
                certificate: Some(certificate),
            }),
            (false, None) => Ok(Self::not_certified()),
            (true, _) => Err(CodecError::malformed(
                "certificate",
                "certified result without a certificate",
            )),
            (false, Some(_)) => Err(CodecError::malformed(
                "certificate",
                "certificate on a result that is not certified",
            )),
        }
    }
}

/// Outcome of verifying a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationOutcome {
    pub is_valid: bool,
}

impl VerificationOutcome {
    pub const VALID: Self = Self { is_valid: true };
    pub const INVALID: Self = Self { is_valid: false };
}

/// Public key bytes as returned by the signing authority.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey(pub Vec<u8>);

impl PublicKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Base64 text for the wire.
    pub fn to_base64(&self) -> String {
        encode_signature(&self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({} bytes)", self.0.len())
    }
}

impl From<Vec<u8>> for PublicKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}
