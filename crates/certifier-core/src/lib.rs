//! # Certifier Core
//!
//! Pure primitives for Certifier: content digests, the signature codec, and
//! the value types that flow between the orchestrators and the transport.
//!
//! This crate contains no I/O, no clients, no networking.
//!
//! ## Key Types
//!
//! - [`ContentDigest`] - SHA-256 digest of a content payload
//! - [`SigningKeyHandle`] - Key identifier plus the fixed signing algorithm
//! - [`ClassificationDecision`] - Two-variant classifier verdict
//! - [`CertificationResult`] - Outcome of a certify call
//! - [`VerificationOutcome`] - Outcome of a verify call
//!
//! ## Wire encodings
//!
//! Signatures travel as standard base64, digests as lowercase hex. See
//! [`codec`].

pub mod codec;
pub mod digest;
pub mod error;
pub mod types;

pub use codec::{decode_digest, decode_signature, encode_digest, encode_signature};
pub use digest::{digest, ContentDigest, DIGEST_LEN};
pub use error::{CodecError, Result};
pub use types::{
    CertificationResult, ClassificationDecision, PublicKey, SigningAlgorithm, SigningKeyHandle,
    VerificationOutcome,
};
