//! Collaborator traits: the abstract interface to the classifier and the
//! signing authority.
//!
//! The orchestrators are written against these traits only. Implementations
//! include the HTTP clients in [`crate::http`] and the counting mocks in the
//! testkit.

use async_trait::async_trait;
use certifier_core::{ClassificationDecision, ContentDigest, PublicKey, SigningAlgorithm};

use crate::error::{AuthorityError, ClassifierError};

/// A client whose teardown is managed by a [`crate::ClientSlot`].
#[async_trait]
pub trait ManagedClient: Send + Sync {
    /// Release any resources held by the client.
    ///
    /// Called at most once, after in-flight requests have drained.
    async fn close(&self) {}
}

/// Labels content as human-produced or not.
#[async_trait]
pub trait Classifier: ManagedClient {
    /// Classify a content payload.
    async fn classify(
        &self,
        content: &[u8],
    ) -> std::result::Result<ClassificationDecision, ClassifierError>;
}

/// Holds the private key. Signs and verifies digests without exposing it.
#[async_trait]
pub trait SigningAuthority: ManagedClient {
    /// Sign a digest. Returns raw signature bytes.
    async fn sign(
        &self,
        key_id: &str,
        digest: &ContentDigest,
        algorithm: SigningAlgorithm,
    ) -> std::result::Result<Vec<u8>, AuthorityError>;

    /// Verify a signature over a digest.
    ///
    /// Implementations may report a mismatch either as `Ok(false)` or as
    /// [`AuthorityError::InvalidSignature`]; callers treat both the same.
    async fn verify(
        &self,
        key_id: &str,
        digest: &ContentDigest,
        signature: &[u8],
        algorithm: SigningAlgorithm,
    ) -> std::result::Result<bool, AuthorityError>;

    /// Fetch the public half of `key_id`.
    async fn get_public_key(&self, key_id: &str)
        -> std::result::Result<PublicKey, AuthorityError>;
}
