//! The Certifier: certification and verification flows.
//!
//! Each operation is strictly sequential inside one call. Codec validation
//! always runs before any client is acquired, so malformed input never
//! reaches a collaborator.

use std::sync::Arc;

use certifier_clients::{AuthorityError, ClientRegistry};
use certifier_core::{
    decode_digest, decode_signature, CertificationResult, ClassificationDecision, ContentDigest,
    SigningKeyHandle, VerificationOutcome,
};

use crate::error::Result;

/// Certification and verification over shared collaborator clients.
///
/// Cheap to clone; clones share the registry and key handle.
#[derive(Debug, Clone)]
pub struct Certifier {
    clients: Arc<ClientRegistry>,
    key: Arc<SigningKeyHandle>,
}

impl Certifier {
    /// Create a certifier over the process-wide client registry.
    pub fn new(clients: Arc<ClientRegistry>, key: SigningKeyHandle) -> Self {
        Self {
            clients,
            key: Arc::new(key),
        }
    }

    /// The signing key handle.
    pub fn key(&self) -> &SigningKeyHandle {
        &self.key
    }

    /// The client registry.
    pub fn clients(&self) -> &Arc<ClientRegistry> {
        &self.clients
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Certification
    // ─────────────────────────────────────────────────────────────────────────

    /// Certify a content payload.
    ///
    /// Exactly one classify call. Exactly one sign call, and only when the
    /// classifier says `Human`. No retries.
    pub async fn certify(&self, content: &[u8]) -> Result<CertificationResult> {
        let classifier = self.clients.classifier().acquire().await?;
        let decision = classifier.classify(content).await?;

        match decision {
            ClassificationDecision::Other => {
                tracing::debug!(len = content.len(), "content not classified human");
                Ok(CertificationResult::not_certified())
            }
            ClassificationDecision::Human => {
                let digest = ContentDigest::of(content);
                tracing::debug!(%digest, "content classified human, requesting signature");

                let authority = self.clients.authority().acquire().await?;
                let signature = authority
                    .sign(self.key.key_id(), &digest, self.key.algorithm())
                    .await?;

                tracing::info!(%digest, "content certified");
                Ok(CertificationResult::certified(&signature))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Verification
    // ─────────────────────────────────────────────────────────────────────────

    /// Verify a base64 signature against a precomputed hex digest.
    pub async fn verify_digest(
        &self,
        signature_text: &str,
        digest_hex: &str,
    ) -> Result<VerificationOutcome> {
        let signature = decode_signature(signature_text)?;
        let digest = decode_digest(digest_hex)?;
        self.verify_resolved(&signature, &digest).await
    }

    /// Verify a base64 signature against raw content.
    pub async fn verify_content(
        &self,
        signature_text: &str,
        content: &[u8],
    ) -> Result<VerificationOutcome> {
        let signature = decode_signature(signature_text)?;
        let digest = ContentDigest::of(content);
        self.verify_resolved(&signature, &digest).await
    }

    async fn verify_resolved(
        &self,
        signature: &[u8],
        digest: &ContentDigest,
    ) -> Result<VerificationOutcome> {
        let authority = self.clients.authority().acquire().await?;
        let verdict = authority
            .verify(self.key.key_id(), digest, signature, self.key.algorithm())
            .await;

        match verdict {
            Ok(true) => {
                tracing::debug!(%digest, "signature valid");
                Ok(VerificationOutcome::VALID)
            }
            Ok(false) | Err(AuthorityError::InvalidSignature) => {
                tracing::info!(%digest, "signature invalid");
                Ok(VerificationOutcome::INVALID)
            }
            Err(e) => Err(e.into()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Public key
    // ─────────────────────────────────────────────────────────────────────────

    /// The signer's public key as base64. Not cached.
    pub async fn public_key(&self) -> Result<String> {
        let authority = self.clients.authority().acquire().await?;
        let key = authority.get_public_key(self.key.key_id()).await?;
        Ok(key.to_base64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certifier_testkit::{CertifierFixture, MockAuthority, MockClassifier};

    fn certifier(fixture: &CertifierFixture) -> Certifier {
        Certifier::new(fixture.registry(), fixture.key())
    }

    #[tokio::test]
    async fn test_other_is_not_certified_and_never_signs() {
        let fixture = CertifierFixture::new(MockClassifier::other(), MockAuthority::new());
        let result = certifier(&fixture).certify(b"generated").await.unwrap();

        assert_eq!(result, CertificationResult::not_certified());
        assert_eq!(fixture.classifier.classify_calls(), 1);
        assert_eq!(fixture.authority.sign_calls(), 0);
    }

    #[tokio::test]
    async fn test_human_signs_the_digest_once() {
        let fixture = CertifierFixture::new(
            MockClassifier::human(),
            MockAuthority::new().with_signature(vec![0x01, 0x02]),
        );
        let result = certifier(&fixture).certify(b"hello").await.unwrap();

        assert!(result.is_certified());
        assert_eq!(result.certificate(), Some("AQI="));
        assert_eq!(fixture.authority.sign_calls(), 1);
        assert_eq!(
            fixture.authority.signed_digests(),
            vec![ContentDigest::of(b"hello")]
        );
    }

    #[tokio::test]
    async fn test_classifier_fault_propagates() {
        let fixture = CertifierFixture::new(MockClassifier::failing(), MockAuthority::new());
        let err = certifier(&fixture).certify(b"x").await.unwrap_err();

        assert!(!err.is_client_fault());
        assert_eq!(fixture.authority.sign_calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_digest_makes_no_call() {
        let fixture = CertifierFixture::new(MockClassifier::human(), MockAuthority::new());
        let err = certifier(&fixture)
            .verify_digest("AQI=", "not-hex")
            .await
            .unwrap_err();

        assert!(err.is_client_fault());
        assert_eq!(fixture.authority.verify_calls(), 0);
    }

    #[tokio::test]
    async fn test_public_key_is_base64() {
        let fixture = CertifierFixture::new(
            MockClassifier::human(),
            MockAuthority::new().with_public_key(vec![1, 2, 3]),
        );
        assert_eq!(certifier(&fixture).public_key().await.unwrap(), "AQID");
        assert_eq!(fixture.authority.public_key_calls(), 1);
    }
}
