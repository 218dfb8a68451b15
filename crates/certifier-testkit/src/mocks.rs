//! Mock collaborators that record their calls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use certifier_clients::{
    AuthorityError, Classifier, ClassifierError, ManagedClient, SigningAuthority,
};
use certifier_core::{ClassificationDecision, ContentDigest, PublicKey, SigningAlgorithm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Human,
    Other,
    Fail,
}

/// A classifier with a fixed verdict.
#[derive(Debug)]
pub struct MockClassifier {
    verdict: Verdict,
    delay: Option<Duration>,
    calls: AtomicUsize,
    closes: AtomicUsize,
}

impl MockClassifier {
    fn with_verdict(verdict: Verdict) -> Self {
        Self {
            verdict,
            delay: None,
            calls: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
        }
    }

    /// Always answers `Human`.
    pub fn human() -> Self {
        Self::with_verdict(Verdict::Human)
    }

    /// Always answers `Other`.
    pub fn other() -> Self {
        Self::with_verdict(Verdict::Other)
    }

    /// Always fails with `Unavailable`.
    pub fn failing() -> Self {
        Self::with_verdict(Verdict::Fail)
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn classify_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ManagedClient for MockClassifier {
    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _content: &[u8]) -> Result<ClassificationDecision, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.verdict {
            Verdict::Human => Ok(ClassificationDecision::Human),
            Verdict::Other => Ok(ClassificationDecision::Other),
            Verdict::Fail => Err(ClassifierError::Unavailable("mock classifier down".into())),
        }
    }
}

/// How [`MockAuthority::verify`] answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyBehavior {
    /// `Ok(true)`.
    Valid,
    /// `Err(AuthorityError::InvalidSignature)`.
    InvalidSignature,
    /// `Ok(false)`.
    NotValid,
    /// `Err(AuthorityError::Unavailable)`.
    Fault,
}

/// A signing authority with canned answers.
#[derive(Debug)]
pub struct MockAuthority {
    signature: Vec<u8>,
    public_key: Vec<u8>,
    verify: VerifyBehavior,
    fail_sign: bool,
    delay: Option<Duration>,
    sign_calls: AtomicUsize,
    verify_calls: AtomicUsize,
    public_key_calls: AtomicUsize,
    closes: AtomicUsize,
    signed: Mutex<Vec<ContentDigest>>,
    verified: Mutex<Vec<(ContentDigest, Vec<u8>)>>,
    signed_with: Mutex<Vec<(String, SigningAlgorithm)>>,
    verified_with: Mutex<Vec<(String, SigningAlgorithm)>>,
    public_key_ids: Mutex<Vec<String>>,
}

impl MockAuthority {
    pub fn new() -> Self {
        Self {
            signature: vec![0x01, 0x02],
            public_key: vec![0x30, 0x82],
            verify: VerifyBehavior::Valid,
            fail_sign: false,
            delay: None,
            sign_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
            public_key_calls: AtomicUsize::new(0),
            closes: AtomicUsize::new(0),
            signed: Mutex::new(Vec::new()),
            verified: Mutex::new(Vec::new()),
            signed_with: Mutex::new(Vec::new()),
            verified_with: Mutex::new(Vec::new()),
            public_key_ids: Mutex::new(Vec::new()),
        }
    }

    /// Bytes returned by `sign`.
    pub fn with_signature(mut self, signature: Vec<u8>) -> Self {
        self.signature = signature;
        self
    }

    /// Bytes returned by `get_public_key`.
    pub fn with_public_key(mut self, public_key: Vec<u8>) -> Self {
        self.public_key = public_key;
        self
    }

    pub fn with_verify(mut self, behavior: VerifyBehavior) -> Self {
        self.verify = behavior;
        self
    }

    /// Make `sign` fail with `Unavailable`.
    pub fn failing_sign(mut self) -> Self {
        self.fail_sign = true;
        self
    }

    /// Sleep before every answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn public_key_calls(&self) -> usize {
        self.public_key_calls.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    /// Total calls of any kind.
    pub fn total_calls(&self) -> usize {
        self.sign_calls() + self.verify_calls() + self.public_key_calls()
    }

    /// Digests passed to `sign`, in order.
    pub fn signed_digests(&self) -> Vec<ContentDigest> {
        self.signed.lock().unwrap().clone()
    }

    /// `(digest, signature)` pairs passed to `verify`, in order.
    pub fn verified(&self) -> Vec<(ContentDigest, Vec<u8>)> {
        self.verified.lock().unwrap().clone()
    }

    /// `(key_id, algorithm)` passed to `sign`, in order.
    pub fn signed_with(&self) -> Vec<(String, SigningAlgorithm)> {
        self.signed_with.lock().unwrap().clone()
    }

    /// `(key_id, algorithm)` passed to `verify`, in order.
    pub fn verified_with(&self) -> Vec<(String, SigningAlgorithm)> {
        self.verified_with.lock().unwrap().clone()
    }

    /// Key ids passed to `get_public_key`, in order.
    pub fn public_key_ids(&self) -> Vec<String> {
        self.public_key_ids.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for MockAuthority {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ManagedClient for MockAuthority {
    async fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SigningAuthority for MockAuthority {
    async fn sign(
        &self,
        key_id: &str,
        digest: &ContentDigest,
        algorithm: SigningAlgorithm,
    ) -> Result<Vec<u8>, AuthorityError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        self.signed.lock().unwrap().push(*digest);
        self.signed_with
            .lock()
            .unwrap()
            .push((key_id.to_string(), algorithm));
        self.pause().await;
        if self.fail_sign {
            return Err(AuthorityError::Unavailable("mock authority down".into()));
        }
        Ok(self.signature.clone())
    }

    async fn verify(
        &self,
        key_id: &str,
        digest: &ContentDigest,
        signature: &[u8],
        algorithm: SigningAlgorithm,
    ) -> Result<bool, AuthorityError> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.verified_with
            .lock()
            .unwrap()
            .push((key_id.to_string(), algorithm));
        self.verified
            .lock()
            .unwrap()
            .push((*digest, signature.to_vec()));
        self.pause().await;
        match self.verify {
            VerifyBehavior::Valid => Ok(true),
            VerifyBehavior::NotValid => Ok(false),
            VerifyBehavior::InvalidSignature => Err(AuthorityError::InvalidSignature),
            VerifyBehavior::Fault => Err(AuthorityError::Unavailable("mock authority down".into())),
        }
    }

    async fn get_public_key(&self, key_id: &str) -> Result<PublicKey, AuthorityError> {
        self.public_key_calls.fetch_add(1, Ordering::SeqCst);
        self.public_key_ids.lock().unwrap().push(key_id.to_string());
        self.pause().await;
        Ok(PublicKey::from(self.public_key.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_classifier_counts_calls() {
        let classifier = MockClassifier::other();
        classifier.classify(b"a").await.unwrap();
        classifier.classify(b"b").await.unwrap();
        assert_eq!(classifier.classify_calls(), 2);
    }

    #[tokio::test]
    async fn test_authority_records_digests() {
        let authority = MockAuthority::new();
        let digest = ContentDigest::of(b"hello");
        authority
            .sign("k", &digest, SigningAlgorithm::RsassaPssSha256)
            .await
            .unwrap();
        assert_eq!(authority.signed_digests(), vec![digest]);
        assert_eq!(authority.total_calls(), 1);
    }
}
