//! Test fixtures and helpers.
//!
//! Common setup code for orchestrator and transport tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use certifier_clients::{Classifier, ClientRegistry, ClientSlot, SigningAuthority};
use certifier_core::SigningKeyHandle;

use crate::mocks::{MockAuthority, MockClassifier};

/// Key identifier used by every fixture.
pub const TEST_KEY_ID: &str = "alias/certifier-test";

/// Mock collaborators behind a real [`ClientRegistry`].
///
/// The registry's slots count how many times each client is constructed.
pub struct CertifierFixture {
    pub classifier: Arc<MockClassifier>,
    pub authority: Arc<MockAuthority>,
    registry: Arc<ClientRegistry>,
    classifier_builds: Arc<AtomicUsize>,
    authority_builds: Arc<AtomicUsize>,
}

impl CertifierFixture {
    pub fn new(classifier: MockClassifier, authority: MockAuthority) -> Self {
        let classifier = Arc::new(classifier);
        let authority = Arc::new(authority);
        let classifier_builds = Arc::new(AtomicUsize::new(0));
        let authority_builds = Arc::new(AtomicUsize::new(0));

        let classifier_slot: ClientSlot<dyn Classifier> = {
            let client = Arc::clone(&classifier);
            let builds = Arc::clone(&classifier_builds);
            ClientSlot::new("classifier", move || {
                let client = Arc::clone(&client);
                let builds = Arc::clone(&builds);
                async move {
                    builds.fetch_add(1, Ordering::SeqCst);
                    // Widen the window for racing first acquirers.
                    tokio::task::yield_now().await;
                    Ok(client as Arc<dyn Classifier>)
                }
            })
        };

        let authority_slot: ClientSlot<dyn SigningAuthority> = {
            let client = Arc::clone(&authority);
            let builds = Arc::clone(&authority_builds);
            ClientSlot::new("signing-authority", move || {
                let client = Arc::clone(&client);
                let builds = Arc::clone(&builds);
                async move {
                    builds.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    Ok(client as Arc<dyn SigningAuthority>)
                }
            })
        };

        Self {
            classifier,
            authority,
            registry: Arc::new(ClientRegistry::new(classifier_slot, authority_slot)),
            classifier_builds,
            authority_builds,
        }
    }

    /// Human classifier, default authority.
    pub fn human() -> Self {
        Self::new(MockClassifier::human(), MockAuthority::new())
    }

    /// Other classifier, default authority.
    pub fn other() -> Self {
        Self::new(MockClassifier::other(), MockAuthority::new())
    }

    /// The shared registry.
    pub fn registry(&self) -> Arc<ClientRegistry> {
        Arc::clone(&self.registry)
    }

    /// Key handle for [`TEST_KEY_ID`].
    pub fn key(&self) -> SigningKeyHandle {
        SigningKeyHandle::new(TEST_KEY_ID)
    }

    pub fn classifier_constructions(&self) -> usize {
        self.classifier_builds.load(Ordering::SeqCst)
    }

    pub fn authority_constructions(&self) -> usize {
        self.authority_builds.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registry_builds_lazily() {
        let fixture = CertifierFixture::human();
        assert_eq!(fixture.classifier_constructions(), 0);

        fixture.registry().acquire_all().await.unwrap();
        fixture.registry().acquire_all().await.unwrap();

        assert_eq!(fixture.classifier_constructions(), 1);
        assert_eq!(fixture.authority_constructions(), 1);
    }

    #[tokio::test]
    async fn test_release_closes_mocks_once() {
        let fixture = CertifierFixture::other();
        fixture.registry().acquire_all().await.unwrap();

        fixture.registry().release_all().await;
        fixture.registry().release_all().await;

        assert_eq!(fixture.classifier.close_calls(), 1);
        assert_eq!(fixture.authority.close_calls(), 1);
    }
}
