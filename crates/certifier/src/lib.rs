//! # Certifier
//!
//! Content certification: ask a classifier whether a payload was written by a
//! human, have a signing authority sign its digest if so, and verify such
//! signatures later.
//!
//! ## Overview
//!
//! - **Certify**: classify, then sign the SHA-256 digest only on a `Human`
//!   verdict. Any other verdict is a normal negative result.
//! - **Verify**: decode the signature and digest (or hash raw content), then
//!   ask the authority. A mismatch is `{isValid: false}`; an authority that
//!   cannot answer is a fault. The two never collapse.
//! - **Public key**: fetched from the authority on every call. Caching, if
//!   wanted, sits outside in [`PublicKeyCache`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use certifier::{Certifier, SigningKeyHandle};
//! use certifier::clients::ClientRegistry;
//!
//! async fn example(registry: Arc<ClientRegistry>) {
//!     let certifier = Certifier::new(registry, SigningKeyHandle::new("alias/certifier"));
//!
//!     let result = certifier.certify(b"an essay").await.unwrap();
//!     if let Some(certificate) = result.certificate() {
//!         let outcome = certifier
//!             .verify_content(certificate, b"an essay")
//!             .await
//!             .unwrap();
//!         assert!(outcome.is_valid);
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `certifier::core` - Digests, codec, value types
//! - `certifier::clients` - Collaborator traits and client lifecycle

pub mod cache;
pub mod certifier;
pub mod error;

pub use certifier_clients as clients;
pub use certifier_core as core;

pub use crate::cache::PublicKeyCache;
pub use crate::certifier::Certifier;
pub use crate::error::{CertifyError, Result, ServiceFault};

pub use certifier_core::{
    CertificationResult, ClassificationDecision, ContentDigest, SigningAlgorithm,
    SigningKeyHandle, VerificationOutcome,
};
