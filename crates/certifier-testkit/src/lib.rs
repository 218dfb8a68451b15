//! # Certifier Testkit
//!
//! Testing utilities for Certifier.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Mocks**: [`MockClassifier`] and [`MockAuthority`], which record every
//!   call so tests can assert call counts and arguments
//! - **Fixtures**: [`CertifierFixture`], a client registry over the mocks that
//!   counts client constructions
//! - **Golden vectors**: known content, digest and certificate triples
//! - **Generators**: proptest strategies for content, digests and signatures
//!
//! ## Test Fixtures
//!
//! ```rust
//! use certifier_testkit::{CertifierFixture, MockAuthority, MockClassifier};
//!
//! let fixture = CertifierFixture::new(
//!     MockClassifier::human(),
//!     MockAuthority::new().with_signature(vec![0x01, 0x02]),
//! );
//! let registry = fixture.registry();
//! assert_eq!(fixture.classifier_constructions(), 0);
//! # drop(registry);
//! ```
//!
//! ## Golden Vectors
//!
//! ```rust
//! use certifier_testkit::vectors::all_vectors;
//! use certifier_core::ContentDigest;
//!
//! for vector in all_vectors() {
//!     assert_eq!(ContentDigest::of(vector.content).to_hex(), vector.digest_hex);
//! }
//! ```

pub mod fixtures;
pub mod generators;
pub mod mocks;
pub mod vectors;

pub use fixtures::{CertifierFixture, TEST_KEY_ID};
pub use mocks::{MockAuthority, MockClassifier, VerifyBehavior};
pub use vectors::{all_vectors, GoldenVector};
