//! # Certifier Clients
//!
//! The external collaborators Certifier depends on, and the lifecycle of the
//! client handles that reach them.
//!
//! ## Overview
//!
//! The orchestrators only see the [`Classifier`] and [`SigningAuthority`]
//! traits. Concrete clients live behind a [`ClientSlot`], which constructs a
//! client at most once and releases it exactly once. A [`ClientRegistry`]
//! owns both slots for the lifetime of the process.
//!
//! ## Key Types
//!
//! - [`Classifier`] - Labels content as human or other
//! - [`SigningAuthority`] - Signs and verifies digests, serves the public key
//! - [`ClientSlot`] - Write-once, release-once holder of one client
//! - [`ClientRegistry`] - The two slots a process needs
//! - [`HttpClassifier`], [`HttpSigningAuthority`] - JSON-over-HTTP clients
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use certifier_clients::{ClientRegistry, ClientSlot, Classifier, SigningAuthority};
//!
//! async fn example(classifier: Arc<dyn Classifier>, authority: Arc<dyn SigningAuthority>) {
//!     let registry = ClientRegistry::from_clients(classifier, authority);
//!
//!     // Warm both slots before serving traffic.
//!     registry.acquire_all().await.unwrap();
//!
//!     // ... serve ...
//!
//!     // After in-flight requests drain.
//!     registry.release_all().await;
//! }
//! ```

pub mod error;
pub mod http;
pub mod lifecycle;
pub mod traits;

pub use error::{AuthorityError, ClassifierError, ClientError, Result};
pub use http::{HttpClassifier, HttpClientConfig, HttpSigningAuthority, REGION_HEADER};
pub use lifecycle::{ClientRegistry, ClientSlot};
pub use traits::{Classifier, ManagedClient, SigningAuthority};

pub use reqwest::Url;
