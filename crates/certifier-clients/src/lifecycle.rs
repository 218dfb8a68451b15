//! Client lifecycle: construct once, share, release once.
//!
//! A [`ClientSlot`] wraps a `tokio::sync::OnceCell`. The first `acquire`
//! runs the factory; concurrent first callers wait on the same
//! initialization and observe the same instance. Later callers read the cell
//! without locking. `release` closes the client exactly once and is a no-op
//! for a slot that was never filled.
//!
//! Shutdown ordering is the caller's job: stop accepting requests, drain
//! in-flight requests, then call [`ClientRegistry::release_all`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{fence, AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::{ClientError, Result};
use crate::traits::{Classifier, ManagedClient, SigningAuthority};

type BuildFuture<T> = Pin<Box<dyn Future<Output = Result<Arc<T>>> + Send>>;
type Factory<T> = Box<dyn Fn() -> BuildFuture<T> + Send + Sync>;

/// Write-once, release-once holder of one external client.
pub struct ClientSlot<T: ?Sized + ManagedClient + 'static> {
    name: &'static str,
    cell: OnceCell<Arc<T>>,
    factory: Factory<T>,
    released: AtomicBool,
    closed: AtomicBool,
}

impl<T: ?Sized + ManagedClient + 'static> ClientSlot<T> {
    /// Create an empty slot. `factory` runs on the first successful acquire.
    pub fn new<F, Fut>(name: &'static str, factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<T>>> + Send + 'static,
    {
        Self {
            name,
            cell: OnceCell::new(),
            factory: Box::new(move || -> BuildFuture<T> { Box::pin(factory()) }),
            released: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    /// A slot whose factory hands out an already-built client.
    pub fn ready(name: &'static str, client: Arc<T>) -> Self {
        Self::new(name, move || {
            let client = Arc::clone(&client);
            async move { Ok(client) }
        })
    }

    /// Slot name, used in logs and errors.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Get the shared client, constructing it on first use.
    ///
    /// A failed construction leaves the slot empty. A client whose
    /// construction finishes after `release` started is closed here and not
    /// handed out.
    pub async fn acquire(&self) -> Result<Arc<T>> {
        if self.released.load(Ordering::SeqCst) {
            return Err(ClientError::Released(self.name));
        }
        let client = self
            .cell
            .get_or_try_init(|| async {
                tracing::info!(client = self.name, "constructing external client");
                (self.factory)().await
            })
            .await
            .map_err(|e| {
                tracing::error!(client = self.name, error = %e, "client construction failed");
                e
            })?;

        // Pairs with the fence in `release`: one side sees the other's write.
        fence(Ordering::SeqCst);
        if self.released.load(Ordering::SeqCst) {
            self.close_once(&**client).await;
            return Err(ClientError::Released(self.name));
        }
        Ok(Arc::clone(client))
    }

    /// Whether a client has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// Whether `release` has run.
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// Close the client if it was constructed. Only the first call acts.
    pub async fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        fence(Ordering::SeqCst);
        match self.cell.get() {
            Some(client) => self.close_once(&**client).await,
            None => {
                tracing::debug!(client = self.name, "release skipped: never constructed");
            }
        }
    }

    async fn close_once(&self, client: &T) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        client.close().await;
        tracing::info!(client = self.name, "external client released");
    }
}

impl<T: ?Sized + ManagedClient + 'static> fmt::Debug for ClientSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSlot")
            .field("name", &self.name)
            .field("initialized", &self.is_initialized())
            .field("released", &self.is_released())
            .finish()
    }
}

/// The two client slots a process needs.
///
/// Constructed once at startup and shared by `Arc` with every request path.
#[derive(Debug)]
pub struct ClientRegistry {
    classifier: ClientSlot<dyn Classifier>,
    authority: ClientSlot<dyn SigningAuthority>,
}

impl ClientRegistry {
    pub fn new(
        classifier: ClientSlot<dyn Classifier>,
        authority: ClientSlot<dyn SigningAuthority>,
    ) -> Self {
        Self {
            classifier,
            authority,
        }
    }

    /// A registry around already-built clients.
    pub fn from_clients(
        classifier: Arc<dyn Classifier>,
        authority: Arc<dyn SigningAuthority>,
    ) -> Self {
        Self::new(
            ClientSlot::ready("classifier", classifier),
            ClientSlot::ready("signing-authority", authority),
        )
    }

    pub fn classifier(&self) -> &ClientSlot<dyn Classifier> {
        &self.classifier
    }

    pub fn authority(&self) -> &ClientSlot<dyn SigningAuthority> {
        &self.authority
    }

    /// Construct both clients. A failure here must stop startup.
    pub async fn acquire_all(&self) -> Result<()> {
        self.classifier.acquire().await?;
        self.authority.acquire().await?;
        Ok(())
    }

    /// Release both clients. Call once, after in-flight requests drain.
    pub async fn release_all(&self) {
        self.classifier.release().await;
        self.authority.release().await;
    }
}
