//! Process lifecycle: build clients, serve, drain, release.

use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::task::TaskTracker;

use certifier::clients::{
    Classifier, ClientRegistry, ClientSlot, HttpClassifier, HttpSigningAuthority,
    SigningAuthority,
};
use certifier::{Certifier, PublicKeyCache};

use crate::config::ServerConfig;
use crate::routes::{router, AppState};

/// Registry whose slots build the HTTP collaborators on first acquire.
pub fn build_registry(config: &ServerConfig) -> ClientRegistry {
    let classifier_config = config.classifier.clone();
    let endpoint = config.classifier_endpoint.clone();
    let classifier: ClientSlot<dyn Classifier> = ClientSlot::new("classifier", move || {
        let built = HttpClassifier::new(&classifier_config, &endpoint)
            .map(|c| Arc::new(c) as Arc<dyn Classifier>);
        async move { built }
    });

    let authority_config = config.authority.clone();
    let authority: ClientSlot<dyn SigningAuthority> =
        ClientSlot::new("signing-authority", move || {
            let built = HttpSigningAuthority::new(&authority_config)
                .map(|c| Arc::new(c) as Arc<dyn SigningAuthority>);
            async move { built }
        });

    ClientRegistry::new(classifier, authority)
}

/// Serve `app` on `listener` until `shutdown` resolves.
///
/// In-flight requests drain, then every task in `tasks` finishes, and only
/// then are the clients in `registry` released. `tasks` must be the tracker
/// of the [`AppState`] behind `app`.
pub async fn serve<S>(
    listener: TcpListener,
    registry: Arc<ClientRegistry>,
    app: Router,
    tasks: TaskTracker,
    shutdown: S,
) -> anyhow::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await;

    tasks.close();
    if !tasks.is_empty() {
        tracing::info!(pending = tasks.len(), "waiting for detached calls");
    }
    tasks.wait().await;

    registry.release_all().await;
    tracing::info!("clients released");

    served.context("server error")
}

/// Run the service with `config` until SIGINT or SIGTERM.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let registry = Arc::new(build_registry(&config));
    registry
        .acquire_all()
        .await
        .context("failed to construct collaborator clients")?;
    tracing::info!(
        key_id = config.key.key_id(),
        endpoint = %config.classifier_endpoint,
        "clients ready"
    );

    let certifier = Certifier::new(Arc::clone(&registry), config.key.clone());
    let mut state = AppState::new(certifier, config.request_timeout);
    if !config.public_key_ttl.is_zero() {
        state = state.with_key_cache(Arc::new(PublicKeyCache::new(config.public_key_ttl)));
    }
    let tasks = state.tasks().clone();
    let app = router(state, config.max_body_bytes);

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    tracing::info!(addr = %config.listen, "listening");

    serve(listener, registry, app, tasks, shutdown_signal()).await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received, draining");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cli;
    use clap::Parser;

    fn config(classifier_url: &str) -> ServerConfig {
        let cli = Cli::try_parse_from([
            "certifier",
            "--key-id",
            "alias/certifier",
            "--classifier-endpoint",
            "human-detector",
            "--region",
            "us-east-1",
            "--classifier-url",
            classifier_url,
            "--authority-url",
            "http://127.0.0.1:9",
        ])
        .unwrap();
        ServerConfig::from_cli(cli).unwrap()
    }

    #[tokio::test]
    async fn test_registry_builds_lazily() {
        let registry = build_registry(&config("http://127.0.0.1:9"));
        assert!(!registry.classifier().is_initialized());
        assert!(!registry.authority().is_initialized());

        // Construction does not contact the collaborators.
        registry.acquire_all().await.unwrap();
        assert!(registry.classifier().is_initialized());
        assert!(registry.authority().is_initialized());

        registry.release_all().await;
        assert!(registry.classifier().is_released());
        assert!(registry.authority().is_released());
    }
}
