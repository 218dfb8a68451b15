//! Process configuration.
//!
//! Flags fall back to environment variables; a `.env` file in the working
//! directory is loaded before parsing. The parsed [`Cli`] is validated once
//! into an immutable [`ServerConfig`].

use std::net::SocketAddr;
use std::time::Duration;

use certifier_clients::{HttpClientConfig, Url};
use certifier_core::SigningKeyHandle;
use clap::Parser;
use thiserror::Error;

#[derive(Debug, Clone, Parser)]
#[command(name = "certifier", about = "Certify human-made content and verify certificates")]
pub struct Cli {
    /// Signing key identifier at the signing authority.
    #[arg(long, env = "CERTIFIER_KEY_ID")]
    pub key_id: String,

    /// Classifier endpoint name.
    #[arg(long, env = "CERTIFIER_CLASSIFIER_ENDPOINT")]
    pub classifier_endpoint: String,

    /// Deployment region, forwarded to both collaborators.
    #[arg(long, env = "CERTIFIER_REGION")]
    pub region: String,

    /// Base URL of the classifier service.
    #[arg(long, env = "CERTIFIER_CLASSIFIER_URL")]
    pub classifier_url: String,

    /// Base URL of the signing authority.
    #[arg(long, env = "CERTIFIER_AUTHORITY_URL")]
    pub authority_url: String,

    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080", env = "CERTIFIER_LISTEN")]
    pub listen: SocketAddr,

    /// Upper bound on one request, in seconds.
    #[arg(long, default_value_t = 30, env = "CERTIFIER_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: u64,

    /// Upper bound on one collaborator call, in seconds.
    #[arg(long, default_value_t = 10, env = "CERTIFIER_CLIENT_TIMEOUT_SECS")]
    pub client_timeout_secs: u64,

    /// Largest accepted request body.
    #[arg(long, default_value_t = 10 * 1024 * 1024, env = "CERTIFIER_MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Public key cache TTL in seconds. 0 disables the cache.
    #[arg(long, default_value_t = 0, env = "CERTIFIER_PUBLIC_KEY_TTL_SECS")]
    pub public_key_ttl_secs: u64,

    /// Default log filter when RUST_LOG is unset.
    #[arg(long, default_value = "info", env = "CERTIFIER_LOG_LEVEL")]
    pub log_level: String,
}

/// Configuration errors. All are startup faults.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("invalid {field}: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validated, immutable server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub key: SigningKeyHandle,
    pub classifier_endpoint: String,
    pub classifier: HttpClientConfig,
    pub authority: HttpClientConfig,
    pub listen: SocketAddr,
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
    pub public_key_ttl: Duration,
}

impl ServerConfig {
    pub fn from_cli(cli: Cli) -> Result<Self, ConfigError> {
        let key_id = non_empty("key-id", cli.key_id)?;
        let endpoint = non_empty("classifier-endpoint", cli.classifier_endpoint)?;
        let region = non_empty("region", cli.region)?;

        if cli.request_timeout_secs == 0 {
            return Err(ConfigError::Zero("request-timeout-secs"));
        }
        if cli.client_timeout_secs == 0 {
            return Err(ConfigError::Zero("client-timeout-secs"));
        }
        if cli.max_body_bytes == 0 {
            return Err(ConfigError::Zero("max-body-bytes"));
        }

        let client_timeout = Duration::from_secs(cli.client_timeout_secs);
        let classifier = HttpClientConfig {
            base_url: parse_url("classifier-url", &cli.classifier_url)?,
            region: region.clone(),
            timeout: client_timeout,
        };
        let authority = HttpClientConfig {
            base_url: parse_url("authority-url", &cli.authority_url)?,
            region,
            timeout: client_timeout,
        };

        Ok(Self {
            key: SigningKeyHandle::new(key_id),
            classifier_endpoint: endpoint,
            classifier,
            authority,
            listen: cli.listen,
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            max_body_bytes: cli.max_body_bytes,
            public_key_ttl: Duration::from_secs(cli.public_key_ttl_secs),
        })
    }
}

fn non_empty(field: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Empty(field));
    }
    Ok(trimmed.to_string())
}

fn parse_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidUrl {
        field,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidUrl {
            field,
            reason: format!("unsupported scheme {other}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = [
            "certifier",
            "--key-id",
            "alias/certifier",
            "--classifier-endpoint",
            "human-detector",
            "--region",
            "us-east-1",
            "--classifier-url",
            "http://classifier.internal",
            "--authority-url",
            "https://authority.internal",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        v.extend(extra.iter().map(|s| s.to_string()));
        v
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(args(&[])).unwrap();
        let config = ServerConfig::from_cli(cli).unwrap();

        assert_eq!(config.key.key_id(), "alias/certifier");
        assert_eq!(config.listen.port(), 8080);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.classifier.timeout, Duration::from_secs(10));
        assert_eq!(config.authority.region, "us-east-1");
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
        assert!(config.public_key_ttl.is_zero());
    }

    #[test]
    fn test_blank_key_rejected() {
        let mut a = args(&[]);
        a[2] = "   ".into();
        let cli = Cli::try_parse_from(a).unwrap();
        assert!(matches!(
            ServerConfig::from_cli(cli),
            Err(ConfigError::Empty("key-id"))
        ));
    }

    #[test]
    fn test_bad_url_rejected() {
        let mut a = args(&[]);
        a[10] = "ftp://authority.internal".into();
        let cli = Cli::try_parse_from(a).unwrap();
        assert!(matches!(
            ServerConfig::from_cli(cli),
            Err(ConfigError::InvalidUrl { field: "authority-url", .. })
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let cli = Cli::try_parse_from(args(&["--request-timeout-secs", "0"])).unwrap();
        assert!(ServerConfig::from_cli(cli).is_err());
    }

    #[test]
    fn test_missing_required_flag() {
        assert!(Cli::try_parse_from(["certifier", "--key-id", "k"]).is_err());
    }
}
