//! Timeout-aware HTTP transport.
//!
//! Server certificates are never validated; every peer is trusted.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{Certificate, Identity};

use crate::error::Error;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_READ_WRITE_TIMEOUT: Duration = Duration::from_secs(20);

/// Client certificate material for mutual TLS.
///
/// Paths are taken as given; nothing here reads the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientIdentity {
    /// PEM certificate (chain) presented to the server
    pub cert_path: Option<PathBuf>,

    /// PEM private key for `cert_path`
    pub key_path: Option<PathBuf>,

    /// PEM bundle used as the only trust roots when set
    pub ca_path: Option<PathBuf>,
}

impl ClientIdentity {
    pub fn new(cert_path: impl Into<PathBuf>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            cert_path: Some(cert_path.into()),
            key_path: Some(key_path.into()),
            ca_path: None,
        }
    }

    pub fn with_ca(mut self, ca_path: impl Into<PathBuf>) -> Self {
        self.ca_path = Some(ca_path.into());
        self
    }

    /// Both halves of the key pair are configured.
    pub fn is_complete(&self) -> bool {
        self.cert_path.is_some() && self.key_path.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportConfig {
    pub connect_timeout: Duration,

    /// Deadline for the whole exchange once started. Zero disables it.
    pub read_write_timeout: Duration,

    pub identity: Option<ClientIdentity>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_write_timeout: DEFAULT_READ_WRITE_TIMEOUT,
            identity: None,
        }
    }
}

impl TransportConfig {
    pub fn new(connect_timeout: Duration, read_write_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            read_write_timeout,
            identity: None,
        }
    }

    pub fn with_identity(mut self, identity: ClientIdentity) -> Self {
        self.identity = Some(identity);
        self
    }
}

/// Build a blocking client for `config`.
///
/// Identity problems never fail the build: a key pair that cannot be loaded
/// is logged and the client is built without one.
pub fn build_client(config: &TransportConfig) -> Result<Client, Error> {
    let mut builder = Client::builder()
        .use_rustls_tls()
        .danger_accept_invalid_certs(true)
        .connect_timeout(config.connect_timeout);

    builder = if config.read_write_timeout.is_zero() {
        builder.timeout(None)
    } else {
        builder.timeout(config.read_write_timeout)
    };

    if let Some(identity) = config.identity.as_ref() {
        if let (Some(cert), Some(key)) = (&identity.cert_path, &identity.key_path) {
            match load_identity(cert, key) {
                Ok(loaded) => {
                    builder = builder.identity(loaded);
                    if let Some(ca_path) = &identity.ca_path {
                        builder = builder.tls_built_in_root_certs(false);
                        for certificate in load_ca_bundle(ca_path) {
                            builder = builder.add_root_certificate(certificate);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        cert = %cert.display(),
                        key = %key.display(),
                        error = %e,
                        "could not load client identity, continuing without one"
                    );
                }
            }
        }
    }

    Ok(builder.build()?)
}

/// A client with the stock timeouts and no client identity.
pub fn default_client() -> Result<Client, Error> {
    build_client(&TransportConfig::default())
}

fn load_identity(cert: &Path, key: &Path) -> Result<Identity, String> {
    let mut pem = std::fs::read(cert).map_err(|e| e.to_string())?;
    pem.push(b'\n');
    pem.extend(std::fs::read(key).map_err(|e| e.to_string())?);
    Identity::from_pem(&pem).map_err(|e| e.to_string())
}

// An unreadable bundle leaves the trust pool empty.
fn load_ca_bundle(path: &Path) -> Vec<Certificate> {
    let parsed = std::fs::read(path)
        .map_err(|e| e.to_string())
        .and_then(|pem| Certificate::from_pem_bundle(&pem).map_err(|e| e.to_string()));

    match parsed {
        Ok(certificates) => certificates,
        Err(e) => {
            tracing::warn!(ca_file = %path.display(), error = %e, "error setting up CA file");
            Vec::new()
        }
    }
}
