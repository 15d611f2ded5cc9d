//! TLS configuration

use std::path::PathBuf;

use serde::Deserialize;

/// TLS options carried into generated URIs
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    pub enabled: bool,
    pub ca_file: Option<PathBuf>,
    /// Combined client certificate and private key (PEM)
    pub cert_key_file: Option<PathBuf>,
    /// Skip certificate and hostname verification
    pub insecure: bool,
}
