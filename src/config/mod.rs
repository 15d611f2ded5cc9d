//! Configuration module

pub mod cli;
pub mod connection_config;
pub mod tls_config;

pub use cli::{CliArgs, OutputFormat, OutputMode};
pub use connection_config::{ConnectionConfig, DiscoveryScheme, TagSet, WriteConcern};
pub use tls_config::TlsConfig;
