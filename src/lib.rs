//! shard-uri-resolver library
//!
//! Turns a sharded cluster's `listShards` topology plus a parsed connection
//! configuration into connection URIs: one per shard for replica-set
//! discovery, or one per member node for direct connections.

pub mod cluster;
pub mod config;
pub mod report;
pub mod resolve;
pub mod utils;

pub use cluster::{fetch_shards, AdminCommand, ShardRecord};
pub use config::ConnectionConfig;
pub use resolve::{direct_uris, discovery_uris};
pub use utils::{ConnectivityError, IntegrityError, ResolverError, Result};
