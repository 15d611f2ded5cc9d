//! Cluster topology discovery
//!
//! This module provides:
//! - The admin command seam used to reach the deployment
//! - Topology discovery via `listShards`
//! - Shard record parsing and validation
//! - An offline admin handle backed by a captured reply

pub mod admin;
pub mod shard;
pub mod snapshot;
pub mod topology;

pub use admin::{AdminCommand, AdminCommandExt, ADMIN_DB};
pub use shard::{HostEntry, ReplicaSetHosts, ShardRecord, ShardState};
pub use snapshot::SnapshotAdmin;
pub use topology::{fetch_shards, fetch_topology, ClusterTopology};
