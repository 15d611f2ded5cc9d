//! Topology to connection URI resolution
//!
//! - `naming_rule`: provider hostname conventions as an ordered rule table
//! - `reconciler`: reported hostname -> reachable hostname
//! - `query_params`: configuration -> query string
//! - `uri_builder`: discovery and direct URIs

pub mod naming_rule;
pub mod query_params;
pub mod reconciler;
pub mod uri_builder;

pub use naming_rule::{NamingRule, NamingRules};
pub use query_params::{compose_query_params, QueryParams, UriMode};
pub use reconciler::{HostnameReconciler, Resolution, Strategy, DEFAULT_STRATEGIES};
pub use uri_builder::{direct_uris, discovery_uris, ResolvedUri, UriBuilder, URI_SCHEME};

use crate::cluster::{fetch_shards, AdminCommand};
use crate::config::ConnectionConfig;
use crate::utils::Result;

/// Fetch the topology and generate URIs for the requested modes
///
/// Discovery URIs come first when both modes are requested. Any error
/// aborts the whole run.
pub fn fetch_and_resolve<A: AdminCommand + ?Sized>(
    admin: &mut A,
    config: &ConnectionConfig,
    rules: NamingRules,
    modes: &[UriMode],
) -> Result<Vec<(UriMode, ResolvedUri)>> {
    let shards = fetch_shards(admin)?;
    let builder = UriBuilder::with_rules(config, rules);

    let mut resolved = Vec::new();
    for mode in modes {
        let uris = match mode {
            UriMode::Discovery => builder.discovery(&shards)?,
            UriMode::Direct => builder.direct(&shards)?,
        };
        resolved.extend(uris.into_iter().map(|u| (*mode, u)));
    }
    Ok(resolved)
}
