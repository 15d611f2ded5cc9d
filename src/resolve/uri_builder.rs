//! Connection URI generation
//!
//! Two modes:
//! - discovery: one URI per shard listing every member as reported
//! - direct: one URI per member, hostnames reconciled against the seeds
//!
//! Generated URIs always use the plain `mongodb://` scheme since they name
//! concrete hosts. An SRV configuration is carried over as
//! `authSource=admin&tls=true`.

use tracing::info;

use super::naming_rule::NamingRules;
use super::query_params::{compose_query_params, QueryParams, UriMode};
use super::reconciler::{HostnameReconciler, Strategy};
use crate::cluster::shard::{HostEntry, ReplicaSetHosts, ShardRecord};
use crate::cluster::ADMIN_DB;
use crate::config::ConnectionConfig;
use crate::utils::{IntegrityError, Result};

/// Scheme of every generated URI
pub const URI_SCHEME: &str = "mongodb://";

/// A generated URI with what it addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUri {
    pub shard: String,
    pub replica_set: String,
    /// Reconciled member (direct mode only)
    pub member: Option<HostEntry>,
    /// Strategy that placed the member (direct mode only)
    pub strategy: Option<Strategy>,
    pub uri: String,
}

/// Builds URIs for one configuration
pub struct UriBuilder<'a> {
    config: &'a ConnectionConfig,
    reconciler: HostnameReconciler,
}

impl<'a> UriBuilder<'a> {
    pub fn new(config: &'a ConnectionConfig) -> Self {
        Self::with_rules(config, NamingRules::default())
    }

    pub fn with_rules(config: &'a ConnectionConfig, rules: NamingRules) -> Self {
        Self {
            config,
            reconciler: HostnameReconciler::with_rules(&config.seed_hosts, rules),
        }
    }

    pub fn reconciler(&self) -> &HostnameReconciler {
        &self.reconciler
    }

    /// One URI per shard
    pub fn discovery(&self, shards: &[ShardRecord]) -> std::result::Result<Vec<ResolvedUri>, IntegrityError> {
        let sets = validate_shards(shards)?;
        let uris: Vec<ResolvedUri> = shards
            .iter()
            .zip(sets)
            .map(|(shard, rs)| ResolvedUri {
                shard: shard.id.clone(),
                uri: self.build(&rs.host_list, &rs.set_name, UriMode::Discovery),
                replica_set: rs.set_name,
                member: None,
                strategy: None,
            })
            .collect();

        info!("Generated {} discovery URIs", uris.len());
        Ok(uris)
    }

    /// One URI per member node
    pub fn direct(&self, shards: &[ShardRecord]) -> std::result::Result<Vec<ResolvedUri>, IntegrityError> {
        let sets = validate_shards(shards)?;
        let mut uris = Vec::new();

        for (shard, rs) in shards.iter().zip(sets) {
            for member in &rs.members {
                let resolution = self.reconciler.resolve(member);
                uris.push(ResolvedUri {
                    shard: shard.id.clone(),
                    replica_set: rs.set_name.clone(),
                    uri: self.build(&resolution.host.to_string(), &rs.set_name, UriMode::Direct),
                    member: Some(resolution.host),
                    strategy: Some(resolution.strategy),
                });
            }
        }

        info!("Generated {} direct URIs", uris.len());
        Ok(uris)
    }

    fn build(&self, hosts: &str, set_name: &str, mode: UriMode) -> String {
        let mut uri = String::from(URI_SCHEME);
        if let Some(userinfo) = userinfo(self.config) {
            uri.push_str(&userinfo);
        }
        uri.push_str(hosts);
        uri.push('/');
        if mode == UriMode::Discovery {
            uri.push_str(&self.config.database);
        }

        let mut params = QueryParams::new();
        params.push("replicaSet", set_name);
        params.merge(auth_params(self.config, mode));
        params.merge(compose_query_params(self.config, mode));

        uri.push('?');
        uri.push_str(&params.to_string());
        uri
    }
}

/// Parse every shard before generating anything, so a bad record never
/// yields a partial list
fn validate_shards(shards: &[ShardRecord]) -> std::result::Result<Vec<ReplicaSetHosts>, IntegrityError> {
    shards.iter().map(ShardRecord::replica_set).collect()
}

/// `user:password@` with the password percent-encoded
fn userinfo(config: &ConnectionConfig) -> Option<String> {
    let user = config.username()?;
    Some(match config.password.as_deref() {
        Some(password) => format!("{}:{}@", user, encode_password(password)),
        None => format!("{}@", user),
    })
}

/// Percent-encode a password for the userinfo section
pub fn encode_password(password: &str) -> String {
    url::form_urlencoded::byte_serialize(password.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// authSource and TLS implied by the configuration
///
/// - explicit authSource always wins
/// - SRV configurations authenticate against admin and use TLS
/// - direct URIs with credentials default to admin
fn auth_params(config: &ConnectionConfig, mode: UriMode) -> QueryParams {
    let mut params = QueryParams::new();

    match config.auth_source.as_deref().filter(|s| !s.is_empty()) {
        Some(source) => params.push("authSource", source),
        None if config.is_srv() => params.push("authSource", ADMIN_DB),
        None if mode == UriMode::Direct && config.has_credentials() => {
            params.push("authSource", ADMIN_DB)
        }
        None => {}
    }

    if config.is_srv() {
        params.push("tls", "true");
    }

    params
}

/// Discovery-mode URIs, one per shard
pub fn discovery_uris(shards: &[ShardRecord], config: &ConnectionConfig) -> Result<Vec<String>> {
    let uris = UriBuilder::new(config).discovery(shards)?;
    Ok(uris.into_iter().map(|u| u.uri).collect())
}

/// Direct-mode URIs, one per member after hostname reconciliation
pub fn direct_uris(shards: &[ShardRecord], config: &ConnectionConfig) -> Result<Vec<String>> {
    let uris = UriBuilder::new(config).direct(shards)?;
    Ok(uris.into_iter().map(|u| u.uri).collect())
}
