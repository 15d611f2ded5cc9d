//! Hostname reconciliation
//!
//! Maps member hostnames reported by the topology onto the names the
//! client can actually reach, using the seed hosts the user connected
//! with as the source of truth. Resolution never fails: a hostname no
//! strategy can place is passed through unchanged.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use super::naming_rule::NamingRules;
use crate::cluster::shard::{parse_host_entry, HostEntry};

/// One way of placing a reported hostname, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Look the member identifier up in the seed-key map
    SeedKey,
    /// Compare against the identifier of every seed host
    SimilarityScan,
    /// Rebuild the designated form from provider naming rules
    Synthesis,
    /// Keep the reported hostname
    Identity,
}

/// Default precedence
pub const DEFAULT_STRATEGIES: [Strategy; 4] = [
    Strategy::SeedKey,
    Strategy::SimilarityScan,
    Strategy::Synthesis,
    Strategy::Identity,
];

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::SeedKey => "seed-key",
            Strategy::SimilarityScan => "similarity-scan",
            Strategy::Synthesis => "synthesis",
            Strategy::Identity => "identity",
        }
    }

    /// Try this strategy alone; `None` means it does not apply
    pub fn apply(&self, reconciler: &HostnameReconciler, hostname: &str) -> Option<String> {
        match self {
            Strategy::SeedKey => {
                let id = reconciler.rules.identifier(hostname);
                reconciler.seed_keys.get(&id).cloned()
            }
            Strategy::SimilarityScan => {
                let id = reconciler.rules.identifier(hostname);
                reconciler
                    .seed_hosts
                    .iter()
                    .find(|seed| reconciler.rules.identifier(seed) == id)
                    .cloned()
            }
            Strategy::Synthesis => reconciler.rules.synthesize(hostname),
            Strategy::Identity => Some(hostname.to_string()),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reconciled host plus the strategy that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub host: HostEntry,
    pub strategy: Strategy,
}

/// Host mapping built from one configuration's seed hosts
#[derive(Debug, Clone)]
pub struct HostnameReconciler {
    rules: NamingRules,
    strategies: Vec<Strategy>,
    /// Seed key -> designated seed hostname
    seed_keys: HashMap<String, String>,
    /// Every parsed seed hostname, in seed order
    seed_hosts: Vec<String>,
    /// Some seed carries a provider marker
    active: bool,
}

impl HostnameReconciler {
    /// Build with the default rule table
    pub fn new(seed_hosts: &[String]) -> Self {
        Self::with_rules(seed_hosts, NamingRules::default())
    }

    /// Build the host mapping from seed hosts (ports ignored)
    pub fn with_rules(seed_hosts: &[String], rules: NamingRules) -> Self {
        let mut seed_keys = HashMap::new();
        let mut hosts = Vec::new();
        let mut active = false;

        for seed in seed_hosts {
            let Some(entry) = parse_host_entry(seed) else {
                debug!("Ignoring unparseable seed host {:?}", seed);
                continue;
            };
            active |= rules.marks(&entry.host);
            if let Some(key) = rules.seed_key(&entry.host) {
                seed_keys.entry(key).or_insert_with(|| entry.host.clone());
            }
            hosts.push(entry.host);
        }

        debug!(
            "Host mapping: {} seed keys from {} seed hosts (active: {})",
            seed_keys.len(),
            hosts.len(),
            active
        );

        Self {
            rules,
            strategies: DEFAULT_STRATEGIES.to_vec(),
            seed_keys,
            seed_hosts: hosts,
            active,
        }
    }

    /// Replace the strategy order
    pub fn with_strategies(mut self, strategies: Vec<Strategy>) -> Self {
        self.strategies = strategies;
        self
    }

    /// False when no seed host carries a provider marker; every
    /// hostname then resolves to itself
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Number of seed-key map entries
    pub fn num_seed_keys(&self) -> usize {
        self.seed_keys.len()
    }

    /// Resolve a hostname without port
    pub fn resolve_hostname(&self, hostname: &str) -> (String, Strategy) {
        if !self.is_active() {
            return (hostname.to_string(), Strategy::Identity);
        }

        for strategy in &self.strategies {
            if let Some(resolved) = strategy.apply(self, hostname) {
                match strategy {
                    Strategy::Synthesis => {
                        warn!("No seed host matches {}, using synthesized {}", hostname, resolved)
                    }
                    _ => debug!("{} -> {} via {}", hostname, resolved, strategy),
                }
                return (resolved, *strategy);
            }
        }

        (hostname.to_string(), Strategy::Identity)
    }

    /// Resolve a member host, reattaching its port
    pub fn resolve(&self, member: &HostEntry) -> Resolution {
        let (host, strategy) = self.resolve_hostname(&member.host);
        Resolution {
            host: member.with_host(host),
            strategy,
        }
    }
}
