//! Query-string composition for generated URIs

use std::fmt;

use crate::config::ConnectionConfig;

/// Kind of URI being generated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriMode {
    /// One URI per shard; the driver discovers the other members
    Discovery,
    /// One URI per member node
    Direct,
}

impl UriMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            UriMode::Discovery => "discovery",
            UriMode::Direct => "direct",
        }
    }
}

/// Ordered `key=value` pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: impl Into<String>) {
        self.pairs.push((key.to_string(), value.into()));
    }

    /// Append `other`, skipping keys this set already holds
    ///
    /// Keys repeated inside `other` (e.g. `readPreferenceTags`) are kept.
    pub fn merge(&mut self, other: QueryParams) {
        let existing: Vec<String> = self.pairs.iter().map(|(k, _)| k.clone()).collect();
        self.pairs
            .extend(other.pairs.into_iter().filter(|(k, _)| !existing.contains(k)));
    }

    /// First value for `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Number of occurrences of `key`
    pub fn count(&self, key: &str) -> usize {
        self.pairs.iter().filter(|(k, _)| k == key).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{k}={v}")?;
        }
        Ok(())
    }
}

/// Options carried from the configuration into every generated URI
///
/// Read preference is dropped in direct mode: it means nothing against a
/// single node.
pub fn compose_query_params(config: &ConnectionConfig, mode: UriMode) -> QueryParams {
    let mut params = QueryParams::new();
    let tls = &config.tls;

    if tls.enabled {
        params.push("tls", "true");
    }
    if let Some(ref ca) = tls.ca_file {
        params.push("tlsCAFile", ca.display().to_string());
    }
    if let Some(ref cert) = tls.cert_key_file {
        params.push("tlsCertificateKeyFile", cert.display().to_string());
    }
    if tls.insecure {
        params.push("tlsInsecure", "true");
    }

    if mode == UriMode::Discovery {
        if let Some(pref) = config.read_preference.as_deref().filter(|p| !p.is_empty()) {
            params.push("readPreference", pref);
        }
        for tag_set in &config.read_preference_tags {
            params.push("readPreferenceTags", tag_set.to_string());
        }
    }

    if let Some(w) = config.write_concern.value() {
        params.push("w", w);
    }
    if config.retry_reads {
        params.push("retryReads", "true");
    }
    if config.retry_writes {
        params.push("retryWrites", "true");
    }

    params
}
