//! Shard record representation

use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;

use crate::utils::IntegrityError;

/// Shard state as reported by `listShards`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "i64")]
pub enum ShardState {
    #[default]
    NotShardAware,
    ShardAware,
    Other(i64),
}

impl From<i64> for ShardState {
    fn from(value: i64) -> Self {
        match value {
            0 => ShardState::NotShardAware,
            1 => ShardState::ShardAware,
            n => ShardState::Other(n),
        }
    }
}

/// One entry of the `listShards` reply
///
/// `host` is the compound `<replicaSet>/<host1>,<host2>,...` string exactly as
/// the server reported it. Use [`ShardRecord::replica_set`] to split it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShardRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub host: String,
    #[serde(default)]
    pub state: ShardState,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl ShardRecord {
    pub fn new(id: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            state: ShardState::ShardAware,
            tags: BTreeSet::new(),
        }
    }

    /// Split and validate the compound host field
    pub fn replica_set(&self) -> Result<ReplicaSetHosts, IntegrityError> {
        parse_compound_host(&self.id, &self.host)
    }
}

/// A member host as `hostname[:port]`
///
/// The port keeps its reported text (`027017` stays `027017`); it is only
/// checked to be a valid `u16`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HostEntry {
    pub host: String,
    pub port: Option<String>,
}

impl HostEntry {
    /// Same port, different hostname
    pub fn with_host(&self, host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: self.port.clone(),
        }
    }

    pub fn port_number(&self) -> Option<u16> {
        self.port.as_deref()?.parse().ok()
    }
}

impl fmt::Display for HostEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => f.write_str(&self.host),
        }
    }
}

/// Replica set name and members of one shard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaSetHosts {
    pub set_name: String,
    pub members: Vec<HostEntry>,
    /// Member list exactly as reported, used verbatim in discovery URIs
    pub host_list: String,
}

/// Parse `<setName>/<host>[,<host>...]`
///
/// Example:
/// ```text
/// shard01/h1.example.net:27018,h2.example.net:27018
/// ```
pub fn parse_compound_host(shard: &str, compound: &str) -> Result<ReplicaSetHosts, IntegrityError> {
    let (set_name, host_list) =
        compound
            .split_once('/')
            .ok_or_else(|| IntegrityError::MissingSeparator {
                shard: shard.to_string(),
                host: compound.to_string(),
            })?;

    if host_list.contains('/') {
        return Err(IntegrityError::ExtraSeparator {
            shard: shard.to_string(),
            host: compound.to_string(),
        });
    }

    if set_name.is_empty() {
        return Err(IntegrityError::EmptySetName {
            shard: shard.to_string(),
            host: compound.to_string(),
        });
    }

    if host_list.is_empty() {
        return Err(IntegrityError::NoMembers {
            shard: shard.to_string(),
        });
    }

    let members = host_list
        .split(',')
        .map(|entry| {
            parse_host_entry(entry).ok_or_else(|| IntegrityError::MalformedHost {
                shard: shard.to_string(),
                entry: entry.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReplicaSetHosts {
        set_name: set_name.to_string(),
        members,
        host_list: host_list.to_string(),
    })
}

fn parse_port(port: &str) -> Option<String> {
    port.parse::<u16>().ok()?;
    Some(port.to_string())
}

/// Parse a member host: "host", "host:port", "[::1]" or "[::1]:port"
pub fn parse_host_entry(entry: &str) -> Option<HostEntry> {
    if entry.is_empty() {
        return None;
    }

    // Bracketed IPv6 literal
    if entry.starts_with('[') {
        let close = entry.find(']')?;
        let host = &entry[..=close];
        let rest = &entry[close + 1..];
        let port = match rest {
            "" => None,
            _ => Some(parse_port(rest.strip_prefix(':')?)?),
        };
        return Some(HostEntry {
            host: host.to_string(),
            port,
        });
    }

    match entry.split_once(':') {
        Some((host, port)) => {
            if host.is_empty() {
                return None;
            }
            Some(HostEntry {
                host: host.to_string(),
                port: Some(parse_port(port)?),
            })
        }
        None => Some(HostEntry {
            host: entry.to_string(),
            port: None,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compound_host() {
        let rs = parse_compound_host("shard01", "shard01/h1:27018,h2:27018").unwrap();
        assert_eq!(rs.set_name, "shard01");
        assert_eq!(rs.host_list, "h1:27018,h2:27018");
        assert_eq!(rs.members.len(), 2);
        assert_eq!(rs.members[0].host, "h1");
        assert_eq!(rs.members[0].port.as_deref(), Some("27018"));
    }

    #[test]
    fn test_missing_separator_is_integrity_fault() {
        let err = parse_compound_host("shard01", "h1:27018,h2:27018").unwrap_err();
        assert!(matches!(err, IntegrityError::MissingSeparator { .. }));
    }

    #[test]
    fn test_extra_separator_is_integrity_fault() {
        let err = parse_compound_host("shard01", "rs0/h1:27018/h2").unwrap_err();
        assert!(matches!(err, IntegrityError::ExtraSeparator { .. }));
    }

    #[test]
    fn test_no_members_is_integrity_fault() {
        let err = parse_compound_host("shard01", "rs0/").unwrap_err();
        assert_eq!(
            err,
            IntegrityError::NoMembers {
                shard: "shard01".to_string()
            }
        );
    }

    #[test]
    fn test_empty_set_name_is_integrity_fault() {
        let err = parse_compound_host("shard01", "/h1:27017").unwrap_err();
        assert!(matches!(err, IntegrityError::EmptySetName { .. }));
    }

    #[test]
    fn test_empty_member_entry_is_integrity_fault() {
        let err = parse_compound_host("shard01", "rs0/h1:27017,,h2").unwrap_err();
        assert!(matches!(err, IntegrityError::MalformedHost { .. }));
    }

    #[test]
    fn test_parse_host_entry_variants() {
        assert_eq!(
            parse_host_entry("db1.example.net"),
            Some(HostEntry {
                host: "db1.example.net".to_string(),
                port: None
            })
        );
        assert_eq!(parse_host_entry("db1:27017").unwrap().port_number(), Some(27017));
        assert_eq!(parse_host_entry("db1:notaport"), None);
        assert_eq!(parse_host_entry(":27017"), None);

        let v6 = parse_host_entry("[::1]:27019").unwrap();
        assert_eq!(v6.host, "[::1]");
        assert_eq!(v6.port.as_deref(), Some("27019"));
        assert_eq!(parse_host_entry("[::1]").unwrap().port, None);
        assert_eq!(parse_host_entry("[::1"), None);
    }

    #[test]
    fn test_host_entry_display_keeps_port() {
        let entry = parse_host_entry("h1:27018").unwrap();
        assert_eq!(entry.to_string(), "h1:27018");
        assert_eq!(entry.with_host("h1-pri").to_string(), "h1-pri:27018");
        assert_eq!(parse_host_entry("h2").unwrap().to_string(), "h2");
    }

    #[test]
    fn test_port_text_is_kept_verbatim() {
        let entry = parse_host_entry("h1:027017").unwrap();
        assert_eq!(entry.port.as_deref(), Some("027017"));
        assert_eq!(entry.port_number(), Some(27017));
        assert_eq!(entry.with_host("h1-pri").to_string(), "h1-pri:027017");
        assert_eq!(parse_host_entry("h1:70000"), None);
    }

    #[test]
    fn test_deserialize_shard_record() {
        let json = r#"{"_id":"shard02","host":"shard02/a:1,b:2","state":1,"tags":["east","ssd"],"topologyTime":{"$timestamp":{"t":1,"i":2}}}"#;
        let record: ShardRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "shard02");
        assert_eq!(record.state, ShardState::ShardAware);
        assert!(record.tags.contains("ssd"));

        let bare: ShardRecord = serde_json::from_str(r#"{"_id":"s","host":"s/a"}"#).unwrap();
        assert_eq!(bare.state, ShardState::NotShardAware);
        assert!(bare.tags.is_empty());
    }
}
