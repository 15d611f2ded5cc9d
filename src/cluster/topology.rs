//! Sharded cluster topology discovery

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use super::admin::{reply_ok, AdminCommand, AdminCommandExt};
use super::shard::ShardRecord;
use crate::utils::{ConnectivityError, IntegrityError};

const LIST_SHARDS: &str = "listShards";

/// Shard topology snapshot, ordered by shard id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterTopology {
    shards: Vec<ShardRecord>,
}

#[derive(Debug, Deserialize)]
struct ListShardsReply {
    #[serde(default)]
    shards: Option<Vec<ShardRecord>>,
}

impl ClusterTopology {
    /// Build from already decoded records; sorts ascending by id
    pub fn new(mut shards: Vec<ShardRecord>) -> Self {
        shards.sort_by(|a, b| a.id.cmp(&b.id));
        Self { shards }
    }

    /// Decode a `listShards` reply document
    pub fn from_list_shards(reply: Value) -> Result<Self, ConnectivityError> {
        // ok: 0 wins over a malformed body
        if reply_ok(&reply) == Some(false) {
            return Err(ConnectivityError::CommandRejected {
                command: LIST_SHARDS.to_string(),
                code: reply.get("code").and_then(Value::as_i64).unwrap_or(0),
                message: reply
                    .get("errmsg")
                    .and_then(Value::as_str)
                    .unwrap_or("command failed")
                    .to_string(),
            });
        }

        let decoded: ListShardsReply =
            serde_json::from_value(reply).map_err(|e| ConnectivityError::DecodeFailed {
                command: LIST_SHARDS.to_string(),
                reason: e.to_string(),
            })?;

        let shards = decoded
            .shards
            .ok_or_else(|| ConnectivityError::DecodeFailed {
                command: LIST_SHARDS.to_string(),
                reason: "reply has no shards field".to_string(),
            })?;

        Ok(Self::new(shards))
    }

    /// Shard records in ascending id order
    pub fn shards(&self) -> &[ShardRecord] {
        &self.shards
    }

    pub fn into_shards(self) -> Vec<ShardRecord> {
        self.shards
    }

    /// Get number of shards
    pub fn num_shards(&self) -> usize {
        self.shards.len()
    }

    /// Total member hosts across all shards
    pub fn num_members(&self) -> Result<usize, IntegrityError> {
        self.shards
            .iter()
            .map(|s| s.replica_set().map(|rs| rs.members.len()))
            .sum()
    }

    /// Get shard by id
    pub fn get_shard(&self, id: &str) -> Option<&ShardRecord> {
        self.shards
            .binary_search_by(|s| s.id.as_str().cmp(id))
            .ok()
            .map(|idx| &self.shards[idx])
    }
}

/// Run `listShards` and return the records sorted by id
///
/// No retry is attempted; the caller owns retry and timeout policy.
pub fn fetch_shards<A: AdminCommand + ?Sized>(
    admin: &mut A,
) -> Result<Vec<ShardRecord>, ConnectivityError> {
    fetch_topology(admin).map(ClusterTopology::into_shards)
}

/// Same as [`fetch_shards`], keeping the topology wrapper
pub fn fetch_topology<A: AdminCommand + ?Sized>(
    admin: &mut A,
) -> Result<ClusterTopology, ConnectivityError> {
    debug!("Running {} against admin database", LIST_SHARDS);
    let reply = admin
        .list_shards()
        .map_err(|e| ConnectivityError::CommandFailed {
            command: LIST_SHARDS.to_string(),
            source: e,
        })?;

    let topology = ClusterTopology::from_list_shards(reply)?;
    info!("Fetched cluster topology: {} shards", topology.num_shards());
    Ok(topology)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io;

    struct FixedReply(io::Result<Value>);

    impl AdminCommand for FixedReply {
        fn run_command(&mut self, _database: &str, _command: &Value) -> io::Result<Value> {
            match &self.0 {
                Ok(v) => Ok(v.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }
    }

    #[test]
    fn test_fetch_sorts_by_id() {
        let mut admin = FixedReply(Ok(json!({
            "ok": 1,
            "shards": [
                { "_id": "shard03", "host": "shard03/c:27018", "state": 1 },
                { "_id": "shard01", "host": "shard01/a:27018", "state": 1 },
                { "_id": "shard02", "host": "shard02/b:27018", "state": 1 }
            ]
        })));
        let shards = fetch_shards(&mut admin).unwrap();
        let ids: Vec<&str> = shards.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["shard01", "shard02", "shard03"]);
    }

    #[test]
    fn test_transport_failure_is_connectivity_error() {
        let mut admin = FixedReply(Err(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "refused",
        )));
        let err = fetch_shards(&mut admin).unwrap_err();
        assert!(matches!(err, ConnectivityError::CommandFailed { .. }));
    }

    #[test]
    fn test_rejected_command() {
        let mut admin = FixedReply(Ok(json!({
            "ok": 0,
            "errmsg": "no such command: 'listShards'",
            "code": 59
        })));
        match fetch_shards(&mut admin).unwrap_err() {
            ConnectivityError::CommandRejected { code, message, .. } => {
                assert_eq!(code, 59);
                assert!(message.contains("no such command"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejection_with_malformed_shards() {
        let mut admin = FixedReply(Ok(json!({
            "ok": 0,
            "errmsg": "not authorized on admin",
            "code": 13,
            "shards": "garbage"
        })));
        assert!(matches!(
            fetch_shards(&mut admin).unwrap_err(),
            ConnectivityError::CommandRejected { code: 13, .. }
        ));
    }

    #[test]
    fn test_undecodable_reply() {
        let mut admin = FixedReply(Ok(json!({ "ok": 1, "shards": [{ "host": 5 }] })));
        assert!(matches!(
            fetch_shards(&mut admin).unwrap_err(),
            ConnectivityError::DecodeFailed { .. }
        ));

        let mut admin = FixedReply(Ok(json!({ "ok": 1 })));
        assert!(matches!(
            fetch_shards(&mut admin).unwrap_err(),
            ConnectivityError::DecodeFailed { .. }
        ));
    }

    #[test]
    fn test_topology_counts() {
        let topology = ClusterTopology::new(vec![
            ShardRecord::new("b", "b/h3:1"),
            ShardRecord::new("a", "a/h1:1,h2:1"),
        ]);
        assert_eq!(topology.num_shards(), 2);
        assert_eq!(topology.num_members().unwrap(), 3);
        assert_eq!(topology.get_shard("b").unwrap().host, "b/h3:1");
        assert!(topology.get_shard("c").is_none());
    }
}
