//! Admin handle backed by a captured reply document
//!
//! Lets the resolver run offline against the output of
//! `db.adminCommand({ listShards: 1 })` saved as JSON.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::debug;

use super::admin::{command_name, AdminCommand, ADMIN_DB};

/// Answers `listShards` from a JSON file
#[derive(Debug, Clone)]
pub struct SnapshotAdmin {
    path: PathBuf,
    reply: Value,
}

impl SnapshotAdmin {
    /// Load a captured reply
    ///
    /// Accepts either the full reply document or a bare array of shard
    /// documents.
    pub fn open(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        let parsed: Value = serde_json::from_str(&text).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: invalid JSON: {}", path.display(), e),
            )
        })?;
        debug!("Loaded topology snapshot from {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            reply: normalize_reply(parsed),
        })
    }

    /// Build from an in-memory reply document
    pub fn from_reply(reply: Value) -> Self {
        Self {
            path: PathBuf::new(),
            reply: normalize_reply(reply),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn normalize_reply(reply: Value) -> Value {
    match reply {
        Value::Array(shards) => json!({ "ok": 1, "shards": shards }),
        other => other,
    }
}

impl AdminCommand for SnapshotAdmin {
    fn run_command(&mut self, database: &str, command: &Value) -> io::Result<Value> {
        match (database, command_name(command)) {
            (ADMIN_DB, Some("listShards")) => Ok(self.reply.clone()),
            (ADMIN_DB, Some("ping")) => Ok(json!({ "ok": 1 })),
            (db, name) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!(
                    "snapshot {} cannot answer {} on database {}",
                    self.path.display(),
                    name.unwrap_or("<empty command>"),
                    db
                ),
            )),
        }
    }
}
