//! Error types for shard-uri-resolver

use std::io;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connectivity error: {0}")]
    Connectivity(#[from] ConnectivityError),

    #[error("Topology integrity error: {0}")]
    Integrity(#[from] IntegrityError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// The topology command could not be issued or its reply could not be decoded
#[derive(Error, Debug)]
pub enum ConnectivityError {
    #[error("Failed to run {command}: {source}")]
    CommandFailed {
        command: String,
        source: io::Error,
    },

    #[error("{command} rejected by server (code {code}): {message}")]
    CommandRejected {
        command: String,
        code: i64,
        message: String,
    },

    #[error("Failed to decode {command} response: {reason}")]
    DecodeFailed { command: String, reason: String },
}

/// A shard record whose compound host field cannot be trusted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("Shard {shard}: host field {host:?} has no '/' separator")]
    MissingSeparator { shard: String, host: String },

    #[error("Shard {shard}: host field {host:?} has more than one '/' separator")]
    ExtraSeparator { shard: String, host: String },

    #[error("Shard {shard}: host field {host:?} has an empty replica set name")]
    EmptySetName { shard: String, host: String },

    #[error("Shard {shard}: host field lists no member hosts")]
    NoMembers { shard: String },

    #[error("Shard {shard}: malformed member host {entry:?}")]
    MalformedHost { shard: String, entry: String },
}

impl IntegrityError {
    /// Shard the fault was found in
    pub fn shard(&self) -> &str {
        match self {
            IntegrityError::MissingSeparator { shard, .. }
            | IntegrityError::ExtraSeparator { shard, .. }
            | IntegrityError::EmptySetName { shard, .. }
            | IntegrityError::NoMembers { shard }
            | IntegrityError::MalformedHost { shard, .. } => shard,
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolverError>;
