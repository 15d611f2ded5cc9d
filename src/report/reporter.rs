//! URI reporter - output formatting and export
//!
//! Supports multiple output formats:
//! - Text (one URI per line)
//! - Table
//! - JSON

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::config::OutputFormat;
use crate::resolve::{ResolvedUri, UriMode};

/// URI reporter
pub struct UriReporter {
    format: OutputFormat,
}

impl UriReporter {
    /// Create new reporter with specified format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render resolved URIs in the configured format
    pub fn render(&self, uris: &[(UriMode, ResolvedUri)]) -> String {
        match self.format {
            OutputFormat::Text => render_text(uris),
            OutputFormat::Table => render_table(uris),
            OutputFormat::Json => render_json(uris),
        }
    }

    /// Print to stdout
    pub fn print(&self, uris: &[(UriMode, ResolvedUri)]) {
        print!("{}", self.render(uris));
    }

    /// Write to a file
    pub fn write_file(&self, path: &Path, uris: &[(UriMode, ResolvedUri)]) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render(uris).as_bytes())?;
        Ok(())
    }
}

fn render_text(uris: &[(UriMode, ResolvedUri)]) -> String {
    let mut out = String::new();
    for (_, resolved) in uris {
        out.push_str(&resolved.uri);
        out.push('\n');
    }
    out
}

fn render_table(uris: &[(UriMode, ResolvedUri)]) -> String {
    use tabled::{builder::Builder, settings::Style};

    let mut builder = Builder::default();
    builder.push_record(["MODE", "SHARD", "MEMBER", "RESOLVED BY", "URI"].map(String::from));
    for (mode, resolved) in uris {
        builder.push_record([
            mode.as_str().to_string(),
            resolved.shard.clone(),
            resolved
                .member
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".to_string()),
            resolved
                .strategy
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| "-".to_string()),
            resolved.uri.clone(),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::sharp());
    format!("{}\n", table)
}

fn render_json(uris: &[(UriMode, ResolvedUri)]) -> String {
    let json = serde_json::json!({
        "uris": uris.iter().map(|(mode, resolved)| {
            serde_json::json!({
                "mode": mode.as_str(),
                "shard": resolved.shard,
                "replica_set": resolved.replica_set,
                "member": resolved.member.as_ref().map(|m| m.to_string()),
                "resolved_by": resolved.strategy.map(|s| s.as_str()),
                "uri": resolved.uri,
            })
        }).collect::<Vec<_>>()
    });
    format!("{}\n", serde_json::to_string_pretty(&json).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::shard::HostEntry;
    use crate::resolve::Strategy;

    fn sample() -> Vec<(UriMode, ResolvedUri)> {
        vec![
            (
                UriMode::Discovery,
                ResolvedUri {
                    shard: "shard01".to_string(),
                    replica_set: "shard01".to_string(),
                    member: None,
                    strategy: None,
                    uri: "mongodb://h1:27018,h2:27018/admin?replicaSet=shard01".to_string(),
                },
            ),
            (
                UriMode::Direct,
                ResolvedUri {
                    shard: "shard01".to_string(),
                    replica_set: "shard01".to_string(),
                    member: Some(HostEntry {
                        host: "h1".to_string(),
                        port: Some("27018".to_string()),
                    }),
                    strategy: Some(Strategy::Identity),
                    uri: "mongodb://h1:27018/?replicaSet=shard01".to_string(),
                },
            ),
        ]
    }

    #[test]
    fn test_text_output() {
        let out = UriReporter::new(OutputFormat::Text).render(&sample());
        assert_eq!(
            out,
            "mongodb://h1:27018,h2:27018/admin?replicaSet=shard01\nmongodb://h1:27018/?replicaSet=shard01\n"
        );
    }

    #[test]
    fn test_json_output() {
        let out = UriReporter::new(OutputFormat::Json).render(&sample());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let uris = value["uris"].as_array().unwrap();
        assert_eq!(uris.len(), 2);
        assert_eq!(uris[0]["mode"], "discovery");
        assert!(uris[0]["member"].is_null());
        assert_eq!(uris[1]["member"], "h1:27018");
        assert_eq!(uris[1]["resolved_by"], "identity");
    }

    #[test]
    fn test_table_output() {
        let out = UriReporter::new(OutputFormat::Table).render(&sample());
        assert!(out.contains("RESOLVED BY"));
        assert!(out.contains("mongodb://h1:27018/?replicaSet=shard01"));
        assert!(out.contains("identity"));
    }

    #[test]
    fn test_write_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uris.txt");
        UriReporter::new(OutputFormat::Text)
            .write_file(&path, &sample())
            .unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 2);
    }
}
