//! Command-line argument parsing
//!
//! Connection flags mirror the options of a standard connection string.
//! Arguments are grouped by category.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use super::connection_config::{ConnectionConfig, DiscoveryScheme, TagSet, WriteConcern};
use crate::resolve::{NamingRule, NamingRules, UriMode};

/// Generate per-shard and per-node connection URIs for a sharded cluster
#[derive(Parser, Debug, Clone)]
#[command(name = "shard-uris")]
#[command(version, about, long_about = None)]
#[command(disable_help_flag = true)]
pub struct CliArgs {
    /// Print help information
    #[arg(long = "help", action = clap::ArgAction::Help)]
    help: Option<bool>,

    // ===== Topology =====
    /// Captured listShards reply (JSON)
    #[arg(short = 't', long = "topology")]
    pub topology: PathBuf,

    // ===== Connection Options =====
    /// YAML connection profile; flags below override it
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Seed host as given in the original connection string (repeatable)
    #[arg(short = 'h', long = "host", action = clap::ArgAction::Append)]
    pub hosts: Vec<String>,

    /// Original connection string used mongodb+srv
    #[arg(long = "srv")]
    pub srv: bool,

    /// Username
    #[arg(short = 'u', long = "user")]
    pub username: Option<String>,

    /// Password (requires --user)
    #[arg(short = 'a', long = "auth")]
    pub password: Option<String>,

    /// Database placed in discovery URIs
    #[arg(long = "db")]
    pub database: Option<String>,

    /// Database to authenticate against
    #[arg(long = "auth-source")]
    pub auth_source: Option<String>,

    // ===== TLS Options =====
    /// Enable TLS
    #[arg(long = "tls")]
    pub tls: bool,

    /// CA file for TLS
    #[arg(long = "tls-ca-file")]
    pub tls_ca_file: Option<PathBuf>,

    /// Client certificate and key file for TLS
    #[arg(long = "tls-cert-key-file")]
    pub tls_cert_key_file: Option<PathBuf>,

    /// Skip TLS certificate and hostname verification (insecure)
    #[arg(long = "tls-insecure")]
    pub tls_insecure: bool,

    // ===== Read / Write Options =====
    /// Read preference mode
    #[arg(long = "read-preference")]
    pub read_preference: Option<String>,

    /// Read preference tag set, e.g. "dc:east,rack:1" (repeatable)
    #[arg(long = "read-preference-tags", action = clap::ArgAction::Append)]
    pub read_preference_tags: Vec<String>,

    /// Write concern: a number or a name such as "majority"
    #[arg(short = 'w', long = "write-concern")]
    pub write_concern: Option<String>,

    /// Add retryReads=true
    #[arg(long = "retry-reads")]
    pub retry_reads: bool,

    /// Add retryWrites=true
    #[arg(long = "retry-writes")]
    pub retry_writes: bool,

    // ===== Hostname Rules =====
    /// Extra decoration token stripped from provider hostnames (repeatable)
    #[arg(long = "decoration-token", action = clap::ArgAction::Append, allow_hyphen_values = true)]
    pub decoration_tokens: Vec<String>,

    /// Extra managed domain suffix, e.g. ".aws.mongodb.net" (repeatable)
    #[arg(long = "managed-domain", action = clap::ArgAction::Append)]
    pub managed_domains: Vec<String>,

    // ===== Output Options =====
    /// Which URIs to generate
    #[arg(short = 'm', long = "mode", value_enum, default_value_t = OutputMode::All)]
    pub mode: OutputMode,

    /// Output format
    #[arg(long = "output-format", value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// URI modes to generate
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// One URI per shard
    Discovery,
    /// One URI per member node
    Direct,
    /// Both, discovery first
    #[default]
    All,
}

impl OutputMode {
    pub fn uri_modes(&self) -> Vec<UriMode> {
        match self {
            OutputMode::Discovery => vec![UriMode::Discovery],
            OutputMode::Direct => vec![UriMode::Direct],
            OutputMode::All => vec![UriMode::Discovery, UriMode::Direct],
        }
    }
}

/// Output format for results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Table,
    Json,
}

impl CliArgs {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.password.is_some() && self.username.is_none() && self.config.is_none() {
            return Err("--auth requires --user".to_string());
        }

        if self.srv && self.hosts.len() > 1 {
            return Err("--srv takes a single --host".to_string());
        }

        if self.quiet && self.verbose {
            return Err("--quiet and --verbose are mutually exclusive".to_string());
        }

        for tags in &self.read_preference_tags {
            TagSet::parse(tags)?;
        }

        Ok(())
    }

    /// Apply flags on top of a base configuration (a profile or the default)
    pub fn to_connection_config(&self, base: ConnectionConfig) -> Result<ConnectionConfig, String> {
        self.validate()?;
        let mut config = base;

        if !self.hosts.is_empty() {
            config.seed_hosts = self.hosts.clone();
        }
        if self.srv {
            config.scheme = DiscoveryScheme::Srv;
        }
        if let Some(ref user) = self.username {
            config.username = Some(user.clone());
        }
        if let Some(ref password) = self.password {
            config.password = Some(password.clone());
        }
        if let Some(ref db) = self.database {
            config.database = db.clone();
        }
        if let Some(ref source) = self.auth_source {
            config.auth_source = Some(source.clone());
        }

        config.tls.enabled |= self.tls;
        config.tls.insecure |= self.tls_insecure;
        if let Some(ref ca) = self.tls_ca_file {
            config.tls.ca_file = Some(ca.clone());
        }
        if let Some(ref cert) = self.tls_cert_key_file {
            config.tls.cert_key_file = Some(cert.clone());
        }

        if let Some(ref pref) = self.read_preference {
            config.read_preference = Some(pref.clone());
        }
        if !self.read_preference_tags.is_empty() {
            config.read_preference_tags = self
                .read_preference_tags
                .iter()
                .map(|t| TagSet::parse(t))
                .collect::<Result<Vec<_>, _>>()?;
        }
        if let Some(ref w) = self.write_concern {
            config.write_concern = WriteConcern::parse(w);
        }
        config.retry_reads |= self.retry_reads;
        config.retry_writes |= self.retry_writes;

        config.validate()?;
        Ok(config)
    }

    /// Default rule table extended with the rule flags
    pub fn naming_rules(&self) -> NamingRules {
        let rule = self
            .decoration_tokens
            .iter()
            .fold(NamingRule::atlas(), |rule, token| rule.with_decoration(token.as_str()));
        let rule = self
            .managed_domains
            .iter()
            .fold(rule, |rule, domain| rule.with_managed_domain(domain.as_str()));
        NamingRules::new(vec![rule])
    }
}
