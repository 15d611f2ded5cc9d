//! Parsed connection configuration
//!
//! Holds everything the resolver reads from the user's original connection
//! string. The raw string itself is never re-parsed here.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::tls_config::TlsConfig;
use crate::utils::ResolverError;

/// How the user's seed list was meant to be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryScheme {
    /// `mongodb://` with an explicit host list
    #[default]
    Standard,
    /// `mongodb+srv://` with a single DNS seed name
    Srv,
}

impl DiscoveryScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscoveryScheme::Standard => "mongodb",
            DiscoveryScheme::Srv => "mongodb+srv",
        }
    }
}

/// One read-preference tag set, key order preserved
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct TagSet(pub Vec<(String, String)>);

impl TagSet {
    /// Parse `"dc:east,rack:1"`; the empty string is the empty tag set
    pub fn parse(s: &str) -> Result<Self, String> {
        if s.is_empty() {
            return Ok(Self::default());
        }
        s.split(',')
            .map(|pair| match pair.split_once(':') {
                Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
                _ => Err(format!("invalid read preference tag {pair:?}, expected key:value")),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(TagSet)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<String> for TagSet {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{k}:{v}")?;
        }
        Ok(())
    }
}

/// Write concern; the numeric form wins when both are set
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WriteConcern {
    pub number: Option<i32>,
    pub tag: Option<String>,
}

impl WriteConcern {
    /// Parse a `w` value: integers become the numeric form
    pub fn parse(s: &str) -> Self {
        match s.parse::<i32>() {
            Ok(n) => Self {
                number: Some(n),
                tag: None,
            },
            Err(_) => Self {
                number: None,
                tag: Some(s.to_string()),
            },
        }
    }

    /// Value for the `w` query parameter
    pub fn value(&self) -> Option<String> {
        match (&self.number, &self.tag) {
            (Some(n), _) => Some(n.to_string()),
            (None, Some(tag)) if !tag.is_empty() => Some(tag.clone()),
            _ => None,
        }
    }
}

/// Connection configuration, immutable during resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub database: String,
    pub auth_source: Option<String>,
    pub tls: TlsConfig,
    pub read_preference: Option<String>,
    pub read_preference_tags: Vec<TagSet>,
    pub write_concern: WriteConcern,
    pub retry_reads: bool,
    pub retry_writes: bool,
    pub scheme: DiscoveryScheme,
    /// Seed hosts as the user typed them, before any SRV expansion
    pub seed_hosts: Vec<String>,
}

/// Characters that would break the userinfo section if left unescaped
const USERNAME_RESERVED: &[char] = &[':', '@', '/', '?', '#', '[', ']', '%'];

impl ConnectionConfig {
    /// Load a YAML connection profile
    pub fn from_yaml_file(path: &Path) -> Result<Self, ResolverError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
            .map_err(|e| ResolverError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, String> {
        let config: Self = serde_yaml::from_str(yaml).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Username, if one is set and non-empty
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref().filter(|u| !u.is_empty())
    }

    pub fn has_credentials(&self) -> bool {
        self.username().is_some()
    }

    pub fn is_srv(&self) -> bool {
        self.scheme == DiscoveryScheme::Srv
    }

    /// Validate field combinations
    pub fn validate(&self) -> Result<(), String> {
        if let Some(user) = self.username() {
            if let Some(c) = user.chars().find(|c| USERNAME_RESERVED.contains(c)) {
                return Err(format!("username contains reserved character {c:?}"));
            }
        }

        if self.password.is_some() && !self.has_credentials() {
            return Err("a password requires a username".to_string());
        }

        if self.is_srv() && self.seed_hosts.len() != 1 {
            return Err(format!(
                "SRV discovery expects exactly one seed host, got {}",
                self.seed_hosts.len()
            ));
        }

        if self.database.contains(['/', '?']) {
            return Err(format!("invalid database name {:?}", self.database));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_set_parse() {
        let tags = TagSet::parse("dc:east,rack:r1").unwrap();
        assert_eq!(
            tags.0,
            vec![
                ("dc".to_string(), "east".to_string()),
                ("rack".to_string(), "r1".to_string())
            ]
        );
        assert_eq!(tags.to_string(), "dc:east,rack:r1");
        assert!(TagSet::parse("").unwrap().is_empty());
        assert!(TagSet::parse("dc").is_err());
        assert!(TagSet::parse(":east").is_err());
    }

    #[test]
    fn test_write_concern_numeric_wins() {
        let wc = WriteConcern {
            number: Some(2),
            tag: Some("majority".to_string()),
        };
        assert_eq!(wc.value().as_deref(), Some("2"));
        assert_eq!(WriteConcern::parse("majority").value().as_deref(), Some("majority"));
        assert_eq!(WriteConcern::parse("0").number, Some(0));
        assert_eq!(WriteConcern::default().value(), None);
    }

    #[test]
    fn test_empty_username_is_no_credentials() {
        let config = ConnectionConfig {
            username: Some(String::new()),
            ..Default::default()
        };
        assert!(!config.has_credentials());
    }

    #[test]
    fn test_validate_rejects_reserved_username() {
        let config = ConnectionConfig {
            username: Some("ops@corp".to_string()),
            password: Some("x".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_srv_needs_one_seed() {
        let mut config = ConnectionConfig {
            scheme: DiscoveryScheme::Srv,
            seed_hosts: vec!["a.example.net".to_string(), "b.example.net".to_string()],
            ..Default::default()
        };
        assert!(config.validate().is_err());
        config.seed_hosts.truncate(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_yaml() {
        let yaml = r#"
username: reporter
password: "p@ss word"
database: admin
scheme: srv
seed_hosts: ["prod-x.wucdt.mongodb.net"]
tls:
  enabled: true
  ca_file: /etc/ssl/ca.pem
read_preference: secondaryPreferred
read_preference_tags: ["dc:east", ""]
write_concern:
  tag: majority
retry_writes: true
"#;
        let config = ConnectionConfig::from_yaml_str(yaml).unwrap();
        assert!(config.is_srv());
        assert_eq!(config.username(), Some("reporter"));
        assert!(config.tls.enabled);
        assert_eq!(config.read_preference_tags.len(), 2);
        assert!(config.read_preference_tags[1].is_empty());
        assert_eq!(config.write_concern.value().as_deref(), Some("majority"));
        assert!(config.retry_writes);
        assert!(!config.retry_reads);
    }

    #[test]
    fn test_from_yaml_file_missing() {
        let err = ConnectionConfig::from_yaml_file(Path::new("/nonexistent/profile.yaml"))
            .unwrap_err();
        assert!(matches!(err, ResolverError::Io(_)));
    }
}
