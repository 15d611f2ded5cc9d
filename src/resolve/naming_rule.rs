//! Managed-provider hostname naming rules
//!
//! A managed deployment may report members as
//! `prod-x-shard-00-00.wucdt.gcp.mongodb.net` while the externally
//! reachable name is `prod-x-shard-00-00-pri.wucdt.gcp.mongodb.net`.
//! Each [`NamingRule`] describes one such convention as data:
//!
//! - structural matcher: shard infix, managed domains, designation marker
//! - stripper: decoration tokens removed when deriving member identifiers
//! - synthesizer: how to rebuild the designated name from a reported one
//!
//! [`NamingRules`] evaluates its rules in order; the first rule that
//! recognizes a hostname decides.

/// First DNS label of a hostname
pub fn first_label(hostname: &str) -> &str {
    hostname.split('.').next().unwrap_or(hostname)
}

/// One provider naming convention
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRule {
    pub name: String,
    /// Infix naming a shard member, e.g. `-shard-`
    pub shard_infix: String,
    /// Width of the `NN-NN` shard/member index following the infix
    pub member_suffix_width: usize,
    /// Marker carried only by externally reachable names, e.g. `-pri`
    pub designation: String,
    /// Tokens stripped from the first label before comparing identifiers
    pub decorations: Vec<String>,
    /// Tokens dropped from the first label when synthesizing a name
    pub secondary_tokens: Vec<String>,
    /// Domain suffixes that identify the provider
    pub managed_domains: Vec<String>,
}

impl NamingRule {
    /// MongoDB Atlas private-endpoint naming
    pub fn atlas() -> Self {
        Self {
            name: "atlas".to_string(),
            shard_infix: "-shard-".to_string(),
            member_suffix_width: 5,
            designation: "-pri".to_string(),
            decorations: vec!["-wucdt".to_string(), "-pri".to_string(), "-sec".to_string()],
            secondary_tokens: vec!["-wucdt".to_string()],
            managed_domains: vec![".gcp.mongodb.net".to_string()],
        }
    }

    /// Add a decoration token that is also dropped during synthesis
    pub fn with_decoration(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        if !self.decorations.contains(&token) {
            self.decorations.push(token.clone());
        }
        if !self.secondary_tokens.contains(&token) {
            self.secondary_tokens.push(token);
        }
        self
    }

    pub fn with_managed_domain(mut self, domain: impl Into<String>) -> Self {
        let domain = domain.into();
        if !self.managed_domains.contains(&domain) {
            self.managed_domains.push(domain);
        }
        self
    }

    /// Hostname follows the shard-member naming of a managed domain
    pub fn is_managed(&self, hostname: &str) -> bool {
        hostname.contains(&self.shard_infix)
            && self
                .managed_domains
                .iter()
                .any(|domain| hostname.ends_with(domain.as_str()))
    }

    /// Position of the designation marker in the first label, when present
    /// as a whole token (followed by `-` or the end of the label)
    fn designation_at(&self, hostname: &str) -> Option<usize> {
        let label = first_label(hostname);
        label.match_indices(&self.designation).find_map(|(idx, m)| {
            let rest = &label[idx + m.len()..];
            (rest.is_empty() || rest.starts_with('-')).then_some(idx)
        })
    }

    pub fn has_designation(&self, hostname: &str) -> bool {
        self.designation_at(hostname).is_some()
    }

    /// Seed host carries a marker of this convention
    pub fn marks(&self, hostname: &str) -> bool {
        self.has_designation(hostname) || self.is_managed(hostname)
    }

    /// Direct-map key for a designated seed: its first label up to the marker
    pub fn seed_key(&self, hostname: &str) -> Option<String> {
        let idx = self.designation_at(hostname)?;
        let key = &first_label(hostname)[..idx];
        (!key.is_empty()).then(|| key.to_string())
    }

    /// Member identifier, when the first label contains the shard infix
    ///
    /// `prod-x-shard-00-01-wucdt` becomes `prod-x-shard-00-01`.
    pub fn member_identifier(&self, hostname: &str) -> Option<String> {
        let label = first_label(hostname);
        if !label.contains(&self.shard_infix) {
            return None;
        }

        let cleaned = self
            .decorations
            .iter()
            .fold(label.to_string(), |acc, token| acc.replace(token.as_str(), ""));

        let Some(idx) = cleaned.find(&self.shard_infix).filter(|&idx| idx > 0) else {
            return Some(cleaned);
        };

        let end = idx + self.shard_infix.len();
        let has_member_index = cleaned[end..]
            .get(..self.member_suffix_width)
            .is_some_and(|suffix| suffix.contains('-'));

        if has_member_index {
            Some(cleaned[..end + self.member_suffix_width].to_string())
        } else {
            Some(cleaned)
        }
    }

    /// Externally reachable form of a managed hostname lacking the marker
    ///
    /// `prod-x-shard-00-00-wucdt.gcp.mongodb.net` becomes
    /// `prod-x-shard-00-00-pri.gcp.mongodb.net`.
    pub fn synthesize(&self, hostname: &str) -> Option<String> {
        if !self.is_managed(hostname) || self.has_designation(hostname) {
            return None;
        }

        let (label, domain) = hostname.split_once('.')?;
        let cleaned = self
            .secondary_tokens
            .iter()
            .fold(label.to_string(), |acc, token| acc.replace(token.as_str(), ""));

        Some(format!("{}{}.{}", cleaned, self.designation, domain))
    }
}

/// Ordered rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingRules {
    rules: Vec<NamingRule>,
}

impl Default for NamingRules {
    fn default() -> Self {
        Self::new(vec![NamingRule::atlas()])
    }
}

impl NamingRules {
    pub fn new(rules: Vec<NamingRule>) -> Self {
        Self { rules }
    }

    /// Empty table: every hostname is its own identifier
    pub fn none() -> Self {
        Self::new(Vec::new())
    }

    pub fn push(&mut self, rule: NamingRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[NamingRule] {
        &self.rules
    }

    /// Any rule recognizes a provider marker on this seed host
    pub fn marks(&self, hostname: &str) -> bool {
        self.rules.iter().any(|rule| rule.marks(hostname))
    }

    pub fn seed_key(&self, hostname: &str) -> Option<String> {
        self.rules.iter().find_map(|rule| rule.seed_key(hostname))
    }

    /// Member identifier from the first matching rule, else the first label
    pub fn identifier(&self, hostname: &str) -> String {
        self.rules
            .iter()
            .find_map(|rule| rule.member_identifier(hostname))
            .unwrap_or_else(|| first_label(hostname).to_string())
    }

    pub fn synthesize(&self, hostname: &str) -> Option<String> {
        self.rules.iter().find_map(|rule| rule.synthesize(hostname))
    }
}
