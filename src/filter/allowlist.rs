//! Allow-list construction and matching.
//!
//! # Data Flow
//! ```text
//! discovered origins + allow-hosts
//!     → parse_entry (bare hosts expand to http + https, wildcard port)
//!     → exact-origin table
//! allow-hosts-regexp
//!     → RegexRule::compile (anchored, whole-string)
//!     → regex table
//! ```
//!
//! # Design Decisions
//! - Bad entries are dropped with a warning, never fatal
//! - Tables are immutable once built; duplicates are harmless
//! - Host comparison is case-sensitive

use regex::Regex;
use url::Url;

use crate::filter::origin::{Origin, WILDCARD_PORT};
use crate::filter::referrer::SCHEME_SEPARATOR;

/// A compiled pattern that must match an entire input string.
#[derive(Debug, Clone)]
pub struct RegexRule {
    source: String,
    anchored: Regex,
}

impl RegexRule {
    /// Compile `source`, rejecting anything that is not a valid pattern on
    /// its own before anchoring it.
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source)?;
        let anchored = Regex::new(&format!("^(?:{source})$"))?;
        Ok(Self {
            source: source.to_string(),
            anchored,
        })
    }

    /// True only when the whole of `input` matches.
    pub fn is_full_match(&self, input: &str) -> bool {
        self.anchored.is_match(input)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }
}

/// Compile every pattern independently, skipping the ones that fail.
pub fn compile_rules(patterns: &[String], purpose: &str) -> Vec<RegexRule> {
    patterns
        .iter()
        .filter_map(|pattern| match RegexRule::compile(pattern) {
            Ok(rule) => Some(rule),
            Err(e) => {
                tracing::warn!(
                    pattern = %pattern,
                    purpose,
                    error = %e,
                    "Unable to compile pattern, skipping"
                );
                None
            }
        })
        .collect()
}

/// Exact-origin and regex tables checked against parsed referrers.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    origins: Vec<Origin>,
    patterns: Vec<RegexRule>,
}

impl AllowList {
    /// Merge discovered origins with configured hosts and patterns.
    pub fn build<I, S>(discovered: I, hosts: &[String], regexps: &[String]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut origins = Vec::new();
        let discovered: Vec<S> = discovered.into_iter().collect();
        let entries = discovered
            .iter()
            .map(|entry| entry.as_ref())
            .chain(hosts.iter().map(String::as_str));

        for entry in entries {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if entry.contains(SCHEME_SEPARATOR) {
                origins.extend(parse_entry(entry));
            } else {
                for scheme in ["http", "https"] {
                    origins.extend(parse_entry(&format!("{scheme}://{entry}:{WILDCARD_PORT}")));
                }
            }
        }

        Self {
            origins,
            patterns: compile_rules(regexps, "allow-hosts-regexp"),
        }
    }

    /// Exact match (wildcard-port aware) or whole-string regex match on the
    /// canonical form.
    pub fn is_allowed(&self, origin: &Origin) -> bool {
        self.matches_origin(origin) || self.matches_pattern(origin)
    }

    fn matches_origin(&self, origin: &Origin) -> bool {
        self.origins.iter().any(|entry| {
            entry.host == origin.host
                && entry.scheme == origin.scheme
                && (entry.is_wildcard_port() || entry.port == origin.port)
        })
    }

    fn matches_pattern(&self, origin: &Origin) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let canonical = origin.canonical();
        self.patterns.iter().any(|rule| rule.is_full_match(&canonical))
    }

    pub fn origins(&self) -> &[Origin] {
        &self.origins
    }

    pub fn patterns(&self) -> &[RegexRule] {
        &self.patterns
    }
}

/// Parse a configured `scheme://host[:port]` entry. A missing port falls
/// back to the scheme's well-known port, or the wildcard for unknown schemes.
fn parse_entry(entry: &str) -> Option<Origin> {
    let url = match Url::parse(entry) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(entry = %entry, error = %e, "Unable to parse allowed referrer, skipping");
            return None;
        }
    };
    let Some(host) = url.host_str().filter(|h| !h.is_empty()) else {
        tracing::warn!(entry = %entry, "Allowed referrer has no host, skipping");
        return None;
    };
    let port = url.port_or_known_default().map_or(WILDCARD_PORT, i32::from);
    Some(Origin::new(url.scheme(), host, port))
}
