//! Immutable filter state published to request handlers.

use crate::config::FilterConfig;
use crate::filter::allowlist::{compile_rules, AllowList, RegexRule};
use crate::filter::discovery;

/// Everything a decision needs, built once per configuration load.
#[derive(Debug, Clone)]
pub struct FilterSnapshot {
    allow_list: AllowList,
    allow_empty: bool,
    filter_methods: Option<Vec<String>>,
    excluded_agents: Vec<RegexRule>,
}

impl FilterSnapshot {
    /// Build from configuration and an explicit set of default origins.
    pub fn build<I, S>(config: &FilterConfig, discovered: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allow_list = AllowList::build(
            discovered,
            &config.allow_hosts,
            &config.allow_hosts_regexp,
        );
        let snapshot = Self {
            allow_list,
            allow_empty: config.allow_empty,
            filter_methods: config.normalized_methods(),
            excluded_agents: compile_rules(&config.exclude_agents_regexp, "exclude-agents-regexp"),
        };
        tracing::info!(
            origins = snapshot.allow_list.origins().len(),
            patterns = snapshot.allow_list.patterns().len(),
            excluded_agents = snapshot.excluded_agents.len(),
            allow_empty = snapshot.allow_empty,
            methods = ?snapshot.filter_methods,
            "Referrer filter configured"
        );
        snapshot
    }

    /// Build from configuration, seeding the allow-list with this machine's
    /// addresses. Enumerates network interfaces, so keep it off the request
    /// path.
    pub fn discover(config: &FilterConfig) -> Self {
        Self::build(config, discovery::local_origins())
    }

    pub fn allow_list(&self) -> &AllowList {
        &self.allow_list
    }

    pub fn allow_empty(&self) -> bool {
        self.allow_empty
    }

    /// `None` when no method is filtered.
    pub fn filter_methods(&self) -> Option<&[String]> {
        self.filter_methods.as_deref()
    }

    pub fn excluded_agents(&self) -> &[RegexRule] {
        &self.excluded_agents
    }

    /// Case-sensitive comparison against the upper-cased configured methods.
    pub fn is_filtered_method(&self, method: &str) -> bool {
        self.filter_methods
            .as_ref()
            .is_some_and(|methods| methods.iter().any(|m| m == method))
    }

    pub fn is_excluded_agent(&self, user_agent: &str) -> bool {
        self.excluded_agents
            .iter()
            .any(|rule| rule.is_full_match(user_agent))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_methods_filtered_by_default() {
        let snapshot = FilterSnapshot::build(&FilterConfig::default(), Vec::<String>::new());
        for method in ["POST", "PUT", "DELETE", "COPY", "MOVE"] {
            assert!(snapshot.is_filtered_method(method));
        }
        assert!(!snapshot.is_filtered_method("GET"));
        assert!(!snapshot.is_filtered_method("post"));
    }

    #[test]
    fn test_disabled_filtering() {
        let config = FilterConfig {
            filter_methods: vec![String::new()],
            ..FilterConfig::default()
        };
        let snapshot = FilterSnapshot::build(&config, Vec::<String>::new());
        assert_eq!(snapshot.filter_methods(), None);
        assert!(!snapshot.is_filtered_method("POST"));
    }

    #[test]
    fn test_excluded_agents_use_whole_string_match() {
        let config = FilterConfig {
            exclude_agents_regexp: vec!["Mozilla/5.0 \\(Monitor\\).*".into(), "[".into()],
            ..FilterConfig::default()
        };
        let snapshot = FilterSnapshot::build(&config, Vec::<String>::new());
        assert_eq!(snapshot.excluded_agents().len(), 1);
        assert!(snapshot.is_excluded_agent("Mozilla/5.0 (Monitor) check/1.2"));
        assert!(!snapshot.is_excluded_agent("Prefix Mozilla/5.0 (Monitor)"));
    }
}
