//! Per-request decision.
//!
//! # Decision Chain
//! ```text
//! method not filtered            → Proceed
//! not browser-like user agent    → Proceed
//! referrer missing or blank      → allow-empty ? Proceed : Reject
//! referrer relative              → Proceed
//! referrer invalid               → Reject
//! referrer host == server name   → Proceed
//! allow-list match               → Proceed
//! otherwise                      → Reject
//! ```

use std::borrow::Cow;

use axum::http::{header, Request};

use crate::filter::referrer::{self, ParsedReferrer};
use crate::filter::snapshot::FilterSnapshot;

/// User-agent substrings that mark a request as coming from a browser.
const BROWSER_MARKERS: [&str; 2] = ["Mozilla", "Opera"];

/// Why a request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyReferrer,
    InvalidReferrer,
    UntrustedReferrer,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::EmptyReferrer => "empty_referrer",
            Rejection::InvalidReferrer => "invalid_referrer",
            Rejection::UntrustedReferrer => "untrusted_referrer",
        }
    }
}

/// Outcome handed back to the interception layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Proceed,
    /// Terminate with 403; the downstream chain must not run.
    Reject(Rejection),
}

impl Verdict {
    pub fn is_reject(&self) -> bool {
        matches!(self, Verdict::Reject(_))
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Proceed => "proceed",
            Verdict::Reject(reason) => reason.as_str(),
        }
    }
}

/// The parts of a request the decision looks at.
#[derive(Debug, Clone, Default)]
pub struct RequestFacts<'a> {
    pub method: &'a str,
    pub path: &'a str,
    /// Host the request was addressed to, without port.
    pub server_name: Option<&'a str>,
    pub user_agent: Option<Cow<'a, str>>,
    pub referrer: Option<Cow<'a, str>>,
}

impl<'a> RequestFacts<'a> {
    pub fn from_request<B>(request: &'a Request<B>) -> Self {
        let headers = request.headers();
        let lossy = move |name: header::HeaderName| {
            headers
                .get(name)
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
        };

        Self {
            method: request.method().as_str(),
            path: request.uri().path(),
            server_name: server_name(request),
            user_agent: lossy(header::USER_AGENT),
            referrer: lossy(header::REFERER),
        }
    }
}

/// Host from the request target, falling back to the `Host` header with
/// any port removed.
fn server_name<B>(request: &Request<B>) -> Option<&str> {
    let name = match request.uri().host() {
        Some(host) => host,
        None => {
            let host = request.headers().get(header::HOST)?.to_str().ok()?;
            if host.starts_with('[') {
                host.find(']').map_or(host, |end| &host[..=end])
            } else {
                host.split(':').next().unwrap_or(host)
            }
        }
    };
    (!name.is_empty()).then_some(name)
}

/// Heuristic: the user agent names a Mozilla- or Opera-class browser and is
/// not explicitly excluded.
pub fn is_browser_request(snapshot: &FilterSnapshot, user_agent: Option<&str>) -> bool {
    user_agent.is_some_and(|agent| {
        BROWSER_MARKERS.iter().any(|marker| agent.contains(marker))
            && !snapshot.is_excluded_agent(agent)
    })
}

/// Decide whether a request may continue.
pub fn evaluate(snapshot: &FilterSnapshot, facts: &RequestFacts<'_>) -> Verdict {
    if !snapshot.is_filtered_method(facts.method) {
        return Verdict::Proceed;
    }
    if !is_browser_request(snapshot, facts.user_agent.as_deref()) {
        return Verdict::Proceed;
    }
    check_referrer(snapshot, facts)
}

fn check_referrer(snapshot: &FilterSnapshot, facts: &RequestFacts<'_>) -> Verdict {
    let raw = match facts.referrer.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => {
            if snapshot.allow_empty() {
                return Verdict::Proceed;
            }
            tracing::info!(
                method = %facts.method,
                path = %facts.path,
                "Rejected empty referrer header"
            );
            return Verdict::Reject(Rejection::EmptyReferrer);
        }
    };

    let origin = match referrer::parse(raw) {
        ParsedReferrer::Relative => return Verdict::Proceed,
        ParsedReferrer::Invalid => {
            tracing::info!(
                method = %facts.method,
                path = %facts.path,
                referrer = %raw,
                "Rejected illegal referrer header"
            );
            return Verdict::Reject(Rejection::InvalidReferrer);
        }
        ParsedReferrer::Origin(origin) => origin,
    };

    if facts.server_name == Some(origin.host.as_str()) {
        return Verdict::Proceed;
    }

    if snapshot.allow_list().is_allowed(&origin) {
        Verdict::Proceed
    } else {
        tracing::info!(
            method = %facts.method,
            path = %facts.path,
            referrer = %raw,
            "Rejected referrer header"
        );
        Verdict::Reject(Rejection::UntrustedReferrer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use axum::body::Body;

    const FIREFOX: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

    fn snapshot(config: FilterConfig) -> FilterSnapshot {
        FilterSnapshot::build(&config, ["http://localhost:0", "https://localhost:0"])
    }

    fn facts<'a>(method: &'a str, referrer: Option<&'a str>) -> RequestFacts<'a> {
        RequestFacts {
            method,
            path: "/content/page",
            server_name: Some("app.internal"),
            user_agent: Some(Cow::Borrowed(FIREFOX)),
            referrer: referrer.map(Cow::Borrowed),
        }
    }

    #[test]
    fn test_unfiltered_method_proceeds() {
        let snapshot = snapshot(FilterConfig::default());
        assert_eq!(
            evaluate(&snapshot, &facts("GET", Some("http://evil.test/"))),
            Verdict::Proceed
        );
    }

    #[test]
    fn test_non_browser_proceeds() {
        let snapshot = snapshot(FilterConfig::default());
        let mut request = facts("POST", Some("http://evil.test/"));
        request.user_agent = Some(Cow::Borrowed("curl/7.0"));
        assert_eq!(evaluate(&snapshot, &request), Verdict::Proceed);
        request.user_agent = None;
        assert_eq!(evaluate(&snapshot, &request), Verdict::Proceed);
        request.user_agent = Some(Cow::Borrowed("Opera/9.80"));
        assert!(evaluate(&snapshot, &request).is_reject());
    }

    #[test]
    fn test_excluded_agent_proceeds() {
        let snapshot = snapshot(FilterConfig {
            exclude_agents_regexp: vec![".*Firefox/128.*".into()],
            ..FilterConfig::default()
        });
        assert_eq!(
            evaluate(&snapshot, &facts("POST", Some("http://evil.test/"))),
            Verdict::Proceed
        );
    }

    #[test]
    fn test_empty_referrer_policy() {
        let deny = snapshot(FilterConfig::default());
        assert_eq!(
            evaluate(&deny, &facts("DELETE", None)),
            Verdict::Reject(Rejection::EmptyReferrer)
        );
        assert_eq!(
            evaluate(&deny, &facts("DELETE", Some("   "))),
            Verdict::Reject(Rejection::EmptyReferrer)
        );

        let allow = snapshot(FilterConfig {
            allow_empty: true,
            ..FilterConfig::default()
        });
        assert_eq!(evaluate(&allow, &facts("DELETE", Some(""))), Verdict::Proceed);
    }

    #[test]
    fn test_relative_referrer_proceeds() {
        let snapshot = snapshot(FilterConfig::default());
        assert_eq!(
            evaluate(&snapshot, &facts("PUT", Some("/relative/path"))),
            Verdict::Proceed
        );
    }

    #[test]
    fn test_invalid_referrer_rejected() {
        let snapshot = snapshot(FilterConfig {
            allow_hosts_regexp: vec![".*".into()],
            ..FilterConfig::default()
        });
        assert_eq!(
            evaluate(&snapshot, &facts("POST", Some("?://"))),
            Verdict::Reject(Rejection::InvalidReferrer)
        );
        assert_eq!(
            evaluate(&snapshot, &facts("POST", Some("http://[::1]/x"))),
            Verdict::Reject(Rejection::InvalidReferrer)
        );
    }

    #[test]
    fn test_same_origin_ignores_scheme_and_port() {
        let snapshot = snapshot(FilterConfig::default());
        for referrer in [
            "http://app.internal/form",
            "https://app.internal:9443/form",
            "gopher://app.internal:70/",
        ] {
            assert_eq!(
                evaluate(&snapshot, &facts("POST", Some(referrer))),
                Verdict::Proceed
            );
        }
    }

    #[test]
    fn test_allow_list_decides_foreign_referrers() {
        let snapshot = snapshot(FilterConfig {
            allow_hosts: vec!["example.com".into()],
            ..FilterConfig::default()
        });
        assert_eq!(
            evaluate(&snapshot, &facts("POST", Some("http://example.com/page"))),
            Verdict::Proceed
        );
        assert_eq!(
            evaluate(&snapshot, &facts("POST", Some("http://localhost:3000/"))),
            Verdict::Proceed
        );
        assert_eq!(
            evaluate(&snapshot, &facts("POST", Some("http://evil.test/"))),
            Verdict::Reject(Rejection::UntrustedReferrer)
        );
    }

    #[test]
    fn test_out_of_range_ports_still_match() {
        let snapshot = snapshot(FilterConfig {
            allow_hosts: vec!["example.com".into()],
            ..FilterConfig::default()
        });
        for referrer in [
            "http://app.internal:99999/form",
            "http://app.internal:-1/form",
            "http://example.com:70000/",
        ] {
            assert_eq!(
                evaluate(&snapshot, &facts("POST", Some(referrer))),
                Verdict::Proceed,
                "{referrer}"
            );
        }
        assert_eq!(
            evaluate(&snapshot, &facts("POST", Some("http://evil.test:70000/"))),
            Verdict::Reject(Rejection::UntrustedReferrer)
        );
    }

    #[test]
    fn test_facts_from_request() {
        let request = Request::builder()
            .method("POST")
            .uri("/submit")
            .header("host", "app.internal:8080")
            .header("user-agent", FIREFOX)
            .header("REFERER", "http://example.com/")
            .body(Body::empty())
            .unwrap();
        let facts = RequestFacts::from_request(&request);
        assert_eq!(facts.method, "POST");
        assert_eq!(facts.path, "/submit");
        assert_eq!(facts.server_name, Some("app.internal"));
        assert_eq!(facts.referrer.as_deref(), Some("http://example.com/"));
        assert_eq!(facts.user_agent.as_deref(), Some(FIREFOX));
    }

    #[test]
    fn test_server_name_sources() {
        let absolute = Request::builder()
            .uri("https://[::1]:8443/x")
            .body(())
            .unwrap();
        assert_eq!(server_name(&absolute), Some("[::1]"));

        let bracketed = Request::builder()
            .uri("/x")
            .header("host", "[fe80::1]:8080")
            .body(())
            .unwrap();
        assert_eq!(server_name(&bracketed), Some("[fe80::1]"));

        let missing = Request::builder().uri("/x").body(()).unwrap();
        assert_eq!(server_name(&missing), None);
    }
}
