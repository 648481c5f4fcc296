//! Referrer header parsing.
//!
//! # Responsibilities
//! - Classify a raw `Referer` value as relative, invalid or an origin
//! - Extract scheme, host and port without a URL library
//!
//! # Design Decisions
//! - Hand-rolled on purpose: host and port come from splitting the
//!   authority on its last colon, so an IPv6 literal without an explicit
//!   port (`http://[::1]/`) does not parse as `[::1]`. Changing that changes
//!   which referrers are accepted.
//! - Total: every input yields one of the three outcomes, never a panic.
//! - Any integer port is accepted, in or out of the TCP range; only text
//!   that is not an `i32` makes the referrer invalid.

use crate::filter::origin::{default_port, Origin};

/// Separator between scheme and authority.
pub const SCHEME_SEPARATOR: &str = "://";

/// Literal value rejected before any parsing takes place.
const MALFORMED_SENTINEL: &str = "?://";

/// Outcome of parsing a non-blank referrer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReferrer {
    /// An absolute referrer.
    Origin(Origin),
    /// No scheme separator: assumed to point back at this server.
    Relative,
    /// Malformed; the request must be denied.
    Invalid,
}

/// Parse a raw referrer header value.
///
/// Blank values are the caller's concern (see the allow-empty policy) and
/// come back as [`ParsedReferrer::Relative`] here.
pub fn parse(raw: &str) -> ParsedReferrer {
    let Some(separator) = raw.find(SCHEME_SEPARATOR) else {
        return ParsedReferrer::Relative;
    };
    if raw == MALFORMED_SENTINEL {
        return ParsedReferrer::Invalid;
    }

    let scheme = raw[..separator].to_ascii_lowercase();
    let host_start = separator + SCHEME_SEPARATOR.len();

    let host_and_path = match raw.find('?') {
        Some(query_start) => &raw[..query_start],
        None => raw,
    };
    // Query mark inside the scheme or separator.
    if host_and_path.len() < host_start {
        return ParsedReferrer::Invalid;
    }

    let after_separator = &host_and_path[host_start..];
    let authority = match after_separator.find('/') {
        Some(path_start) => &after_separator[..path_start],
        None => after_separator,
    };
    let host_port = match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    };

    match host_port.rfind(':') {
        None => {
            let port = default_port(&scheme);
            ParsedReferrer::Origin(Origin::new(scheme, host_port, port))
        }
        Some(colon) => match host_port[colon + 1..].parse::<i32>() {
            Ok(port) => ParsedReferrer::Origin(Origin::new(scheme, &host_port[..colon], port)),
            Err(_) => ParsedReferrer::Invalid,
        },
    }
}
