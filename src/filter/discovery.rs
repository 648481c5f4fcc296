//! Default allow-list entries for this machine.
//!
//! Every address bound to a local interface is trusted for `http` and
//! `https` on any port, plus the loopback names. Enumeration failures are
//! logged and only the loopback entries are returned.

use std::collections::BTreeSet;
use std::net::IpAddr;

use crate::filter::origin::WILDCARD_PORT;

const SCHEMES: [&str; 2] = ["http", "https"];

const LOOPBACK_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "[::1]"];

/// Enumerate local interfaces and return origin strings such as
/// `http://192.168.1.5:0` and `https://[fe80::1]:0`.
pub fn local_origins() -> BTreeSet<String> {
    let addresses: Vec<IpAddr> = match if_addrs::get_if_addrs() {
        Ok(interfaces) => interfaces
            .into_iter()
            .map(|iface| {
                tracing::debug!(interface = %iface.name, ip = %iface.ip(), "Adding allowed referrers for interface");
                iface.ip()
            })
            .collect(),
        Err(e) => {
            tracing::error!(error = %e, "Unable to detect network interfaces");
            Vec::new()
        }
    };
    origins_for(addresses)
}

/// Origin strings for the given addresses plus the loopback entries.
pub fn origins_for<I>(addresses: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = IpAddr>,
{
    let mut origins = BTreeSet::new();
    for address in addresses {
        insert_host(&mut origins, &host_literal(address));
    }
    for host in LOOPBACK_HOSTS {
        insert_host(&mut origins, host);
    }
    origins
}

fn host_literal(address: IpAddr) -> String {
    match address {
        IpAddr::V4(v4) => v4.to_string(),
        IpAddr::V6(v6) => format!("[{v6}]"),
    }
}

fn insert_host(origins: &mut BTreeSet<String>, host: &str) {
    for scheme in SCHEMES {
        origins.insert(format!("{scheme}://{host}:{WILDCARD_PORT}"));
    }
}
