//! Outbound host checks
//!
//! Every URL the fetcher requests, redirect targets included, passes through
//! [`check_host`] first. Loopback, private, link-local and internal hosts are
//! refused unless private hosts are allowed.

use reqwest::Url;
use std::net::{IpAddr, Ipv6Addr};
use tokio::net::lookup_host;

use crate::fetcher::FetchError;

pub async fn check_host(url: &Url, allow_private_hosts: bool) -> Result<(), FetchError> {
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(FetchError::BlockedHost(format!(
                "unsupported scheme: {}",
                other
            )))
        }
    }

    let host = url
        .host_str()
        .ok_or_else(|| FetchError::BlockedHost("URL has no host".to_string()))?;

    if allow_private_hosts {
        return Ok(());
    }

    // IPv6 literals keep their brackets in host_str.
    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if let Ok(ip) = bare.parse::<IpAddr>() {
        if is_private_ip(&ip) {
            return Err(FetchError::BlockedHost(format!(
                "{} is a private address",
                host
            )));
        }
        return Ok(());
    }

    if is_internal_hostname(&bare.to_lowercase()) {
        return Err(FetchError::BlockedHost(format!(
            "{} is an internal hostname",
            host
        )));
    }

    let port = url.port_or_known_default().unwrap_or(80);
    let addrs: Vec<_> = lookup_host((bare, port))
        .await
        .map_err(|e| {
            tracing::warn!(host = %host, error = %e, "Failed to resolve host");
            FetchError::Resolve {
                host: host.to_string(),
                source: e,
            }
        })?
        .collect();

    if let Some(addr) = addrs.iter().find(|a| is_private_ip(&a.ip())) {
        return Err(FetchError::BlockedHost(format!(
            "{} resolves to private address {}",
            host,
            addr.ip()
        )));
    }

    Ok(())
}

fn is_internal_hostname(host: &str) -> bool {
    host == "localhost"
        || host.ends_with(".localhost")
        || host.ends_with(".local")
        || host.ends_with(".internal")
        || host.ends_with(".corp")
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            let octets = v4.octets();
            v4.is_loopback()
                || v4.is_private()
                || v4.is_link_local()
                || v4.is_broadcast()
                || v4.is_unspecified()
                || v4.is_multicast()
                || octets[0] == 0
                // 100.64.0.0/10 (CGNAT)
                || (octets[0] == 100 && (octets[1] & 0xc0) == 64)
        }
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                return is_private_ip(&IpAddr::V4(v4));
            }
            v6.is_loopback()
                || v6.is_unspecified()
                || v6.is_multicast()
                || is_ipv6_link_local(v6)
                || is_ipv6_unique_local(v6)
        }
    }
}

/// fe80::/10
fn is_ipv6_link_local(ip: &Ipv6Addr) -> bool {
    ip.segments()[0] & 0xffc0 == 0xfe80
}

/// fc00::/7
fn is_ipv6_unique_local(ip: &Ipv6Addr) -> bool {
    ip.segments()[0] & 0xfe00 == 0xfc00
}
