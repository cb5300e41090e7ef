use std::net::IpAddr;

use axum::http::HeaderMap;
use ipnet::IpNet;

/// Resolve the submitting client's address. `X-Forwarded-For` is only trusted
/// when the direct peer is one of our proxies.
pub fn resolve(headers: &HeaderMap, peer_addr: Option<IpAddr>, trusted_proxies: &[IpNet]) -> IpAddr {
    let peer = peer_addr.unwrap_or(IpAddr::from([127, 0, 0, 1]));

    if !trusted_proxies.is_empty() && trusted_proxies.iter().any(|net| net.contains(&peer)) {
        if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            // Take the first (leftmost) IP that isn't a trusted proxy
            for ip_str in xff.split(',').map(|s| s.trim()) {
                if let Ok(ip) = ip_str.parse::<IpAddr>() {
                    if !trusted_proxies.iter().any(|net| net.contains(&ip)) {
                        return ip;
                    }
                }
            }
        }
    }

    peer
}
