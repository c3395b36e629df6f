//! Client identifier extraction.
//!
//! The quota is keyed by the caller's network address. Behind a trusted
//! reverse proxy the address comes from `X-Forwarded-For` (first hop) or
//! `X-Real-IP`; otherwise from the socket peer address.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Resolves the client identifier for a request.
///
/// Returns `None` when no address can be determined.
///
/// # Examples
///
/// ```ignore
/// let peer: SocketAddr = "10.0.0.7:51234".parse().unwrap();
/// assert_eq!(extract_client_ip(&HeaderMap::new(), Some(peer), false).unwrap(), "10.0.0.7");
/// ```
pub fn extract_client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> Option<String> {
    if behind_proxy && let Some(ip) = forwarded_ip(headers) {
        return Some(ip.to_string());
    }

    peer.map(|addr| addr.ip().to_string())
}

fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let from_forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|first| first.trim().parse::<IpAddr>().ok());

    from_forwarded.or_else(|| {
        headers
            .get(X_REAL_IP)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<IpAddr>().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> Option<SocketAddr> {
        Some("127.0.0.1:12345".parse().unwrap())
    }

    #[test]
    fn test_uses_peer_address() {
        let ip = extract_client_ip(&HeaderMap::new(), peer(), false);
        assert_eq!(ip.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_missing_peer_yields_none() {
        assert!(extract_client_ip(&HeaderMap::new(), None, false).is_none());
    }

    #[test]
    fn test_ignores_forwarded_headers_when_not_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("203.0.113.9"));

        let ip = extract_client_ip(&headers, peer(), false);
        assert_eq!(ip.as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn test_uses_first_forwarded_hop_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert(
            X_FORWARDED_FOR,
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );

        let ip = extract_client_ip(&headers, peer(), true);
        assert_eq!(ip.as_deref(), Some("203.0.113.9"));
    }

    #[test]
    fn test_falls_back_to_real_ip_header() {
        let mut headers = HeaderMap::new();
        headers.insert(X_REAL_IP, HeaderValue::from_static("2001:db8::1"));

        let ip = extract_client_ip(&headers, None, true);
        assert_eq!(ip.as_deref(), Some("2001:db8::1"));
    }

    #[test]
    fn test_garbage_forwarded_header_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert(X_FORWARDED_FOR, HeaderValue::from_static("unknown"));

        let ip = extract_client_ip(&headers, peer(), true);
        assert_eq!(ip.as_deref(), Some("127.0.0.1"));
    }
}
