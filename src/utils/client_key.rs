//! Client identification for admission control.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Resolves the client address a request should be rate limited under.
///
/// With `behind_proxy` set, the left-most `X-Forwarded-For` entry wins, then
/// `X-Real-IP`; unparsable or missing headers fall back to the socket peer.
/// Without it, forwarding headers are ignored since any client can forge them.
///
/// # Examples
///
/// ```ignore
/// let mut headers = HeaderMap::new();
/// headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());
///
/// let ip = client_ip(&headers, "10.0.0.1:5000".parse().unwrap(), true);
/// assert_eq!(ip.to_string(), "203.0.113.7");
/// ```
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> IpAddr {
    if !behind_proxy {
        return peer.ip();
    }

    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse::<IpAddr>().ok());

    if let Some(ip) = forwarded {
        return ip;
    }

    headers
        .get(X_REAL_IP)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<IpAddr>().ok())
        .unwrap_or_else(|| peer.ip())
}

/// Builds the counter key for `operation` performed by `ip`.
pub fn rate_key(ip: IpAddr, operation: &str) -> String {
    format!("{ip}:{operation}")
}
