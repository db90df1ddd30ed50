//! Caller address resolution for gateway notifications.

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::HeaderMap;

/// Resolves the address the notification came from.
///
/// Forwarded headers are only consulted when `trust_forwarded` is set, in
/// which case the order is:
/// 1. X-Forwarded-For header (last IP in list, the one our proxy appended)
/// 2. X-Real-IP header
/// 3. ConnectInfo socket address
///
/// Earlier X-Forwarded-For entries come from the client and are never used.
pub fn source_address(
    headers: &HeaderMap,
    connect_info: Option<&ConnectInfo<SocketAddr>>,
    trust_forwarded: bool,
) -> Option<String> {
    if trust_forwarded {
        if let Some(forwarded) = header(headers, "X-Forwarded-For") {
            if let Some(last_hop) = forwarded.rsplit(',').map(str::trim).find(|s| !s.is_empty()) {
                return Some(last_hop.to_string());
            }
        }

        if let Some(real_ip) = header(headers, "X-Real-IP") {
            return Some(real_ip.trim().to_string());
        }
    }

    connect_info.map(|ci| ci.0.ip().to_string())
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::OriginGuard;
    use axum::http::HeaderValue;

    fn peer(addr: &str) -> ConnectInfo<SocketAddr> {
        ConnectInfo(addr.parse().unwrap())
    }

    fn forwarded_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Forwarded-For",
            HeaderValue::from_static("77.109.141.170, 10.0.0.1"),
        );
        headers.insert("X-Real-IP", HeaderValue::from_static("78.41.203.75"));
        headers
    }

    #[test]
    fn untrusted_headers_are_ignored() {
        let ci = peer("10.0.0.9:4000");
        assert_eq!(
            source_address(&forwarded_headers(), Some(&ci), false).as_deref(),
            Some("10.0.0.9")
        );
    }

    #[test]
    fn trusted_forwarded_for_uses_last_hop() {
        let ci = peer("10.0.0.9:4000");
        assert_eq!(
            source_address(&forwarded_headers(), Some(&ci), true).as_deref(),
            Some("10.0.0.1")
        );
    }

    #[test]
    fn client_supplied_gateway_address_does_not_pass_origin_check() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-Forwarded-For",
            HeaderValue::from_static("77.109.141.170, 203.0.113.66"),
        );
        let ci = peer("10.0.0.2:4000");

        let resolved = source_address(&headers, Some(&ci), true);

        assert_eq!(resolved.as_deref(), Some("203.0.113.66"));
        assert!(!OriginGuard::default().is_allowed(resolved.as_deref()));
    }

    #[test]
    fn trailing_empty_forwarded_entry_is_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Forwarded-For", HeaderValue::from_static("91.205.41.208, "));

        assert_eq!(
            source_address(&headers, None, true).as_deref(),
            Some("91.205.41.208")
        );
    }

    #[test]
    fn trusted_real_ip_is_second_choice() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Real-IP", HeaderValue::from_static("78.41.203.75"));

        assert_eq!(
            source_address(&headers, None, true).as_deref(),
            Some("78.41.203.75")
        );
    }

    #[test]
    fn no_headers_and_no_peer_is_none() {
        assert!(source_address(&HeaderMap::new(), None, true).is_none());
    }
}
