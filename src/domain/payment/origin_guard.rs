//! Source-address pinning for gateway notifications.
//!
//! The notification protocol has no transport-level client authentication,
//! so both this check and the V2 hash must pass.

use std::collections::HashSet;
use std::net::IpAddr;

use crate::domain::foundation::ValidationError;

/// Published addresses of the PerfectMoney notifier hosts.
pub const DEFAULT_GATEWAY_ADDRESSES: [&str; 4] = [
    "77.109.141.170",
    "91.205.41.208",
    "94.242.216.60",
    "78.41.203.75",
];

/// Exact-match allow-list of gateway source addresses (no CIDR ranges).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginGuard {
    allowed: HashSet<IpAddr>,
}

impl OriginGuard {
    /// Builds a guard from textual addresses. Any unparseable entry fails
    /// the whole list.
    pub fn new<I, S>(addresses: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = addresses
            .into_iter()
            .map(|addr| {
                let addr = addr.as_ref().trim();
                addr.parse::<IpAddr>()
                    .map(canonical)
                    .map_err(|_| ValidationError::invalid_format("allowed_addresses", addr))
            })
            .collect::<Result<HashSet<_>, _>>()?;

        if allowed.is_empty() {
            return Err(ValidationError::empty_field("allowed_addresses"));
        }
        Ok(Self { allowed })
    }

    /// Whether `source_address` is one of the allowed hosts.
    ///
    /// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) match their IPv4 form.
    /// Absent or unparseable addresses are never allowed.
    pub fn is_allowed(&self, source_address: Option<&str>) -> bool {
        source_address
            .and_then(|addr| addr.trim().parse::<IpAddr>().ok())
            .map(|ip| self.allowed.contains(&canonical(ip)))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

impl Default for OriginGuard {
    fn default() -> Self {
        Self {
            allowed: DEFAULT_GATEWAY_ADDRESSES
                .iter()
                .filter_map(|addr| addr.parse().ok())
                .collect(),
        }
    }
}

fn canonical(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
        v4 => v4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_guard_allows_published_hosts() {
        let guard = OriginGuard::default();

        assert_eq!(guard.len(), 4);
        for addr in DEFAULT_GATEWAY_ADDRESSES {
            assert!(guard.is_allowed(Some(addr)), "{} should be allowed", addr);
        }
    }

    #[test]
    fn off_by_one_octet_is_disallowed() {
        let guard = OriginGuard::default();

        assert!(!guard.is_allowed(Some("77.109.141.171")));
        assert!(!guard.is_allowed(Some("77.109.141.169")));
        assert!(!guard.is_allowed(Some("78.41.203.76")));
    }

    #[test]
    fn unrelated_address_is_disallowed() {
        assert!(!OriginGuard::default().is_allowed(Some("10.0.0.1")));
    }

    #[test]
    fn missing_or_garbage_address_is_disallowed() {
        let guard = OriginGuard::default();

        assert!(!guard.is_allowed(None));
        assert!(!guard.is_allowed(Some("")));
        assert!(!guard.is_allowed(Some("not-an-ip")));
        assert!(!guard.is_allowed(Some("77.109.141.170/32")));
    }

    #[test]
    fn ipv4_mapped_ipv6_matches_ipv4_entry() {
        let guard = OriginGuard::default();
        assert!(guard.is_allowed(Some("::ffff:77.109.141.170")));
    }

    #[test]
    fn custom_list_replaces_defaults() {
        let guard = OriginGuard::new(["127.0.0.1"]).unwrap();

        assert!(guard.is_allowed(Some("127.0.0.1")));
        assert!(!guard.is_allowed(Some("77.109.141.170")));
    }

    #[test]
    fn custom_list_rejects_invalid_entry() {
        assert!(OriginGuard::new(["127.0.0.1", "10.0.0.0/8"]).is_err());
    }

    #[test]
    fn custom_list_rejects_empty() {
        assert!(OriginGuard::new(Vec::<String>::new()).is_err());
    }
}
