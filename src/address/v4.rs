//! IPv4 address arithmetic.

use ipnet::Ipv4Net;
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::Ipv4Addr;

/// Exactly four dot-separated decimal octets in 0-255.
static IPV4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .expect("valid regex: ipv4")
});

/// Check that `ip` is a dotted-quad IPv4 address.
pub fn is_valid(ip: &str) -> bool {
    IPV4_PATTERN.is_match(ip)
}

/// Convert a dotted-quad address into its 32-bit value in network byte order.
///
/// Returns `None` for anything that is not four decimal octets.
pub fn to_u32(ip: &str) -> Option<u32> {
    let mut parts = ip.trim().split('.');
    let mut value = 0u32;

    for _ in 0..4 {
        let part = parts.next()?;
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let octet: u8 = part.parse().ok()?;
        value = (value << 8) | u32::from(octet);
    }

    if parts.next().is_some() {
        return None;
    }
    Some(value)
}

/// Check whether `ip` lies inside `cidr` (e.g. `66.249.64.0/19`).
///
/// Host bits set in the base address are ignored.
pub fn matches_cidr(ip: &str, cidr: &str) -> bool {
    let Some(addr) = to_u32(ip).map(Ipv4Addr::from) else {
        return false;
    };
    cidr.trim()
        .parse::<Ipv4Net>()
        .is_ok_and(|net| net.contains(&addr))
}

/// Check whether `ip` lies inside an explicit `start-end` range, inclusive.
pub fn matches_range(ip: &str, range: &str) -> bool {
    let Some((start, end)) = range.split_once('-') else {
        return false;
    };
    match (to_u32(ip), to_u32(start), to_u32(end)) {
        (Some(addr), Some(start), Some(end)) => (start..=end).contains(&addr),
        _ => false,
    }
}

/// Check whether two IPv4 addresses are the same address.
pub fn matches_exact(ip: &str, other: &str) -> bool {
    match (to_u32(ip), to_u32(other)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(is_valid("66.249.64.1"));
        assert!(is_valid("0.0.0.0"));
        assert!(is_valid("255.255.255.255"));
        assert!(!is_valid("256.1.1.1"));
        assert!(!is_valid("1.2.3"));
        assert!(!is_valid("1.2.3.4.5"));
        assert!(!is_valid("not-an-ip"));
        assert!(!is_valid(" 1.2.3.4"));
        assert!(!is_valid("2001:db8::1"));
    }

    #[test]
    fn test_to_u32() {
        assert_eq!(to_u32("0.0.0.0"), Some(0));
        assert_eq!(to_u32("192.0.2.1"), Some(0xC000_0201));
        assert_eq!(to_u32("255.255.255.255"), Some(u32::MAX));
        assert_eq!(to_u32("1.2.3"), None);
        assert_eq!(to_u32("1.2.3.4.5"), None);
        assert_eq!(to_u32("1.2.3.256"), None);
        assert_eq!(to_u32("1.2.+3.4"), None);
        assert_eq!(to_u32(""), None);
    }

    #[test]
    fn test_cidr_bounds_inclusive() {
        assert!(matches_cidr("192.0.2.0", "192.0.2.0/24"));
        assert!(matches_cidr("192.0.2.255", "192.0.2.0/24"));
        assert!(matches_cidr("192.0.2.77", "192.0.2.0/24"));
        assert!(!matches_cidr("192.0.3.1", "192.0.2.0/24"));
        assert!(!matches_cidr("192.0.1.255", "192.0.2.0/24"));
    }

    #[test]
    fn test_cidr_unaligned_base() {
        // Host bits in the base are masked off
        assert!(matches_cidr("10.1.2.3", "10.1.9.9/16"));
    }

    #[test]
    fn test_cidr_prefix_edges() {
        assert!(matches_cidr("8.8.8.8", "0.0.0.0/0"));
        assert!(matches_cidr("203.0.113.9", "203.0.113.9/32"));
        assert!(!matches_cidr("203.0.113.10", "203.0.113.9/32"));
    }

    #[test]
    fn test_cidr_malformed_fails_closed() {
        assert!(!matches_cidr("192.0.2.1", "192.0.2.0/33"));
        assert!(!matches_cidr("192.0.2.1", "192.0.2.0/"));
        assert!(!matches_cidr("192.0.2.1", "192.0.2.0/abc"));
        assert!(!matches_cidr("192.0.2.1", "garbage/24"));
        assert!(!matches_cidr("not-an-ip", "192.0.2.0/24"));
        assert!(!matches_cidr("192.0.2.1", "192.0.2.0"));
    }

    #[test]
    fn test_cidr_surrounding_whitespace() {
        assert!(matches_cidr("66.249.64.31", " 66.249.64.0/27 "));
        assert!(!matches_cidr("66.249.64.32", " 66.249.64.0/27 "));
    }

    #[test]
    fn test_range() {
        assert!(matches_range("10.0.0.5", "10.0.0.1-10.0.0.10"));
        assert!(matches_range("10.0.0.1", "10.0.0.1 - 10.0.0.10"));
        assert!(matches_range("10.0.0.10", "10.0.0.1-10.0.0.10"));
        assert!(!matches_range("10.0.0.11", "10.0.0.1-10.0.0.10"));
        assert!(!matches_range("10.0.0.5", "10.0.0.10-10.0.0.1"));
        assert!(!matches_range("10.0.0.5", "10.0.0.1-oops"));
    }

    #[test]
    fn test_exact() {
        assert!(matches_exact("66.249.66.1", "66.249.66.1"));
        assert!(matches_exact("66.249.66.1", " 66.249.66.1 "));
        assert!(!matches_exact("66.249.66.1", "66.249.66.2"));
        assert!(!matches_exact("66.249.66.1", "bogus"));
    }
}
