//! IPv6 address arithmetic.
//!
//! Addresses are compared as eight 16-bit groups so that compressed and
//! expanded spellings of the same address are equal. Prefix containment is
//! delegated to [`ipnet::Ipv6Net`].

use ipnet::Ipv6Net;
use std::net::Ipv6Addr;

/// Parse an IPv6 address into its eight groups.
pub fn segments(ip: &str) -> Option<[u16; 8]> {
    ip.trim().parse::<Ipv6Addr>().ok().map(|addr| addr.segments())
}

/// Check that `ip` is a full or `::`-compressed IPv6 address.
pub fn is_valid(ip: &str) -> bool {
    segments(ip).is_some()
}

/// Expand `::` compression into eight zero-padded lowercase groups.
pub fn expand(ip: &str) -> Option<String> {
    let groups = segments(ip)?;
    Some(
        groups
            .iter()
            .map(|g| format!("{:04x}", g))
            .collect::<Vec<_>>()
            .join(":"),
    )
}

/// Check whether `ip` lies inside `cidr` (e.g. `2001:4860:4801::/48`).
pub fn matches_cidr(ip: &str, cidr: &str) -> bool {
    let Ok(addr) = ip.trim().parse::<Ipv6Addr>() else {
        return false;
    };
    cidr.trim()
        .parse::<Ipv6Net>()
        .is_ok_and(|net| net.contains(&addr))
}

/// Check whether two IPv6 addresses are the same address.
pub fn matches_exact(ip: &str, other: &str) -> bool {
    match (segments(ip), segments(other)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(is_valid("2001:db8::1"));
        assert!(is_valid("::1"));
        assert!(is_valid("::"));
        assert!(is_valid("2001:0db8:0000:0000:0000:0000:0000:0001"));
        assert!(!is_valid("2001:db8:::1"));
        assert!(!is_valid("2001:db8::g"));
        assert!(!is_valid("192.0.2.1"));
        assert!(!is_valid("not-an-ip"));
    }

    #[test]
    fn test_expand() {
        assert_eq!(
            expand("2001:db8::1").as_deref(),
            Some("2001:0db8:0000:0000:0000:0000:0000:0001")
        );
        assert_eq!(
            expand("::").as_deref(),
            Some("0000:0000:0000:0000:0000:0000:0000:0000")
        );
        assert_eq!(
            expand("FE80::ABCD").as_deref(),
            Some("fe80:0000:0000:0000:0000:0000:0000:abcd")
        );
        assert_eq!(expand("nope"), None);
    }

    #[test]
    fn test_cidr_whole_groups() {
        assert!(matches_cidr("2001:db8:1::1", "2001:db8::/32"));
        assert!(matches_cidr("2001:db8:ffff:ffff::1", "2001:db8::/32"));
        assert!(!matches_cidr("2001:db9::1", "2001:db8::/32"));
    }

    #[test]
    fn test_cidr_partial_group() {
        // /36 keeps the top nibble of the third group
        assert!(matches_cidr("2001:db8:0fff::1", "2001:db8::/36"));
        assert!(!matches_cidr("2001:db8:1000::1", "2001:db8::/36"));
        // fc00::/7 covers fd00::/8 too
        assert!(matches_cidr("fd12::1", "fc00::/7"));
        assert!(!matches_cidr("fe80::1", "fc00::/7"));
    }

    #[test]
    fn test_cidr_prefix_edges() {
        assert!(matches_cidr("2600:1f18::1", "::/0"));
        assert!(matches_cidr("2001:db8::1", "2001:db8::1/128"));
        assert!(!matches_cidr("2001:db8::2", "2001:db8::1/128"));
    }

    #[test]
    fn test_cidr_host_bits_in_base() {
        assert!(matches_cidr("2001:db8:42::1", " 2001:db8::ffff/32 "));
        assert!(!matches_cidr("2001:db9::1", "2001:db8::ffff/32"));
    }

    #[test]
    fn test_cidr_malformed_fails_closed() {
        assert!(!matches_cidr("2001:db8::1", "2001:db8::/129"));
        assert!(!matches_cidr("2001:db8::1", "2001:db8::/x"));
        assert!(!matches_cidr("2001:db8::1", "zzzz::/32"));
        assert!(!matches_cidr("192.0.2.1", "2001:db8::/32"));
    }

    #[test]
    fn test_exact_compressed_equals_expanded() {
        assert!(matches_exact(
            "2001:db8::1",
            "2001:0db8:0000:0000:0000:0000:0000:0001"
        ));
        assert!(!matches_exact("2001:db8::1", "2001:db8::2"));
    }
}
