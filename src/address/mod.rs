//! Address arithmetic for matching client IPs against published ranges.
//!
//! A range spec is one of:
//! - CIDR: `66.249.64.0/19` or `2001:4860:4801::/48`
//! - Explicit IPv4 range: `192.0.2.10-192.0.2.20`
//! - Single address: `192.0.2.7` or `2001:db8::7`
//!
//! Every function here fails closed: malformed input yields `false` or
//! `None`, never a panic. An address never matches a range of the other
//! family.

pub mod v4;
pub mod v6;

use std::fmt;

pub use v4::{is_valid as is_ipv4_valid, matches_range, to_u32 as ipv4_to_u32};
pub use v6::{expand as expand_ipv6, is_valid as is_ipv6_valid};

/// IP address family, decided by the presence of `:`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Classify an address or range spec.
    pub fn of(s: &str) -> Self {
        if s.contains(':') {
            AddressFamily::V6
        } else {
            AddressFamily::V4
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::V4 => write!(f, "IPv4"),
            AddressFamily::V6 => write!(f, "IPv6"),
        }
    }
}

/// Check that `ip` is a syntactically valid IPv4 or IPv6 address.
pub fn is_valid_ip(ip: &str) -> bool {
    is_ipv4_valid(ip) || is_ipv6_valid(ip)
}

/// Check whether `ip` lies inside a CIDR block of its own family.
pub fn matches_cidr(ip: &str, cidr: &str) -> bool {
    match (AddressFamily::of(ip), AddressFamily::of(cidr)) {
        (AddressFamily::V4, AddressFamily::V4) => v4::matches_cidr(ip, cidr),
        (AddressFamily::V6, AddressFamily::V6) => v6::matches_cidr(ip, cidr),
        _ => false,
    }
}

/// Check whether two addresses are the same address.
///
/// IPv6 addresses are compared group-wise, so `2001:db8::1` equals its
/// expanded spelling.
pub fn matches_exact(ip: &str, other: &str) -> bool {
    match (AddressFamily::of(ip), AddressFamily::of(other)) {
        (AddressFamily::V4, AddressFamily::V4) => v4::matches_exact(ip, other),
        (AddressFamily::V6, AddressFamily::V6) => v6::matches_exact(ip, other),
        _ => false,
    }
}

/// Check whether `ip` is covered by `range`.
///
/// The family is picked by `:` in either operand, the form by `/` (CIDR)
/// or `-` (explicit IPv4 range); anything else is an exact match.
pub fn is_ip_in_range(ip: &str, range: &str) -> bool {
    let range = range.trim();

    if ip.contains(':') || range.contains(':') {
        if AddressFamily::of(ip) != AddressFamily::of(range) {
            return false;
        }
        return if range.contains('/') {
            v6::matches_cidr(ip, range)
        } else {
            v6::matches_exact(ip, range)
        };
    }

    if range.contains('/') {
        v4::matches_cidr(ip, range)
    } else if range.contains('-') {
        v4::matches_range(ip, range)
    } else {
        v4::matches_exact(ip, range)
    }
}
