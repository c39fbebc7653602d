//! Client address normalization.

/// IPv4-mapped IPv6 prefix, as reported by dual-stack sockets.
const MAPPED_V4_PREFIX: &str = "::ffff:";

/// Normalize a client address taken from a socket or a forwarding header.
///
/// - surrounding whitespace is trimmed
/// - only the first hop of a comma-separated `X-Forwarded-For` chain is kept
/// - enclosing brackets (`[2001:db8::1]`) are removed
/// - an IPv4-mapped IPv6 address (`::ffff:192.0.2.1`) becomes plain IPv4
///
/// Returns `None` when nothing is left. The result is not validated; that is
/// the caller's next step.
pub fn sanitize_ip(raw: &str) -> Option<String> {
    let mut ip = raw.trim().split(',').next().unwrap_or_default().trim();

    if let Some(inner) = ip.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        ip = inner.trim();
    }

    let is_mapped = ip
        .get(..MAPPED_V4_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(MAPPED_V4_PREFIX));
    if is_mapped {
        let tail = &ip[MAPPED_V4_PREFIX.len()..];
        if tail.contains('.') {
            ip = tail;
        }
    }

    if ip.is_empty() {
        None
    } else {
        Some(ip.to_string())
    }
}
