//! Hostname resolution to legacy 32-bit network-order addresses.

use std::net::{Ipv4Addr, SocketAddr, ToSocketAddrs};

use crate::error::{RespawnError, Result};

/// All-ones sentinel returned by [`hton`] on any resolution failure.
pub const INADDR_NONE: u32 = 0xFFFF_FFFF;

/// Resolve a hostname or dotted-decimal string to an IPv4 address.
///
/// Dotted-decimal input parses without touching the resolver; anything else
/// goes through the system resolver and the first IPv4 result wins. Unknown
/// hosts and empty address lists are explicit errors here, unlike the
/// sentinel-based [`hton`].
pub fn resolve_host(host: &str) -> Result<Ipv4Addr> {
    if let Ok(ip) = host.parse::<Ipv4Addr>() {
        return Ok(ip);
    }
    let addrs = (host, 0u16)
        .to_socket_addrs()
        .map_err(|_| RespawnError::HostResolution(host.to_string()))?;
    addrs
        .filter_map(|addr| match addr {
            SocketAddr::V4(v4) => Some(*v4.ip()),
            SocketAddr::V6(_) => None,
        })
        .next()
        .ok_or_else(|| RespawnError::HostResolution(host.to_string()))
}

/// Legacy resolver: hostname to a 32-bit value in network byte order,
/// [`INADDR_NONE`] on any failure.
///
/// Kept for callers that expect the classic sentinel convention. Note the
/// inherited quirk: `255.255.255.255` is indistinguishable from failure.
/// New code should call [`resolve_host`].
pub fn hton(host: &str) -> u32 {
    match resolve_host(host) {
        Ok(ip) => u32::from_be_bytes(ip.octets()),
        Err(_) => INADDR_NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotted_decimal_round_trips() {
        assert_eq!(hton("1.2.3.4"), 0x0102_0304);
        assert_eq!(hton("127.0.0.1"), 0x7F00_0001);
    }

    #[test]
    fn dotted_decimal_skips_the_resolver() {
        let ip = resolve_host("10.20.30.40").unwrap();
        assert_eq!(ip, Ipv4Addr::new(10, 20, 30, 40));
    }

    #[test]
    fn unresolvable_name_yields_sentinel() {
        // RFC 2606 reserves .invalid; it never resolves.
        assert_eq!(hton("no-such-host.invalid"), INADDR_NONE);
    }

    #[test]
    fn unresolvable_name_is_an_explicit_error() {
        let err = resolve_host("no-such-host.invalid").unwrap_err();
        assert!(matches!(err, RespawnError::HostResolution(h) if h == "no-such-host.invalid"));
    }

    #[test]
    fn broadcast_address_aliases_the_sentinel() {
        // Inherited ambiguity from inet_addr(): preserved on purpose.
        assert_eq!(hton("255.255.255.255"), INADDR_NONE);
    }
}
