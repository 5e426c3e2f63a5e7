use std::net::{IpAddr, ToSocketAddrs};

use crate::error::ZpingError;

/// Resolve a host name or IP literal to the first address the system
/// resolver returns, in whatever family order it returns them.
pub fn resolve_ip(target: &str) -> Result<IpAddr, ZpingError> {
    // Resolution only, the port is irrelevant.
    let mut addrs = (target, 0u16)
        .to_socket_addrs()
        .map_err(|e| ZpingError::Dns(format!("could not find host '{target}': {e}")))?;

    addrs
        .next()
        .map(|addr| addr.ip())
        .ok_or_else(|| ZpingError::Dns(format!("could not find host '{target}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_ip_literal() {
        let ip = resolve_ip("127.0.0.1").expect("loopback should resolve");
        assert_eq!(ip, "127.0.0.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_resolve_unknown_host() {
        let err = resolve_ip("zping-no-such-host.invalid").expect_err("expected failure");
        assert!(matches!(err, ZpingError::Dns(_)));
        assert!(err.to_string().contains("could not find host"));
    }
}
