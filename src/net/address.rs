use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// A local address the server can listen on, with the interface it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkAddress {
    pub interface: String,
    pub ip: IpAddr,
}

impl NetworkAddress {
    pub fn new(interface: impl Into<String>, ip: IpAddr) -> Self {
        Self {
            interface: interface.into(),
            ip,
        }
    }

    /// Socket address asking the OS for an ephemeral port.
    pub fn ephemeral(&self) -> SocketAddr {
        SocketAddr::new(self.ip, 0)
    }
}

impl fmt::Display for NetworkAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.interface, self.ip)
    }
}

/// Whether an address can be offered to other devices on the network.
pub fn is_eligible(ip: &IpAddr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() || ip.is_multicast() {
        return false;
    }
    match ip {
        IpAddr::V4(v4) => !v4.is_broadcast(),
        // Link-local v6 addresses need a scope id to bind
        IpAddr::V6(v6) => (v6.segments()[0] & 0xffc0) != 0xfe80,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eligibility() {
        assert!(is_eligible(&"192.168.1.5".parse().unwrap()));
        assert!(is_eligible(&"2001:db8::1".parse().unwrap()));

        assert!(!is_eligible(&"127.0.0.1".parse().unwrap()));
        assert!(!is_eligible(&"::1".parse().unwrap()));
        assert!(!is_eligible(&"0.0.0.0".parse().unwrap()));
        assert!(!is_eligible(&"fe80::1".parse().unwrap()));
        assert!(!is_eligible(&"224.0.0.1".parse().unwrap()));
    }

    #[test]
    fn test_ephemeral_socket() {
        let address = NetworkAddress::new("eth0", "10.0.0.2".parse().unwrap());
        assert_eq!(address.ephemeral().port(), 0);
        assert_eq!(address.ephemeral().ip(), address.ip);
        assert_eq!(address.to_string(), "eth0 (10.0.0.2)");
    }
}
