use crate::error::ResolutionError;
use crate::net::address::{NetworkAddress, is_eligible};
use std::collections::BTreeMap;
use std::net::IpAddr;

/// Source of the local interface/address pairs.
pub trait InterfaceSource {
    fn addresses(&self) -> Result<Vec<(String, IpAddr)>, ResolutionError>;
}

/// Interfaces reported by the operating system.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemInterfaces;

impl InterfaceSource for SystemInterfaces {
    fn addresses(&self) -> Result<Vec<(String, IpAddr)>, ResolutionError> {
        local_ip_address::list_afinet_netifas()
            .map_err(|e| ResolutionError::enumeration(e.to_string()))
    }
}

impl InterfaceSource for Vec<(String, IpAddr)> {
    fn addresses(&self) -> Result<Vec<(String, IpAddr)>, ResolutionError> {
        Ok(self.clone())
    }
}

/// One bindable address per interface, sorted by interface name.
///
/// When an interface carries several eligible addresses, IPv4 wins over
/// IPv6 and otherwise the first reported address is kept.
pub fn eligible_addresses(
    source: &impl InterfaceSource,
) -> Result<Vec<NetworkAddress>, ResolutionError> {
    let mut by_name: BTreeMap<String, IpAddr> = BTreeMap::new();

    for (name, ip) in source.addresses()? {
        if !is_eligible(&ip) {
            continue;
        }
        by_name
            .entry(name)
            .and_modify(|current| {
                if current.is_ipv6() && ip.is_ipv4() {
                    *current = ip;
                }
            })
            .or_insert(ip);
    }

    Ok(by_name
        .into_iter()
        .map(|(name, ip)| NetworkAddress::new(name, ip))
        .collect())
}
