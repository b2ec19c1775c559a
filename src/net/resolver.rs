use crate::config::Configuration;
use crate::error::ResolutionError;
use crate::net::address::NetworkAddress;
use crate::net::interfaces::{InterfaceSource, SystemInterfaces, eligible_addresses};

/// Asks the user to pick one of several candidate addresses.
pub trait InterfacePrompt {
    fn choose(&self, candidates: &[NetworkAddress]) -> Result<NetworkAddress, ResolutionError>;
}

/// Decides which local address the server listens on.
pub struct Resolver<S = SystemInterfaces> {
    source: S,
    prompt: Option<Box<dyn InterfacePrompt>>,
}

impl Resolver<SystemInterfaces> {
    pub fn system() -> Self {
        Self::new(SystemInterfaces)
    }
}

impl<S: InterfaceSource> Resolver<S> {
    /// Resolver without a prompt; several candidates without a matching
    /// preference is an error.
    pub fn new(source: S) -> Self {
        Self {
            source,
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl InterfacePrompt + 'static) -> Self {
        self.prompt = Some(Box::new(prompt));
        self
    }

    /// Pick the address to bind and record its interface in `config`.
    ///
    /// A stored interface that is still present wins. Otherwise a single
    /// candidate is taken as is, and several candidates go to the prompt.
    pub fn resolve(&self, config: &mut Configuration) -> Result<NetworkAddress, ResolutionError> {
        let candidates = eligible_addresses(&self.source)?;
        tracing::debug!(
            "Eligible interfaces: {:?}",
            candidates.iter().map(ToString::to_string).collect::<Vec<_>>()
        );

        let chosen = match self.pick(config, &candidates)? {
            Some(address) => address,
            None => {
                let prompt = self.prompt.as_ref().ok_or_else(|| {
                    ResolutionError::AmbiguousInterface {
                        candidates: candidates.iter().map(|c| c.interface.clone()).collect(),
                    }
                })?;
                prompt.choose(&candidates)?
            }
        };

        tracing::debug!("Using interface {}", chosen);
        config.set_iface(chosen.interface.clone());
        Ok(chosen)
    }

    fn pick(
        &self,
        config: &Configuration,
        candidates: &[NetworkAddress],
    ) -> Result<Option<NetworkAddress>, ResolutionError> {
        if candidates.is_empty() {
            return Err(ResolutionError::NoEligibleInterface);
        }

        if let Some(stored) = config.iface() {
            if let Some(address) = candidates.iter().find(|c| c.interface == stored) {
                return Ok(Some(address.clone()));
            }
            tracing::debug!("Stored interface {} is no longer available", stored);
        }

        if let [only] = candidates {
            return Ok(Some(only.clone()));
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;
    use std::rc::Rc;
    use std::cell::Cell;

    fn iface(name: &str, ip: &str) -> (String, IpAddr) {
        (name.to_string(), ip.parse().unwrap())
    }

    fn two_interfaces() -> Vec<(String, IpAddr)> {
        vec![iface("eth0", "10.0.0.2"), iface("wlan0", "192.168.1.5")]
    }

    /// Prompt that always picks the last candidate and counts its calls.
    struct LastPrompt {
        calls: Rc<Cell<usize>>,
    }

    impl InterfacePrompt for LastPrompt {
        fn choose(&self, candidates: &[NetworkAddress]) -> Result<NetworkAddress, ResolutionError> {
            self.calls.set(self.calls.get() + 1);
            candidates
                .last()
                .cloned()
                .ok_or(ResolutionError::NoEligibleInterface)
        }
    }

    #[test]
    fn test_single_interface_auto_selected() {
        let resolver = Resolver::new(vec![iface("lo", "127.0.0.1"), iface("wlan0", "192.168.1.5")]);
        let mut config = Configuration::default();

        let address = resolver.resolve(&mut config).unwrap();
        assert_eq!(address.interface, "wlan0");
        assert_eq!(address.ip, "192.168.1.5".parse::<IpAddr>().unwrap());
        assert_eq!(config.iface(), Some("wlan0"));
    }

    #[test]
    fn test_no_eligible_interface() {
        let resolver = Resolver::new(vec![iface("lo", "127.0.0.1"), iface("lo", "::1")]);
        let mut config = Configuration::default();

        let result = resolver.resolve(&mut config);
        assert!(matches!(result, Err(ResolutionError::NoEligibleInterface)));
        assert_eq!(config.iface(), None);
    }

    #[test]
    fn test_stored_preference_is_idempotent() {
        let calls = Rc::new(Cell::new(0));
        let resolver = Resolver::new(two_interfaces()).with_prompt(LastPrompt {
            calls: calls.clone(),
        });
        let mut config = Configuration::with_iface("eth0");

        let first = resolver.resolve(&mut config).unwrap();
        let second = resolver.resolve(&mut config).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.interface, "eth0");
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_ambiguous_without_prompt() {
        let resolver = Resolver::new(two_interfaces());
        let mut config = Configuration::default();

        match resolver.resolve(&mut config) {
            Err(ResolutionError::AmbiguousInterface { candidates }) => {
                assert_eq!(candidates, vec!["eth0".to_string(), "wlan0".to_string()]);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_stale_preference_falls_back_to_prompt() {
        let calls = Rc::new(Cell::new(0));
        let resolver = Resolver::new(two_interfaces()).with_prompt(LastPrompt {
            calls: calls.clone(),
        });
        let mut config = Configuration::with_iface("usb0");

        let address = resolver.resolve(&mut config).unwrap();
        assert_eq!(address.interface, "wlan0");
        assert_eq!(config.iface(), Some("wlan0"));
        assert_eq!(calls.get(), 1);

        // The recorded choice is reused without asking again
        resolver.resolve(&mut config).unwrap();
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_stale_preference_single_candidate() {
        let resolver = Resolver::new(vec![iface("wlan0", "192.168.1.5")]);
        let mut config = Configuration::with_iface("usb0");

        let address = resolver.resolve(&mut config).unwrap();
        assert_eq!(address.interface, "wlan0");
    }
}
