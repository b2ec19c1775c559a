use crate::error::ResolutionError;
use crate::net::{InterfacePrompt, NetworkAddress};
use inquire::Select;

/// Lets the user pick an interface from a terminal list.
#[derive(Clone, Copy, Debug, Default)]
pub struct SelectPrompt;

impl InterfacePrompt for SelectPrompt {
    fn choose(&self, candidates: &[NetworkAddress]) -> Result<NetworkAddress, ResolutionError> {
        Select::new(
            "Choose the network interface to use (the choice is remembered):",
            candidates.to_vec(),
        )
        .prompt()
        .map_err(|e| ResolutionError::prompt_failed(e.to_string()))
    }
}
