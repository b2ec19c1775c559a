use serde::{Deserialize, Serialize};

/// Preferences remembered between runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Name of the network interface used by the last successful transfer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iface: Option<String>,
}

impl Configuration {
    pub fn with_iface(iface: impl Into<String>) -> Self {
        Self {
            iface: Some(iface.into()),
        }
    }

    /// The stored interface, treating an empty name as "not chosen".
    pub fn iface(&self) -> Option<&str> {
        self.iface.as_deref().filter(|name| !name.is_empty())
    }

    pub fn set_iface(&mut self, iface: impl Into<String>) {
        self.iface = Some(iface.into());
    }
}
