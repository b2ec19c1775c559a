pub mod address;
pub mod interfaces;
pub mod resolver;

pub use address::NetworkAddress;
pub use interfaces::{InterfaceSource, SystemInterfaces};
pub use resolver::{InterfacePrompt, Resolver};
