pub mod config;
pub mod content;
pub mod error;
pub mod net;
pub mod qr;
pub mod server;
pub mod prelude;

pub use config::{ConfigStore, Configuration};
pub use content::{Content, prepare};
pub use error::{ConfigError, PrepError, QrTransferError, ResolutionError, Result, SessionError};
pub use net::{InterfacePrompt, InterfaceSource, NetworkAddress, Resolver, SystemInterfaces};
pub use qr::Polarity;
pub use server::{SessionState, TransferSession};

#[cfg(feature = "cli")]
pub mod cli;
