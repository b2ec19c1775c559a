//! Prelude module for convenient imports
//!
//! Use `use qr_filetransfer::prelude::*;` to import commonly used types

// Configuration
pub use crate::config::{ConfigStore, Configuration};

// Address resolution
pub use crate::net::{InterfacePrompt, InterfaceSource, NetworkAddress, Resolver, SystemInterfaces};

// Content
pub use crate::content::{Content, prepare};

// Serving
pub use crate::qr::{Polarity, render as render_qr};
pub use crate::server::{SessionState, TransferSession};

// Error handling
pub use crate::error::{
    ConfigError, PrepError, QrTransferError, ResolutionError, Result, SessionError,
};
