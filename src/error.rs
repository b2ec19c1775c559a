use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing the persisted configuration.
///
/// These are never fatal: loading falls back to defaults, and a failed
/// update after a transfer is only reported.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Could not determine a configuration directory")]
    NoConfigDir,

    #[error("Configuration IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration serialization error: {source}")]
    Serde {
        #[from]
        source: serde_json::Error,
    },
}

/// Errors raised while choosing the address to listen on.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ResolutionError {
    #[error("No network interface with a usable address was found")]
    NoEligibleInterface,

    #[error("Multiple network interfaces are available ({}), run interactively to choose one", .candidates.join(", "))]
    AmbiguousInterface { candidates: Vec<String> },

    #[error("Failed to enumerate network interfaces: {message}")]
    Enumeration { message: String },

    #[error("Interface selection aborted: {message}")]
    PromptFailed { message: String },
}

/// Errors raised while turning the input paths into a servable file.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PrepError {
    #[error("At least one path is required")]
    NoInputs,

    #[error("No such file or directory: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("Cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create archive: {reason}")]
    ArchiveFailed { reason: String },
}

/// Errors raised by the transfer session once the network is involved.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SessionError {
    #[error("Failed to bind {address}: {source}")]
    BindFailed {
        address: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {source}")]
    Serve {
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid session state: {message}")]
    InvalidState { message: String },
}

/// Any error the transfer pipeline can produce.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum QrTransferError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Prep(#[from] PrepError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ResolutionError {
    /// Create an enumeration error with a message
    pub fn enumeration(msg: impl Into<String>) -> Self {
        Self::Enumeration {
            message: msg.into(),
        }
    }

    /// Create a prompt failure with a message
    pub fn prompt_failed(msg: impl Into<String>) -> Self {
        Self::PromptFailed {
            message: msg.into(),
        }
    }
}

impl PrepError {
    /// Create an archive failure with a reason
    pub fn archive_failed(reason: impl Into<String>) -> Self {
        Self::ArchiveFailed {
            reason: reason.into(),
        }
    }
}

impl SessionError {
    /// Create an invalid state error with a message
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState {
            message: msg.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QrTransferError>;
