pub mod handler;
pub mod session;

pub use session::{SessionState, TransferSession};
