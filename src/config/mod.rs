pub mod store;
pub mod types;

pub use store::ConfigStore;
pub use types::Configuration;
