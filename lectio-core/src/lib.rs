pub mod builtins;
pub mod credentials;
pub mod engine;
pub mod navigation;
pub mod render;
pub mod runner;
pub mod runtime;
pub mod vault;

// Re-export the main struct so users can just use `lectio_core::LectioEngine`
pub use engine::{LectioEngine, ReaderView};

// Re-export the simpler types for the front-end
pub use credentials::{CredentialDefaults, CredentialsStore};
pub use runner::{ExecuteResult, Runner};
pub use vault::Vault;

/// Language used when listing bibles without one.
pub const DEFAULT_LANGUAGE: &str = "fra";
