//! Built-in secret store implementations

mod env;
mod memory;

pub use env::EnvSecretStore;
pub use memory::MemorySecretStore;
