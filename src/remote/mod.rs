pub mod base;
pub mod http_remote;
pub mod memory_remote;

// Re-export the primary remote items so code outside can do
// "use crate::remote::{UserRemote, create_remote};"
pub use base::{create_remote, UserRemote};
pub use http_remote::{HttpRemoteConfig, HttpUserRemote};
pub use memory_remote::MemoryUserRemote;
