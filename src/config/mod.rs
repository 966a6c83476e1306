// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod logging;
pub mod remote;
pub mod sync;
pub mod types;

pub use logging::*;
pub use remote::*;
pub use sync::*;
pub use types::*;
