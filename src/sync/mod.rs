//! Keeping the cached user in step with the signed-in identity.

mod diagnostics;
mod error;
mod session;

pub use error::{SyncCycle, SyncError};
pub use session::SessionSync;
