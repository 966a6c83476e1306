use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{http_remote::HttpUserRemote, memory_remote::MemoryUserRemote};
use crate::config::RemoteConfig;
use crate::models::{SyncPayload, User};

/// The remote side of the ensure-user operation.
///
/// Implementations create the user on first sight and return the stored
/// record. `Ok(None)` means the call went through but yielded no record.
/// Duplicate suppression is the implementation's concern; callers may send
/// the same payload repeatedly.
#[async_trait]
pub trait UserRemote: Send + Sync {
    fn get_name(&self) -> &str;
    async fn ensure_user(&self, payload: &SyncPayload) -> Result<Option<User>, String>;
}

/// Creates a concrete remote from the config.
pub fn create_remote(config: &RemoteConfig) -> Result<Arc<dyn UserRemote>, String> {
    match config {
        RemoteConfig::Http(http_config) => {
            let remote = HttpUserRemote::new(http_config)?;
            info!("Using HTTP ensure-user remote at {}", remote.endpoint());
            Ok(Arc::new(remote))
        }
        RemoteConfig::Memory => {
            info!("Using in-memory ensure-user remote.");
            Ok(Arc::new(MemoryUserRemote::new()))
        }
    }
}
