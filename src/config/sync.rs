use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Behaviour of overlapping sync cycles.
#[derive(Deserialize, Serialize, Debug, Clone, Default, JsonSchema)]
pub struct SyncConfig {
    /// When true, a response older than the newest applied one is dropped
    /// instead of overwriting the cached user. Off by default: the last
    /// completed call wins.
    #[serde(default)]
    pub discard_stale_responses: bool,
}
