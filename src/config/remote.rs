use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::remote::http_remote::HttpRemoteConfig;

/// The ensure-user backends. We differentiate them via a "type" tag in the YAML.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
#[serde(tag = "type")]
pub enum RemoteConfig {
    #[serde(rename = "http")]
    Http(HttpRemoteConfig),
    /// In-process create-or-fetch directory, nothing leaves the process.
    #[serde(rename = "memory")]
    Memory,
}
