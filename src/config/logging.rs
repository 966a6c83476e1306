use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Settings for the global tracing subscriber.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct LoggingConfig {
    /// Lowest level emitted: trace, debug, info, warn or error.
    pub level: String,
    /// `json` for OpenTelemetry-shaped lines, `console` for human output.
    pub format: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
}

fn default_service_name() -> String {
    env!("CARGO_PKG_NAME").to_string()
}

fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
