use std::time::Duration;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::UserRemote;
use crate::models::{SyncPayload, User};

fn default_procedure() -> String {
    "user.createUser".to_string()
}

/// The config needed to reach the application's ensure-user mutation.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct HttpRemoteConfig {
    /// Base URI of the RPC router, e.g. `https://app.example.com/api/trpc`.
    pub uri: String,
    #[serde(default = "default_procedure")]
    pub procedure: String,
    /// Client-side timeout. Unset means the server decides.
    #[serde(default)]
    pub timeout_in_ms: Option<u64>,
}

/// Calls the ensure-user mutation over HTTP using the tRPC wire shape:
/// the payload is wrapped as `{"json": ...}` and the record comes back
/// under `result.data.json`.
pub struct HttpUserRemote {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpUserRemote {
    pub fn new(config: &HttpRemoteConfig) -> Result<Self, String> {
        let mut builder = reqwest::Client::builder();
        if let Some(ms) = config.timeout_in_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            endpoint: format!(
                "{}/{}",
                config.uri.trim_end_matches('/'),
                config.procedure.trim_start_matches('/')
            ),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl UserRemote for HttpUserRemote {
    fn get_name(&self) -> &str {
        "http"
    }

    async fn ensure_user(&self, payload: &SyncPayload) -> Result<Option<User>, String> {
        debug!(
            "Sending ensure-user request for clerkId '{}' to {}",
            payload.clerk_id, self.endpoint
        );
        let response = match self
            .client
            .post(&self.endpoint)
            .json(&json!({ "json": payload }))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return Err(format!("Error sending request: {}", e)),
        };

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| format!("Error reading response body: {}", e))?;

        if !status.is_success() {
            return Err(format!(
                "Unexpected status code {}: {}",
                status,
                error_message(&body)
            ));
        }

        let envelope: Value =
            serde_json::from_str(&body).map_err(|e| format!("Error parsing JSON: {}", e))?;
        parse_record(envelope)
    }
}

/// Pulls the record out of a tRPC result envelope. A plain `result.data`
/// (no transformer) is accepted as well.
fn parse_record(mut envelope: Value) -> Result<Option<User>, String> {
    let data = envelope
        .pointer_mut("/result/data")
        .map(Value::take)
        .unwrap_or(Value::Null);
    let record = match data {
        Value::Object(mut map) if map.contains_key("json") => {
            map.remove("json").unwrap_or(Value::Null)
        }
        other => other,
    };

    if record.is_null() {
        return Ok(None);
    }
    serde_json::from_value(record)
        .map(Some)
        .map_err(|e| format!("Error decoding user record: {}", e))
}

/// Best-effort extraction of `error.json.message` from an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/json/message")
                .or_else(|| v.pointer("/error/message"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
