use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::remote::RemoteConfig;
use super::sync::SyncConfig;

/// Environment variable pointing at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "USERSYNC_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.yaml";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0: logging, the ensure-user remote and sync behaviour.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub logging: LoggingConfig,
    pub remote: RemoteConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

impl From<Config> for ConfigV1 {
    fn from(config: Config) -> Self {
        // handle configuration migration between versions here when necessary
        match config {
            Config::ConfigV1(c) => c,
        }
    }
}

/// Builds the figment used by `load_config`: the YAML file, then
/// `USERSYNC_`-prefixed environment overrides (`__` separates nesting).
pub fn figment() -> Figment {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    Figment::new().merge(Yaml::file(path)).merge(
        Env::prefixed("USERSYNC_")
            .ignore(&["CONFIG"])
            .split("__"),
    )
}

/// Load and validate the configuration, exiting the process if it is invalid.
pub fn load_config() -> ConfigV1 {
    match figment().extract::<Config>() {
        Ok(cfg) => cfg.into(),
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() {
    let schema = schema_for!(Config);
    match serde_json::to_string_pretty(&schema) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error rendering schema: {}", e),
    }
}
