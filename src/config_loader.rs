//! Configuration loading
//!
//! Defaults merged under `churnwatch.toml` and `CHURN_*` environment
//! variables, in that order.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::errors::{ChurnError, ChurnResult};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChurnConfig {
    /// Directory holding manifest.json and the four artifact files.
    pub artifact_dir: String,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Serialize)]
struct ChurnConfigDefaults {
    artifact_dir: String,
    server: ServerConfig,
}

pub fn load_config() -> ChurnResult<ChurnConfig> {
    let figment = Figment::from(Serialized::defaults(ChurnConfigDefaults {
        artifact_dir: "artifacts".into(),
        server: ServerConfig::default(),
    }))
    .merge(Toml::file("churnwatch.toml"))
    .merge(Env::prefixed("CHURN_"));

    let config: ChurnConfig = figment
        .extract()
        .map_err(|e| ChurnError::config(e.to_string()))?;

    if config.artifact_dir.trim().is_empty() {
        return Err(ChurnError::config("artifact_dir must be set"));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_without_files() {
        figment::Jail::expect_with(|_| {
            let config = load_config().expect("defaults");
            assert_eq!(config.artifact_dir, "artifacts");
            assert_eq!(config.server.port, 8080);
            Ok(())
        });
    }

    #[test]
    fn test_blank_artifact_dir_is_config_error() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("CHURN_ARTIFACT_DIR", "  ");
            let err = load_config().expect_err("blank dir");
            assert!(matches!(err, ChurnError::Config { .. }));
            Ok(())
        });
    }
}
