// src/environment.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::service_client::DEFAULT_TIMEOUT_SECS;
use crate::session::WizardFlow;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub service_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub flow: WizardFlow,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl EnvironmentConfig {
    /// Load configuration based on environment. `CV_SERVICE_URL` overrides
    /// the configured service URL; when set it also allows running without
    /// a config.yaml at all.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let mut config = match Self::load_from_file(&environment) {
            Ok(config) => config,
            Err(err) => match std::env::var("CV_SERVICE_URL") {
                Ok(url) => EnvironmentConfig {
                    service_url: url,
                    timeout_secs: default_timeout(),
                    flow: WizardFlow::default(),
                },
                Err(_) => return Err(err),
            },
        };

        if let Ok(url) = std::env::var("CV_SERVICE_URL") {
            config.service_url = url;
        }

        Ok(config)
    }

    fn get_environment() -> String {
        std::env::var("CVPILOT_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(environment: &str) -> Result<Self> {
        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            anyhow::bail!("config.yaml not found in current directory and CV_SERVICE_URL is not set");
        }

        let config_content =
            std::fs::read_to_string(&config_path).context("Failed to read config.yaml")?;

        let config_file: ConfigFile =
            serde_yaml::from_str(&config_content).context("Failed to parse config.yaml")?;

        Ok(match environment {
            "production" => config_file.production,
            _ => config_file.local,
        })
    }
}
