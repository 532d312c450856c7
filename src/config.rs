use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::adapters::AdapterConfig;

const ENDPOINT_ENV: &str = "PROMPTRELAY_ENDPOINT";

/// On-disk / environment configuration. This is the composition boundary:
/// every default lives here, not in the adapter itself, and the endpoint URL
/// has no default at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub endpoint: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            model: default_model(),
            user: default_user(),
            system_prompt: default_system_prompt(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

impl Config {
    /// Load from `.promptrelay.yml` in the current directory, then the
    /// `.yaml` spelling, then the home directory. Missing files are fine;
    /// the defaults stand in.
    pub fn load() -> Result<Self> {
        let config_path = PathBuf::from(".promptrelay.yml");
        if config_path.exists() {
            return Self::load_from(&config_path);
        }

        let alt_config_path = PathBuf::from(".promptrelay.yaml");
        if alt_config_path.exists() {
            return Self::load_from(&alt_config_path);
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".promptrelay.yml");
            if home_config.exists() {
                return Self::load_from(&home_config);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Fold in overrides, strongest last: file < environment < CLI flags.
    pub fn merge_overrides(
        &mut self,
        endpoint: Option<String>,
        model: Option<String>,
        user: Option<String>,
        system_prompt: Option<String>,
        temperature: Option<f32>,
        top_p: Option<f32>,
    ) {
        if let Ok(env_endpoint) = std::env::var(ENDPOINT_ENV) {
            self.endpoint = Some(env_endpoint);
        }
        if let Some(endpoint) = endpoint {
            self.endpoint = Some(endpoint);
        }
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(user) = user {
            self.user = user;
        }
        if let Some(prompt) = system_prompt {
            self.system_prompt = prompt;
        }
        if let Some(temperature) = temperature {
            self.temperature = temperature;
        }
        if let Some(top_p) = top_p {
            self.top_p = top_p;
        }
    }

    /// Assemble the adapter's fixed policy. Fails when no endpoint was
    /// supplied by file, environment, or flag.
    pub fn to_adapter_config(&self) -> Result<AdapterConfig> {
        let Some(endpoint_url) = self.endpoint.clone() else {
            bail!(
                "no completion endpoint configured: set `endpoint` in .promptrelay.yml, \
                 the {ENDPOINT_ENV} environment variable, or pass --endpoint"
            );
        };

        if !(0.0..=2.0).contains(&self.temperature) {
            bail!("temperature {} is outside [0, 2]", self.temperature);
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            bail!("top_p {} is outside [0, 1]", self.top_p);
        }

        Ok(AdapterConfig {
            endpoint_url,
            user_id: self.user.clone(),
            model_name: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            stop_sequences: Vec::new(),
        })
    }
}

fn default_model() -> String {
    "gpt35".to_string()
}

fn default_user() -> String {
    std::env::var("USER").unwrap_or_else(|_| "promptrelay".to_string())
}

fn default_system_prompt() -> String {
    "You are a helpful assistant.".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_top_p() -> f32 {
    0.7
}
