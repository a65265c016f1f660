use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use crate::errors::ConfigError;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub server_origin: String,
    pub request_timeout_secs: u64,
    pub search_debounce_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: Self::get_env_or("API_BASE_URL", "http://localhost:8000/api/v1/"),
            server_origin: Self::get_env_or("SERVER_ORIGIN", "http://localhost:8000"),
            request_timeout_secs: Self::get_env_u64("REQUEST_TIMEOUT_SECS", 10)?,
            search_debounce_ms: Self::get_env_u64("SEARCH_DEBOUNCE_MS", 300)?,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    fn get_env_or(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    fn get_env_u64(key: &str, default: u64) -> Result<u64, ConfigError> {
        match env::var(key) {
            Ok(val) => val
                .parse::<u64>()
                .map_err(|e| ConfigError::Parse(key.to_string(), e)),
            Err(_) => Ok(default),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api/v1/".to_string(),
            server_origin: "http://localhost:8000".to_string(),
            request_timeout_secs: 10,
            search_debounce_ms: 300,
        }
    }
}
