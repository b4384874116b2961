use serde::{Deserialize, Serialize};

use crate::{ChatError, Result};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Connection settings for the chat backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_base: String,
    /// Pre-provisioned bearer token; empty means unauthenticated
    pub access_token: String,
    pub model: String,
    pub provider: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            access_token: String::new(),
            model: "gpt-4".to_string(),
            provider: "openai".to_string(),
        }
    }
}

impl ClientConfig {
    /// Settings baked in at build time through `CHAT_API_BASE_URL` and
    /// `CHAT_ACCESS_TOKEN`. Unset or blank values keep the defaults.
    pub fn from_build_env() -> Self {
        Self::from_values(option_env!("CHAT_API_BASE_URL"), option_env!("CHAT_ACCESS_TOKEN"))
    }

    pub fn from_values(api_base: Option<&str>, access_token: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(base) = api_base.map(str::trim).filter(|s| !s.is_empty()) {
            config.api_base = base.to_string();
        }
        if let Some(token) = access_token.map(str::trim).filter(|s| !s.is_empty()) {
            config.access_token = token.to_string();
        }
        config
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.api_base.trim();
        if base.is_empty() {
            return Err(ChatError::Config("api_base is empty".to_string()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ChatError::Config(format!(
                "api_base must be an http(s) URL, got {}",
                base
            )));
        }
        Ok(())
    }

    /// Join the base URL and an endpoint path with exactly one slash
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn bearer(&self) -> Option<String> {
        if self.access_token.is_empty() {
            None
        } else {
            Some(format!("Bearer {}", self.access_token))
        }
    }
}
