//! Environment-driven configuration, loaded once at startup.
//!
//! Provider credentials are process configuration: `OPENAI_API_KEY` is
//! required, `TAVILY_API_KEY` is optional (without it the augmentation
//! stage is disabled), `REDIS_URL` is optional (without it the cache runs
//! in-process).

use std::env;
use std::time::Duration;

use crate::provider::ProfileTable;
use crate::{Error, Result};

const DEFAULT_ADDR: &str = "127.0.0.1:8000";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TAVILY_BASE_URL: &str = "https://api.tavily.com";

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub tavily_api_key: Option<String>,
    pub tavily_base_url: String,
    pub redis_url: Option<String>,
    pub profiles: ProfileTable,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY")
            .map_err(|_| Error::Configuration("OPENAI_API_KEY is not set".into()))?;

        let mut profiles = ProfileTable::default();
        apply_profile_overrides(&mut profiles);

        Ok(Self {
            bind_addr: env_or("GATEWAY_ADDR", DEFAULT_ADDR),
            openai_api_key,
            openai_base_url: env_or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
            tavily_api_key: env::var("TAVILY_API_KEY").ok(),
            tavily_base_url: env_or("TAVILY_BASE_URL", DEFAULT_TAVILY_BASE_URL),
            redis_url: env::var("REDIS_URL").ok(),
            profiles,
        })
    }
}

fn apply_profile_overrides(profiles: &mut ProfileTable) {
    let standard = profiles.standard_mut();
    if let Ok(model) = env::var("GATEWAY_STANDARD_MODEL") {
        standard.model = model;
    }
    if let Some(ttl) = env_secs("GATEWAY_STANDARD_TTL_SECS") {
        standard.cache_ttl = ttl;
    }

    let pro = profiles.pro_mut();
    if let Ok(model) = env::var("GATEWAY_PRO_MODEL") {
        pro.model = model;
    }
    if let Some(ttl) = env_secs("GATEWAY_PRO_TTL_SECS") {
        pro.cache_ttl = ttl;
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_secs(name: &str) -> Option<Duration> {
    env::var(name)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_secs)
}
