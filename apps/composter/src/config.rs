use std::env;

use crate::auth::{CredentialError, CredentialStore};

pub const API_URL_ENV: &str = "COMPOSTER_API_URL";
pub const DEV_ENV: &str = "COMPOSTER_DEV";
pub const DEV_API_URL: &str = "http://localhost:3000/api";
pub const PRODUCTION_API_URL: &str = "https://composter.onrender.com/api";

/// Bridge configuration resolved from flags and the environment.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub api_url: String,
    pub credentials: CredentialStore,
}

impl BridgeConfig {
    pub fn from_env(force_dev: bool) -> Result<Self, CredentialError> {
        let api_url = resolve_api_url(
            env::var(API_URL_ENV).ok(),
            force_dev || dev_mode_from_env(),
        );
        Ok(Self {
            api_url,
            credentials: CredentialStore::from_env()?,
        })
    }
}

/// Explicit URL wins, then dev mode, then production.
pub fn resolve_api_url(explicit: Option<String>, dev: bool) -> String {
    if let Some(url) = explicit {
        let trimmed = url.trim().trim_end_matches('/');
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    if dev {
        DEV_API_URL.to_string()
    } else {
        PRODUCTION_API_URL.to_string()
    }
}

fn dev_mode_from_env() -> bool {
    env_truthy(DEV_ENV)
        || env::var("NODE_ENV")
            .map(|value| value.trim() == "development")
            .unwrap_or(false)
}

pub(crate) fn env_truthy(name: &str) -> bool {
    env::var(name)
        .map(|value| {
            matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            )
        })
        .unwrap_or(false)
}
