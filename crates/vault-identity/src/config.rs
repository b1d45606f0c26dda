use serde::Deserialize;

pub const DEFAULT_AUTHORITY: &str = "http://localhost:3000";

/// Where the auth provider lives and what its tokens must claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    pub session_url: String,
    pub jwks_url: String,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawIdentityConfig {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    session_url: Option<String>,
    #[serde(default)]
    jwks_url: Option<String>,
    #[serde(default)]
    issuer: Option<String>,
    #[serde(default)]
    audience: Option<String>,
}

impl IdentityConfig {
    /// Read `VAULT_AUTH_*` variables; unset or blank values take the defaults
    /// derived from `VAULT_AUTH_URL`.
    pub fn from_env() -> Self {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("VAULT_AUTH"))
            .build()
            .and_then(|c| c.try_deserialize::<RawIdentityConfig>())
            .unwrap_or_else(|err| {
                tracing::warn!(
                    target: "vault_identity::config",
                    error = %err,
                    "invalid VAULT_AUTH_* configuration; using defaults"
                );
                RawIdentityConfig::default()
            })
            .resolve()
    }

    pub fn for_authority(base: &str) -> Self {
        RawIdentityConfig {
            url: Some(base.to_string()),
            ..RawIdentityConfig::default()
        }
        .resolve()
    }
}

impl RawIdentityConfig {
    fn resolve(self) -> IdentityConfig {
        let base = normalize_opt(self.url)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_AUTHORITY.to_string());
        IdentityConfig {
            session_url: normalize_opt(self.session_url)
                .unwrap_or_else(|| format!("{base}/api/auth/get-session")),
            jwks_url: normalize_opt(self.jwks_url)
                .unwrap_or_else(|| format!("{base}/api/auth/jwks")),
            issuer: normalize_opt(self.issuer).unwrap_or_else(|| base.clone()),
            audience: normalize_opt(self.audience).unwrap_or(base),
        }
    }
}

fn normalize_opt(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
