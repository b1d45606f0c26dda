use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::bearer::BearerStrategy;
use crate::config::IdentityConfig;
use crate::error::Rejection;
use crate::jwks::KeySet;
use crate::session::SessionStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    Session,
    Bearer,
}

/// The user acting on one request. Lives in the request extensions only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub source: IdentitySource,
}

/// One way of establishing who sent a request.
#[async_trait]
pub trait IdentityStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn resolve(&self, headers: &HeaderMap) -> Result<Identity, Rejection>;
}

/// Ordered strategy chain. The first strategy that succeeds decides the
/// identity; later ones are not consulted, and strategies never contribute
/// to each other's result.
#[derive(Clone)]
pub struct IdentityResolver {
    strategies: Vec<Arc<dyn IdentityStrategy>>,
}

impl IdentityResolver {
    pub fn new(strategies: Vec<Arc<dyn IdentityStrategy>>) -> Self {
        Self { strategies }
    }

    /// Session lookup first, then bearer verification.
    pub fn from_config(config: &IdentityConfig) -> Self {
        let client = reqwest::Client::new();
        let keys = KeySet::new(config.jwks_url.clone(), client.clone());
        let session: Arc<dyn IdentityStrategy> =
            Arc::new(SessionStrategy::new(config.session_url.clone(), client));
        let bearer: Arc<dyn IdentityStrategy> = Arc::new(BearerStrategy::new(
            keys,
            config.issuer.clone(),
            config.audience.clone(),
        ));
        Self::new(vec![session, bearer])
    }

    /// Returns the last strategy's rejection when none succeeds.
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Identity, Rejection> {
        let mut rejection = Rejection::NoCredentials;
        for strategy in &self.strategies {
            match strategy.resolve(headers).await {
                Ok(identity) => {
                    tracing::debug!(
                        target: "vault_identity",
                        strategy = strategy.name(),
                        user_id = %identity.user_id,
                        "identity resolved"
                    );
                    return Ok(identity);
                }
                Err(err) => rejection = err,
            }
        }
        tracing::debug!(target: "vault_identity", reason = %rejection, "request rejected");
        Err(rejection)
    }
}
