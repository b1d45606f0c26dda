use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use serde::Deserialize;

use crate::error::{IdentityError, Rejection};
use crate::resolver::{Identity, IdentitySource, IdentityStrategy};

/// Resolves a browser session by forwarding the request's cookies to the
/// auth provider's session lookup.
#[derive(Clone)]
pub struct SessionStrategy {
    url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct SessionBody {
    #[serde(default)]
    user: Option<SessionUser>,
}

#[derive(Debug, Deserialize)]
struct SessionUser {
    #[serde(default)]
    id: Option<String>,
}

impl SessionStrategy {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    async fn lookup(&self, cookies: &str) -> Result<Option<String>, IdentityError> {
        let resp = self
            .client
            .get(&self.url)
            .header(reqwest::header::COOKIE, cookies)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(IdentityError::SessionLookup(format!(
                "status: {}",
                resp.status()
            )));
        }
        // The provider answers `null` when the cookies carry no live session.
        let body: Option<SessionBody> = resp.json().await?;
        Ok(body
            .and_then(|body| body.user)
            .and_then(|user| user.id)
            .filter(|id| !id.trim().is_empty()))
    }
}

#[async_trait]
impl IdentityStrategy for SessionStrategy {
    fn name(&self) -> &'static str {
        "session"
    }

    async fn resolve(&self, headers: &HeaderMap) -> Result<Identity, Rejection> {
        let cookies: Vec<&str> = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .collect();
        if cookies.is_empty() {
            return Err(Rejection::NoCredentials);
        }

        match self.lookup(&cookies.join("; ")).await {
            Ok(Some(user_id)) => Ok(Identity {
                user_id,
                source: IdentitySource::Session,
            }),
            Ok(None) => Err(Rejection::NoCredentials),
            Err(err) => {
                tracing::debug!(
                    target: "vault_identity::session",
                    error = %err,
                    "session lookup failed"
                );
                Err(Rejection::NoCredentials)
            }
        }
    }
}
