use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use url::form_urlencoded;

use crate::auth::CredentialStore;
use crate::vault::error::VaultError;
use crate::vault::models::{
    CategoriesEnvelope, CategoryRef, ComponentEnvelope, ComponentRecord, ComponentsEnvelope,
    ErrorBody,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the vault API. Every request carries the stored bearer
/// token; the session file is re-read per call so an out-of-band login is
/// picked up without restarting.
#[derive(Debug, Clone)]
pub struct VaultClient {
    client: Client,
    base_url: String,
    credentials: CredentialStore,
}

impl VaultClient {
    pub fn new(base_url: impl Into<String>, credentials: CredentialStore) -> Result<Self, VaultError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| VaultError::Transport(err.to_string()))?;
        Ok(Self::with_client(client, base_url, credentials))
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        credentials: CredentialStore,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn search_components(&self, query: &str) -> Result<Vec<ComponentRecord>, VaultError> {
        let path = with_query("/components/search", &[("q", query)]);
        let body: ComponentsEnvelope = self.call(Method::GET, &path, None).await?;
        Ok(body.components)
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryRef>, VaultError> {
        let body: CategoriesEnvelope = self.call(Method::GET, "/categories", None).await?;
        Ok(body.categories)
    }

    pub async fn list_components(&self, category: &str) -> Result<Vec<ComponentRecord>, VaultError> {
        let path = with_query("/components/list-by-category", &[("category", category)]);
        let body: ComponentsEnvelope = self.call(Method::GET, &path, None).await?;
        Ok(body.components)
    }

    /// `Ok(None)` when the API answers 404 or with an empty `component`.
    pub async fn find_component(
        &self,
        category: &str,
        title: &str,
    ) -> Result<Option<ComponentRecord>, VaultError> {
        let path = with_query("/components", &[("category", category), ("title", title)]);
        match self.call::<ComponentEnvelope>(Method::GET, &path, None).await {
            Ok(body) => Ok(body.component),
            Err(VaultError::NotFound) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Issue one authenticated request. Never retries.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, VaultError> {
        let credential = self.credentials.load().ok_or(VaultError::Unauthenticated)?;
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(target: "composter::vault", %method, %url, "vault request");
        let mut request = self
            .client
            .request(method, &url)
            .header(AUTHORIZATION, format!("Bearer {}", credential.bearer_token))
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        tracing::debug!(target: "composter::vault", %status, %url, "vault request rejected");
        match status {
            StatusCode::UNAUTHORIZED => Err(VaultError::SessionExpired),
            StatusCode::NOT_FOUND => Err(VaultError::NotFound),
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(VaultError::Remote {
                    status,
                    message: remote_message(status, &text),
                })
            }
        }
    }
}

fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        query.append_pair(key, value);
    }
    format!("{path}?{}", query.finish())
}

fn remote_message(status: StatusCode, text: &str) -> String {
    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();
    body.message
        .or(body.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_values_are_encoded() {
        assert_eq!(
            with_query("/components", &[("category", "ui kits"), ("title", "A&B")]),
            "/components?category=ui+kits&title=A%26B"
        );
    }

    #[test]
    fn remote_message_prefers_body_fields() {
        assert_eq!(
            remote_message(StatusCode::BAD_REQUEST, r#"{"message":"bad category"}"#),
            "bad category"
        );
        assert_eq!(
            remote_message(StatusCode::FORBIDDEN, r#"{"error":"nope"}"#),
            "nope"
        );
        assert_eq!(
            remote_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>"),
            "Internal Server Error"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = VaultClient::new(
            "http://localhost:3000/api/",
            CredentialStore::new("/nonexistent/session.json"),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
    }

    #[tokio::test]
    async fn missing_credential_fails_before_network() {
        // Port 9 is discard; an attempted connection would surface as Transport.
        let client = VaultClient::new(
            "http://127.0.0.1:9/api",
            CredentialStore::new("/nonexistent/session.json"),
        )
        .unwrap();
        let err = client.list_categories().await.unwrap_err();
        assert!(matches!(err, VaultError::Unauthenticated));
    }
}
