use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use jsonwebtoken::{decode, decode_header, Validation};
use serde::Deserialize;

use crate::error::{IdentityError, Rejection};
use crate::jwks::{select_algorithm, KeySet};
use crate::resolver::{Identity, IdentitySource, IdentityStrategy};

#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub aud: Option<serde_json::Value>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Verifies `Authorization: Bearer` tokens against the remote key set and
/// resolves to the token's subject.
#[derive(Clone)]
pub struct BearerStrategy {
    keys: KeySet,
    issuer: String,
    audience: String,
}

impl BearerStrategy {
    pub fn new(keys: KeySet, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    pub async fn verify(&self, token: &str) -> Result<Claims, IdentityError> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(IdentityError::MissingKid)?;
        let key = self.keys.key(&kid).await?;
        let algorithm = select_algorithm(header.alg, key.algorithm)?;

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        let data = decode::<Claims>(token, &key.key, &validation)?;
        Ok(data.claims)
    }
}

#[async_trait]
impl IdentityStrategy for BearerStrategy {
    fn name(&self) -> &'static str {
        "bearer"
    }

    async fn resolve(&self, headers: &HeaderMap) -> Result<Identity, Rejection> {
        let token = extract_token(headers).ok_or(Rejection::NoCredentials)?;
        let claims = match self.verify(token).await {
            Ok(claims) => claims,
            Err(err) => {
                tracing::debug!(
                    target: "vault_identity::bearer",
                    error = %err,
                    "bearer token rejected"
                );
                return Err(Rejection::InvalidToken);
            }
        };
        match claims.sub.filter(|sub| !sub.trim().is_empty()) {
            Some(user_id) => Ok(Identity {
                user_id,
                source: IdentitySource::Bearer,
            }),
            None => {
                tracing::debug!(
                    target: "vault_identity::bearer",
                    error = %IdentityError::MissingSubject,
                    "bearer token rejected"
                );
                Err(Rejection::InvalidToken)
            }
        }
    }
}

fn extract_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_requires_bearer_scheme() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer   "));
        assert_eq!(extract_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer a.b.c"));
        assert_eq!(extract_token(&headers), Some("a.b.c"));
    }
}
