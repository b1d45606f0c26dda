use std::collections::HashMap;
use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::IdentityError;

/// Remote key set, cached by key id.
///
/// Keys are fetched lazily the first time an unknown `kid` is seen and are
/// kept for the life of the process. A rotated-away key is never evicted; a
/// token signed by a key the provider no longer publishes simply fails to
/// verify.
#[derive(Clone)]
pub struct KeySet {
    url: String,
    client: reqwest::Client,
    keys: Arc<RwLock<HashMap<String, CachedKey>>>,
}

#[derive(Clone)]
pub(crate) struct CachedKey {
    pub key: DecodingKey,
    pub algorithm: Algorithm,
}

impl KeySet {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
            keys: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub(crate) async fn key(&self, kid: &str) -> Result<CachedKey, IdentityError> {
        if let Some(key) = self.keys.read().await.get(kid) {
            return Ok(key.clone());
        }

        let mut keys = self.keys.write().await;
        if !keys.contains_key(kid) {
            let fetched = self.fetch().await?;
            tracing::debug!(
                target: "vault_identity::jwks",
                url = %self.url,
                count = fetched.len(),
                "fetched remote key set"
            );
            for (id, key) in fetched {
                keys.entry(id).or_insert(key);
            }
        }

        keys.get(kid)
            .cloned()
            .ok_or_else(|| IdentityError::UnknownKey(kid.to_string()))
    }

    async fn fetch(&self) -> Result<HashMap<String, CachedKey>, IdentityError> {
        let resp = self.client.get(&self.url).send().await?;
        let resp = resp.error_for_status().map_err(|err| {
            IdentityError::JwksFetch(format!("status: {}", err.status().unwrap_or_default()))
        })?;
        let document: JwksDocument = resp.json().await?;
        let keys = decode_keys(document)?;
        if keys.is_empty() {
            return Err(IdentityError::JwksFetch("no usable keys returned".into()));
        }
        Ok(keys)
    }
}

fn decode_keys(document: JwksDocument) -> Result<HashMap<String, CachedKey>, IdentityError> {
    let mut keys = HashMap::new();
    for jwk in document.keys {
        let Jwk {
            kid,
            kty,
            n,
            e,
            x,
            y,
            crv,
        } = jwk;
        let Some(kid) = kid else {
            continue;
        };

        let cached = match (kty.as_str(), crv.as_deref()) {
            ("RSA", _) => {
                let (Some(n), Some(e)) = (n, e) else {
                    continue;
                };
                CachedKey {
                    key: DecodingKey::from_rsa_components(&n, &e)?,
                    algorithm: Algorithm::RS256,
                }
            }
            ("EC", Some("P-256")) => {
                let (Some(x), Some(y)) = (x, y) else {
                    continue;
                };
                CachedKey {
                    key: DecodingKey::from_ec_components(&x, &y)?,
                    algorithm: Algorithm::ES256,
                }
            }
            ("OKP", Some("Ed25519")) => {
                let Some(x) = x else {
                    continue;
                };
                CachedKey {
                    key: DecodingKey::from_ed_components(&x)?,
                    algorithm: Algorithm::EdDSA,
                }
            }
            _ => continue,
        };
        keys.insert(kid, cached);
    }
    Ok(keys)
}

/// The token header's algorithm must be the one its key was published for.
pub(crate) fn select_algorithm(
    header_alg: Algorithm,
    key_alg: Algorithm,
) -> Result<Algorithm, IdentityError> {
    match header_alg {
        Algorithm::RS256 | Algorithm::ES256 | Algorithm::EdDSA if header_alg == key_alg => {
            Ok(header_alg)
        }
        Algorithm::RS256 | Algorithm::ES256 | Algorithm::EdDSA => Err(
            IdentityError::UnsupportedAlgorithm(format!("{header_alg:?} (expected {key_alg:?})")),
        ),
        other => Err(IdentityError::UnsupportedAlgorithm(format!("{other:?}"))),
    }
}

#[derive(Debug, Deserialize)]
struct JwksDocument {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    #[serde(default)]
    kid: Option<String>,
    kty: String,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
    #[serde(default)]
    x: Option<String>,
    #[serde(default)]
    y: Option<String>,
    #[serde(default)]
    crv: Option<String>,
}
