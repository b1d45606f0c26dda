use directories::BaseDirs;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::OffsetDateTime;

pub const SESSION_FILE_ENV: &str = "COMPOSTER_SESSION_FILE";

/// Session written by `composter login`. The bridge only ever reads it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(alias = "jwt", alias = "token")]
    pub bearer_token: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub obtained_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("unable to determine home directory")]
    NoHome,
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed session file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("session file has an empty bearer token")]
    EmptyToken,
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `$COMPOSTER_SESSION_FILE`, falling back to `~/.composter/session.json`.
    pub fn from_env() -> Result<Self, CredentialError> {
        if let Ok(path) = std::env::var(SESSION_FILE_ENV) {
            let trimmed = path.trim();
            if !trimmed.is_empty() {
                return Ok(Self::new(trimmed));
            }
        }
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf, CredentialError> {
        let base = BaseDirs::new().ok_or(CredentialError::NoHome)?;
        Ok(base.home_dir().join(".composter").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing or corrupt sessions degrade to `None`; this never fails.
    pub fn load(&self) -> Option<Credential> {
        match self.read() {
            Ok(credential) => Some(credential),
            Err(CredentialError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    target: "composter::auth",
                    path = %self.path.display(),
                    "no stored session"
                );
                None
            }
            Err(err) => {
                tracing::warn!(
                    target: "composter::auth",
                    path = %self.path.display(),
                    error = %err,
                    "ignoring unusable session file"
                );
                None
            }
        }
    }

    pub fn exists(&self) -> bool {
        self.load().is_some()
    }

    fn read(&self) -> Result<Credential, CredentialError> {
        let raw = fs::read_to_string(&self.path)?;
        let mut credential: Credential = serde_json::from_str(&raw)?;
        credential.bearer_token = credential.bearer_token.trim().to_string();
        if credential.bearer_token.is_empty() {
            return Err(CredentialError::EmptyToken);
        }
        Ok(credential)
    }
}
