use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Not authenticated. Run 'composter login' first.")]
    Unauthenticated,
    #[error("Session expired. Run 'composter login' again.")]
    SessionExpired,
    #[error("not found")]
    NotFound,
    #[error("{message}")]
    Remote { status: StatusCode, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response from vault: {0}")]
    InvalidResponse(String),
}

impl VaultError {
    /// Auth failures that a fresh `composter login` would fix.
    pub fn needs_login(&self) -> bool {
        matches!(self, VaultError::Unauthenticated | VaultError::SessionExpired)
    }
}

impl From<reqwest::Error> for VaultError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            VaultError::InvalidResponse(err.to_string())
        } else {
            VaultError::Transport(err.to_string())
        }
    }
}
