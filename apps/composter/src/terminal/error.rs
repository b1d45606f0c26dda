use std::io;
use thiserror::Error;

use crate::auth::CredentialError;
use crate::mcp::setup::SetupError;
use crate::vault::VaultError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Credentials(#[from] CredentialError),
    #[error("{0}")]
    Vault(#[from] VaultError),
    #[error("{0}")]
    Setup(#[from] SetupError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("not logged in. {hint}")]
    NotLoggedIn { hint: &'static str },
    #[error("logging initialization failed: {0}")]
    Logging(String),
    #[error("mcp server error: {0}")]
    Server(String),
}
