pub mod credentials;

pub use credentials::{Credential, CredentialError, CredentialStore};

pub const LOGIN_HINT: &str = "Run 'composter login' first.";
