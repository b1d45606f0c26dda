pub mod client;
pub mod error;
pub mod models;
pub mod normalize;

pub use client::VaultClient;
pub use error::VaultError;
pub use models::{CategoryRef, ComponentRecord};
pub use normalize::{ComponentCode, NormalizedComponent, normalize};
