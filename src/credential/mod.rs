//! Shared secret storage, verification and startup bootstrap.

mod bootstrap;
mod secret;
mod store;

pub use bootstrap::{bootstrap, change_secret};
pub use secret::Secret;
pub use store::CredentialStore;
