// Authentication module
// Credential lifecycle: password grant, scheduled refresh, shared read access

mod manager;
mod store;
mod types;

pub use manager::TokenManager;
pub use store::CredentialStore;
pub use types::{Credential, TokenResponse};
