// Thread-safe holder of the current credential

use tokio::sync::RwLock;
use tokio::time::Instant;

use super::types::Credential;

/// Single-writer/many-reader store for the current [`Credential`]
///
/// Readers only ever see a complete credential: `replace` swaps the whole
/// value under the write lock, so an access token and refresh token observed
/// together always belong to the same issuance. The store never hands out a
/// mutable reference.
#[derive(Debug, Default)]
pub struct CredentialStore {
    current: RwLock<Option<Credential>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically install a new credential, discarding the previous one
    pub async fn replace(&self, credential: Credential) {
        let mut current = self.current.write().await;
        *current = Some(credential);
    }

    /// Current access token, if authenticated
    pub async fn access_token(&self) -> Option<String> {
        let current = self.current.read().await;
        current.as_ref().map(|c| c.access_token.clone())
    }

    /// Current refresh token, if authenticated
    pub async fn refresh_token(&self) -> Option<String> {
        let current = self.current.read().await;
        current.as_ref().map(|c| c.refresh_token.clone())
    }

    /// Renewal deadline of the current credential
    pub async fn renew_at(&self) -> Option<Instant> {
        let current = self.current.read().await;
        current.as_ref().map(|c| c.renew_at)
    }

    /// Clone of the whole current credential
    pub async fn snapshot(&self) -> Option<Credential> {
        let current = self.current.read().await;
        current.clone()
    }
}
