use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::store::CredentialStore;
use super::types::{Credential, PasswordGrantRequest, RefreshGrantRequest, TokenResponse};
use crate::config::Config;
use crate::error::{ExchangeError, TokenTaskError};
use crate::source::TokenReader;
use crate::supervisor::Task;

/// Credential lifecycle manager
///
/// Performs the initial password-grant authentication, then keeps the
/// credential fresh by running refresh-grant exchanges ahead of expiry.
/// All writes to the credential go through this manager's run loop; readers
/// get the access token via [`TokenManager::access_token`].
pub struct TokenManager {
    /// HTTP client bounded by the configured timeout
    client: Client,

    /// Current credential, atomically replaced on every successful exchange
    store: CredentialStore,

    base_url: String,
    login: String,
    client_id: String,
    client_secret: String,
    password: String,

    /// Outbound request timeout, doubling as the renewal safety margin
    http_timeout: Duration,
}

impl TokenManager {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            store: CredentialStore::new(),
            base_url: config.base_url.clone(),
            login: config.login.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            password: config.password.clone(),
            http_timeout: config.http_timeout,
        })
    }

    fn token_url(&self) -> String {
        format!("{}/oauth/token", self.base_url)
    }

    /// Run one exchange against the token endpoint and mint a credential
    async fn exchange<B: Serialize>(&self, body: &B) -> Result<Credential, ExchangeError> {
        let response = self
            .client
            .post(self.token_url())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(ExchangeError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ExchangeError::Authority { status });
        }

        let token: TokenResponse = response.json().await.map_err(ExchangeError::Decode)?;

        Ok(Credential::issue(token, self.http_timeout))
    }

    /// Obtain the first credential via the password grant
    pub async fn authenticate(&self) -> Result<(), TokenTaskError> {
        let request = PasswordGrantRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            grant_type: "password",
            username: &self.login,
            password: &self.password,
        };

        let credential = self
            .exchange(&request)
            .await
            .map_err(TokenTaskError::Authentication)?;

        tracing::info!(expires_at = %credential.expires_at, "authenticated against authority");
        self.store.replace(credential).await;

        Ok(())
    }

    /// Replace the credential via the refresh grant
    ///
    /// The refresh token of the *current* credential is presented; on success
    /// the whole credential, including the refresh token, is rotated.
    pub async fn refresh(&self) -> Result<(), TokenTaskError> {
        let refresh_token = self
            .store
            .refresh_token()
            .await
            .ok_or(TokenTaskError::NotAuthenticated)?;

        let request = RefreshGrantRequest {
            client_id: &self.client_id,
            client_secret: &self.client_secret,
            grant_type: "refresh_token",
            refresh_token: &refresh_token,
        };

        let credential = self
            .exchange(&request)
            .await
            .map_err(TokenTaskError::Refresh)?;

        tracing::info!(expires_at = %credential.expires_at, "token refreshed");
        self.store.replace(credential).await;

        Ok(())
    }

    /// Current access token; safe for concurrent readers, never touches the network
    pub async fn access_token(&self) -> Option<String> {
        self.store.access_token().await
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &CredentialStore {
        &self.store
    }
}

#[async_trait]
impl Task for TokenManager {
    fn name(&self) -> &str {
        "token-manager"
    }

    /// Authenticate once, then refresh on schedule until cancelled
    ///
    /// A single failed exchange is terminal: the task returns the error and
    /// is not restarted.
    async fn run(&self, ctx: CancellationToken) -> Result<()> {
        tracing::info!("starting token manager");
        self.authenticate().await?;

        loop {
            let renew_at = self
                .store
                .renew_at()
                .await
                .ok_or(TokenTaskError::NotAuthenticated)?;

            tokio::select! {
                _ = tokio::time::sleep_until(renew_at) => {
                    tracing::debug!("renewal deadline reached");
                    self.refresh().await?;
                }
                _ = ctx.cancelled() => {
                    tracing::info!("cancellation observed, stopping token manager");
                    return Err(TokenTaskError::Cancelled.into());
                }
            }
        }
    }
}

#[async_trait]
impl TokenReader for TokenManager {
    async fn access_token(&self) -> Option<String> {
        TokenManager::access_token(self).await
    }
}
