// Device polling task (placeholder)

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::supervisor::Task;

/// Read-side capability the polling task needs from the credential manager
#[async_trait]
pub trait TokenReader: Send + Sync {
    /// Current bearer token, if one is installed
    async fn access_token(&self) -> Option<String>;
}

/// Polls device state from the Vakio cloud using the shared credential.
///
/// Polling is not wired up yet: `run` completes immediately.
/// TODO: poll the device state endpoints on `poll_interval` once the
/// device API client lands.
pub struct DeviceSource {
    #[allow(dead_code)]
    tokens: Arc<dyn TokenReader>,
    #[allow(dead_code)]
    poll_interval: Duration,
}

impl DeviceSource {
    pub fn new(tokens: Arc<dyn TokenReader>, poll_interval: Duration) -> Self {
        Self {
            tokens,
            poll_interval,
        }
    }
}

#[async_trait]
impl Task for DeviceSource {
    fn name(&self) -> &str {
        "device-source"
    }

    async fn run(&self, _ctx: CancellationToken) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedToken;

    #[async_trait]
    impl TokenReader for FixedToken {
        async fn access_token(&self) -> Option<String> {
            Some("token".to_string())
        }
    }

    #[tokio::test]
    async fn test_run_completes_immediately() {
        let source = DeviceSource::new(Arc::new(FixedToken), Duration::from_secs(300));
        let result = source.run(CancellationToken::new()).await;
        assert!(result.is_ok());
    }
}
