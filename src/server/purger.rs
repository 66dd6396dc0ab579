use crate::domain_port::*;
use crate::logger::*;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Periodically drops refresh tokens past their expiry from the store.
pub struct TokenPurger {
    token_store: Arc<dyn RefreshTokenStore>,
    interval: Duration,
    cancellation_token: CancellationToken,
}

impl TokenPurger {
    pub fn new(
        token_store: Arc<dyn RefreshTokenStore>,
        interval: Duration,
        cancellation_token: CancellationToken,
    ) -> Self {
        Self {
            token_store,
            interval,
            cancellation_token,
        }
    }

    async fn tick_once(&self) -> anyhow::Result<u64> {
        let purged = self.token_store.purge_expired(Utc::now()).await?;
        if purged > 0 {
            info!("purged {} expired refresh token(s)", purged);
        }
        Ok(purged)
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    info!("token purger shutting down...");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.tick_once().await {
                        error!("token purger error: {:#}", e);
                    }
                }
            }
        }
        Ok(())
    }
}
