use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::SubjectId;
use crate::domain_port::*;
use crate::infra_memory::*;
use crate::infra_mysql::*;
use crate::infra_redis::*;
use crate::logger::*;
use crate::server::TokenPurger;
use crate::settings::Settings;
use anyhow::anyhow;
use sqlx::MySqlPool;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct Server {
    pub authentication_service: Arc<dyn AuthenticationService>,
    pub token_manager: Arc<dyn TokenManager>,
    purger_handle: Mutex<Option<JoinHandle<()>>>,
    cancel: CancellationToken,
    pool: Option<MySqlPool>,
}

impl Server {
    /// Wrap already-built services, without background tasks or pools.
    pub fn new(
        authentication_service: Arc<dyn AuthenticationService>,
        token_manager: Arc<dyn TokenManager>,
    ) -> Self {
        Self {
            authentication_service,
            token_manager,
            purger_handle: Mutex::new(None),
            cancel: CancellationToken::new(),
            pool: None,
        }
    }

    pub async fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let token_manager: Arc<dyn TokenManager> = Arc::new(JwtTokenManager::try_new(TokenConfig {
            access_token_key: settings.token.access_token_key.clone().into_bytes(),
            refresh_token_key: settings.token.refresh_token_key.clone().into_bytes(),
            access_token_age: Duration::from_secs(settings.token.access_token_age_secs),
            refresh_token_age: Duration::from_secs(settings.token.refresh_token_age_secs),
        })?);

        let needs_mysql = settings.store.backend == "mysql" || settings.auth.backend == "real";
        let pool = if needs_mysql {
            let mysql_settings = settings
                .mysql
                .as_ref()
                .ok_or_else(|| anyhow!("[mysql] settings are required"))?;
            Some(MySqlPool::connect(&mysql_settings.dsn).await?)
        } else {
            None
        };

        let token_store: Arc<dyn RefreshTokenStore> = match settings.store.backend.as_str() {
            "memory" => Arc::new(MemoryRefreshTokenStore::new()),
            "redis" => {
                let redis_settings = settings
                    .redis
                    .as_ref()
                    .ok_or_else(|| anyhow!("[redis] settings are required"))?;
                let redis_client = redis::Client::open(redis_settings.dsn.as_str())?;
                let redis_manager = redis_client.get_connection_manager().await?;
                Arc::new(RedisRefreshTokenStore::new(
                    redis_manager,
                    settings.store.key_prefix.clone(),
                ))
            }
            "mysql" => {
                let pool = pool.clone().ok_or_else(|| anyhow!("mysql pool missing"))?;
                let store = MySqlRefreshTokenStore::new(pool);
                store.ensure_schema().await?;
                Arc::new(store)
            }
            other => return Err(anyhow!("Unknown store backend: {}", other)),
        };

        let credential_verifier: Arc<dyn CredentialVerifier> = match settings.auth.backend.as_str()
        {
            "fake" => {
                let verifier = FakeCredentialVerifier::new();
                for user in &settings.auth.seed_users {
                    verifier.add_user(
                        user.username.clone(),
                        user.password.clone(),
                        SubjectId::new(user.id.clone()),
                    );
                }
                Arc::new(verifier)
            }
            "real" => {
                let pool = pool.clone().ok_or_else(|| anyhow!("mysql pool missing"))?;
                Arc::new(RealCredentialVerifier::new(
                    Arc::new(MySqlAuthRepo::new(pool)),
                    Arc::new(Argon2PasswordHasher),
                ))
            }
            other => return Err(anyhow!("Unknown auth backend: {}", other)),
        };

        let authentication_service: Arc<dyn AuthenticationService> =
            Arc::new(RealAuthenticationService::new(
                credential_verifier,
                token_manager.clone(),
                token_store.clone(),
                Arc::new(JsonPayloadValidator::new()),
            ));

        // region runtime infra
        let cancel = CancellationToken::new();

        let purger_handle = if settings.store.purge_interval_secs > 0 {
            let purger = TokenPurger::new(
                token_store,
                Duration::from_secs(settings.store.purge_interval_secs),
                cancel.clone(),
            );
            Some(tokio::spawn(async move {
                let _ = purger.run().await;
            }))
        } else {
            None
        };

        // endregion

        info!(
            store = %settings.store.backend,
            auth = %settings.auth.backend,
            "server started"
        );

        Ok(Self {
            authentication_service,
            token_manager,
            purger_handle: Mutex::new(purger_handle),
            cancel,
            pool,
        })
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        let handle = self
            .purger_handle
            .lock()
            .ok()
            .and_then(|mut lock| lock.take());
        if let Some(handle) = handle {
            let r = handle.await;
            info!("purger handle dropped: {:?}", r);
        }

        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
