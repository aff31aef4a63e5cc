use crate::auth::{CredentialVerifier, StaticCredentials};
use crate::config::AppConfig;
use crate::ships::ShipStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub ships: Arc<ShipStore>,
    pub credentials: Arc<dyn CredentialVerifier>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let credentials =
            Arc::new(StaticCredentials::from_config(&config.admin)?) as Arc<dyn CredentialVerifier>;
        Ok(Self::from_parts(config, Arc::new(ShipStore::new()), credentials))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        ships: Arc<ShipStore>,
        credentials: Arc<dyn CredentialVerifier>,
    ) -> Self {
        Self {
            config,
            ships,
            credentials,
        }
    }

    /// Test state: fixed JWT settings, the default admin pair and an empty store.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{AdminConfig, JwtConfig};
        use lazy_static::lazy_static;

        lazy_static! {
            // hashed once per test binary
            static ref CREDENTIALS: Arc<StaticCredentials> =
                Arc::new(StaticCredentials::new("admin", "password").expect("valid credentials"));
        }

        let config = Arc::new(AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_minutes: 5,
            },
            admin: AdminConfig {
                username: "admin".into(),
                password: "password".into(),
            },
        });

        let credentials = CREDENTIALS.clone() as Arc<dyn CredentialVerifier>;
        Self::from_parts(config, Arc::new(ShipStore::new()), credentials)
    }
}
