use async_trait::async_trait;
use tracing::debug;

use super::{dto::Credentials, password};
use crate::{config::AdminConfig, validation::FieldErrors};

/// Decides whether a username/password pair may log in.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Returns the identity to put in the token, or `None` for a bad pair.
    async fn verify(&self, username: &str, password: &str) -> anyhow::Result<Option<String>>;
}

/// A single account held in memory; the password is kept only as an argon2 hash.
pub struct StaticCredentials {
    username: String,
    password_hash: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("invalid admin credentials: {0:?}")]
    Invalid(FieldErrors),
    #[error(transparent)]
    Hash(#[from] anyhow::Error),
}

impl StaticCredentials {
    pub fn new(username: &str, password: &str) -> Result<Self, CredentialsError> {
        let creds = Credentials::validate(Some(username), Some(password))
            .map_err(CredentialsError::Invalid)?;
        Ok(Self {
            password_hash: password::hash_password(&creds.password)?,
            username: creds.username,
        })
    }

    pub fn from_config(cfg: &AdminConfig) -> Result<Self, CredentialsError> {
        Self::new(&cfg.username, &cfg.password)
    }
}

#[async_trait]
impl CredentialVerifier for StaticCredentials {
    async fn verify(&self, username: &str, password: &str) -> anyhow::Result<Option<String>> {
        if username != self.username {
            debug!(%username, "unknown username");
            return Ok(None);
        }
        let hash = self.password_hash.clone();
        let password = password.to_string();
        let ok = tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
            .await??;
        Ok(ok.then(|| self.username.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn accepts_only_the_configured_pair() {
        let creds = StaticCredentials::new("admin", "password").unwrap();
        assert_eq!(
            creds.verify("admin", "password").await.unwrap().as_deref(),
            Some("admin")
        );
        assert_eq!(creds.verify("admin", "wrong-password").await.unwrap(), None);
        assert_eq!(creds.verify("x", "password").await.unwrap(), None);
    }

    #[test]
    fn rejects_short_configured_password() {
        let err = StaticCredentials::new("admin", "short").err().expect("too short");
        match err {
            CredentialsError::Invalid(errors) => assert!(errors.get("password").is_some()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
