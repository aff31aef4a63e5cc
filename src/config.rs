use serde::Deserialize;
use tracing::warn;

pub const DEV_JWT_SECRET: &str = "dev-secret-key";

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Credential pair accepted by the login endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let production = lookup("APP_ENV").is_some_and(|v| v == "production");

        let secret = match lookup("JWT_SECRET_KEY").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if production => {
                anyhow::bail!("JWT_SECRET_KEY must be set when APP_ENV=production")
            }
            None => {
                warn!("JWT_SECRET_KEY not set; using the insecure development secret");
                DEV_JWT_SECRET.into()
            }
        };

        let jwt = JwtConfig {
            secret,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "ships-api".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "ships-api-clients".into()),
            ttl_minutes: lookup("JWT_TTL_MINUTES")
                .and_then(|v| v.parse::<i64>().ok())
                .filter(|v| *v > 0)
                .unwrap_or(15),
        };
        let admin = AdminConfig {
            username: lookup("ADMIN_USERNAME").unwrap_or_else(|| "admin".into()),
            password: lookup("ADMIN_PASSWORD").unwrap_or_else(|| "password".into()),
        };

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("APP_PORT")
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            jwt,
            admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let cfg = config_from(&[]).expect("defaults should load");
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.jwt.secret, DEV_JWT_SECRET);
        assert_eq!(cfg.jwt.ttl_minutes, 15);
        assert_eq!(cfg.admin.username, "admin");
        assert_eq!(cfg.admin.password, "password");
    }

    #[test]
    fn reads_overrides() {
        let cfg = config_from(&[
            ("APP_PORT", "9000"),
            ("JWT_SECRET_KEY", "s3cret"),
            ("JWT_TTL_MINUTES", "60"),
            ("ADMIN_USERNAME", "captain"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.jwt.secret, "s3cret");
        assert_eq!(cfg.jwt.ttl_minutes, 60);
        assert_eq!(cfg.admin.username, "captain");
    }

    #[test]
    fn bad_numbers_fall_back_to_defaults() {
        let cfg = config_from(&[("APP_PORT", "nope"), ("JWT_TTL_MINUTES", "-3")]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.jwt.ttl_minutes, 15);
    }

    #[test]
    fn production_requires_secret() {
        let err = config_from(&[("APP_ENV", "production")]).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET_KEY"));

        let cfg = config_from(&[("APP_ENV", "production"), ("JWT_SECRET_KEY", "real")]).unwrap();
        assert_eq!(cfg.jwt.secret, "real");
    }
}
