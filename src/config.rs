use anyhow::Context;
use serde::Deserialize;

/// One year; anything longer is almost certainly a typo.
pub const MAX_JWT_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// mutate the process environment.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?;

        let jwt = JwtConfig {
            secret: lookup("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: lookup("JWT_ISSUER").unwrap_or_else(|| "enquiry-desk".into()),
            audience: lookup("JWT_AUDIENCE").unwrap_or_else(|| "enquiry-desk-staff".into()),
            ttl_minutes: parse_or(&lookup, "JWT_TTL_MINUTES", 60)?,
        };
        anyhow::ensure!(
            (1..=MAX_JWT_TTL_MINUTES).contains(&jwt.ttl_minutes),
            "JWT_TTL_MINUTES must be between 1 and {MAX_JWT_TTL_MINUTES}"
        );

        // APP_PORT wins; PORT is honoured for platforms that inject it.
        let port = match lookup("APP_PORT").or_else(|| lookup("PORT")) {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid port {raw:?}"))?,
            None => 3000,
        };
        let server = ServerConfig {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        };

        Ok(Self {
            database_url,
            database_max_connections,
            jwt,
            server,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn applies_defaults() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/enquiries"),
            ("JWT_SECRET", "s3cret"),
        ]))
        .expect("config parses");

        assert_eq!(cfg.database_max_connections, 10);
        assert_eq!(cfg.jwt.issuer, "enquiry-desk");
        assert_eq!(cfg.jwt.audience, "enquiry-desk-staff");
        assert_eq!(cfg.jwt.ttl_minutes, 60);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
    }

    #[test]
    fn falls_back_to_port_variable() {
        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/enquiries"),
            ("JWT_SECRET", "s3cret"),
            ("PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(cfg.server.port, 9000);

        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/enquiries"),
            ("JWT_SECRET", "s3cret"),
            ("PORT", "9000"),
            ("APP_PORT", "8081"),
        ]))
        .unwrap();
        assert_eq!(cfg.server.port, 8081);
    }

    #[test]
    fn requires_secret_and_database() {
        let err = AppConfig::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));

        let err = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "postgres://localhost/enquiries",
        )]))
        .unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn rejects_garbage_numbers() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/enquiries"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_MINUTES", "soon"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("JWT_TTL_MINUTES"));
    }

    #[test]
    fn rejects_out_of_range_ttl() {
        for ttl in ["0", "-5", "525601", "9223372036854775807"] {
            let err = AppConfig::from_lookup(lookup_from(&[
                ("DATABASE_URL", "postgres://localhost/enquiries"),
                ("JWT_SECRET", "s3cret"),
                ("JWT_TTL_MINUTES", ttl),
            ]))
            .unwrap_err();
            assert!(err.to_string().contains("JWT_TTL_MINUTES"), "{ttl}");
        }

        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/enquiries"),
            ("JWT_SECRET", "s3cret"),
            ("JWT_TTL_MINUTES", "525600"),
        ]))
        .unwrap();
        assert_eq!(cfg.jwt.ttl_minutes, MAX_JWT_TTL_MINUTES);
    }
}
