use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use zeroize::{Zeroize, Zeroizing};

/// Minimum accepted length of the token signing secret.
const MIN_SECRET_LEN: usize = 16;

/// The runtime mode the server runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
    Test,
}

impl AppEnv {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            other => anyhow::bail!("Unknown APP_ENV '{}'", other),
        }
    }

    /// Returns the canonical name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The connection string of the persistent store (`postgres://…` or `memory://`).
    pub database_url: String,
    /// The secret used to sign identity tokens.
    pub jwt_secret: Zeroizing<Vec<u8>>,
    /// How long an issued token stays valid.
    pub jwt_ttl: chrono::Duration,
    /// The port the HTTP server listens on.
    pub port: u16,
    /// The runtime mode.
    pub app_env: AppEnv,
    /// Origins allowed by CORS. Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Creates a new `Config` from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut secret = lookup("JWT_SECRET")
            .context("JWT_SECRET must be set (generate with: openssl rand -hex 32)")?;

        if secret.len() < MIN_SECRET_LEN {
            secret.zeroize();
            anyhow::bail!("JWT_SECRET must be at least {} bytes", MIN_SECRET_LEN);
        }

        let jwt_secret = Zeroizing::new(secret.as_bytes().to_vec());
        secret.zeroize();

        let app_env = match lookup("APP_ENV") {
            Some(value) => AppEnv::parse(&value)?,
            None => AppEnv::Development,
        };

        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        if app_env == AppEnv::Production && database_url.starts_with("memory://") {
            anyhow::bail!("DATABASE_URL must point to PostgreSQL in production");
        }

        let jwt_ttl = parse_ttl(&lookup("JWT_EXPIRES_IN").unwrap_or_else(|| "30d".to_string()))
            .context("Invalid JWT_EXPIRES_IN")?;

        let port = lookup("PORT")
            .unwrap_or_else(|| "5000".to_string())
            .parse()
            .context("Invalid PORT")?;

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_ttl,
            port,
            app_env,
            cors_origins,
        })
    }

    /// The socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip = match self.app_env {
            AppEnv::Production => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            _ => IpAddr::V4(Ipv4Addr::LOCALHOST),
        };
        SocketAddr::new(ip, self.port)
    }
}

/// Parses a time-to-live such as `3600`, `90s`, `15m`, `12h` or `30d`.
pub fn parse_ttl(value: &str) -> Result<chrono::Duration> {
    let value = value.trim();
    let (digits, unit) = match value.char_indices().find(|(_, c)| !c.is_ascii_digit()) {
        Some((idx, _)) => value.split_at(idx),
        None => (value, "s"),
    };

    let amount: i64 = digits
        .parse()
        .with_context(|| format!("'{}' is not a duration", value))?;
    if amount <= 0 {
        anyhow::bail!("duration must be positive");
    }

    let ttl = match unit.trim() {
        "s" => chrono::Duration::try_seconds(amount),
        "m" => chrono::Duration::try_minutes(amount),
        "h" => chrono::Duration::try_hours(amount),
        "d" => chrono::Duration::try_days(amount),
        other => anyhow::bail!("unknown duration unit '{}'", other),
    };

    ttl.context("duration out of range")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn parses_ttl_units() {
        assert_eq!(parse_ttl("3600").unwrap(), chrono::Duration::seconds(3600));
        assert_eq!(parse_ttl("15m").unwrap(), chrono::Duration::minutes(15));
        assert_eq!(parse_ttl("12h").unwrap(), chrono::Duration::hours(12));
        assert_eq!(parse_ttl("30d").unwrap(), chrono::Duration::days(30));
        assert!(parse_ttl("0").is_err());
        assert!(parse_ttl("5w").is_err());
        assert!(parse_ttl("abc").is_err());
    }

    #[test]
    fn applies_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "0123456789abcdef0123"),
            ("DATABASE_URL", "memory://"),
        ]))
        .unwrap();

        assert_eq!(config.port, 5000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.jwt_ttl, chrono::Duration::days(30));
        assert!(config.cors_origins.is_empty());
        assert!(config.bind_addr().ip().is_loopback());
    }

    #[test]
    fn rejects_short_secret_and_missing_database() {
        assert!(Config::from_lookup(lookup(&[
            ("JWT_SECRET", "short"),
            ("DATABASE_URL", "memory://"),
        ]))
        .is_err());

        assert!(Config::from_lookup(lookup(&[("JWT_SECRET", "0123456789abcdef0123")])).is_err());
    }

    #[test]
    fn production_requires_postgres() {
        let result = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "0123456789abcdef0123"),
            ("DATABASE_URL", "memory://"),
            ("APP_ENV", "production"),
        ]));
        assert!(result.is_err());

        let config = Config::from_lookup(lookup(&[
            ("JWT_SECRET", "0123456789abcdef0123"),
            ("DATABASE_URL", "postgres://wellness@localhost/wellness"),
            ("APP_ENV", "production"),
            ("PORT", "8080"),
            ("CORS_ORIGINS", "http://localhost:5173, https://app.example.com"),
        ]))
        .unwrap();
        assert!(config.bind_addr().ip().is_unspecified());
        assert_eq!(config.bind_addr().port(), 8080);
        assert_eq!(config.cors_origins.len(), 2);
    }
}
