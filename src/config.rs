use std::{env, str::FromStr, time::Duration};

use anyhow::Context;

const DEFAULT_JWT_SECRET: &str = "your-secret-key";

/// Runtime settings, read from the environment (and `.env`) once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub hospital_create_limit: u32,
    pub hospital_create_window: Duration,
    pub default_max_queue_size: i32,
    pub default_max_beds: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "quickcare.db".to_string(),
            bind_address: "127.0.0.1:8080".to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl_hours: 24,
            hospital_create_limit: 5,
            hospital_create_window: Duration::from_secs(24 * 60 * 60),
            default_max_queue_size: 50,
            default_max_beds: 100,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("JWT_SECRET is not set, falling back to an insecure default");
            defaults.jwt_secret.clone()
        });

        Ok(Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_address: env::var("BIND_ADDRESS").unwrap_or(defaults.bind_address),
            jwt_secret,
            token_ttl_hours: parse_var("TOKEN_TTL_HOURS", defaults.token_ttl_hours)?,
            hospital_create_limit: parse_var(
                "HOSPITAL_CREATE_LIMIT",
                defaults.hospital_create_limit,
            )?,
            hospital_create_window: Duration::from_secs(parse_var(
                "HOSPITAL_CREATE_WINDOW_SECS",
                defaults.hospital_create_window.as_secs(),
            )?),
            default_max_queue_size: parse_var(
                "DEFAULT_MAX_QUEUE_SIZE",
                defaults.default_max_queue_size,
            )?,
            default_max_beds: parse_var("DEFAULT_MAX_BEDS", defaults.default_max_beds)?,
        })
    }
}

fn parse_var<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, value)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let value = parse_var("QUICKCARE_TEST_UNSET_VARIABLE", 42u32).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn malformed_variables_are_rejected() {
        env::set_var("QUICKCARE_TEST_BAD_NUMBER", "fifty");
        let err = parse_var("QUICKCARE_TEST_BAD_NUMBER", 50i32).unwrap_err();
        assert!(err.to_string().contains("QUICKCARE_TEST_BAD_NUMBER"));
    }

    #[test]
    fn defaults_match_the_registration_policy() {
        let config = Config::default();
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.hospital_create_limit, 5);
        assert_eq!(config.hospital_create_window, Duration::from_secs(86_400));
        assert_eq!(config.default_max_queue_size, 50);
        assert_eq!(config.default_max_beds, 100);
    }
}
