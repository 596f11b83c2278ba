use error_stack::{Report, ResultExt};
use std::error::Error;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
#[error("invalid configuration")]
pub struct ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub pool_size: Option<usize>,
    pub metrics_enabled: bool,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, Report<ConfigError>> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Report<ConfigError>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| Report::new(ConfigError))
            .attach("DATABASE_URL is missing")?;

        Ok(Self {
            host: parse(&lookup, "APP_HOST")?.unwrap_or(DEFAULT_HOST),
            port: parse(&lookup, "APP_PORT")?.unwrap_or(DEFAULT_PORT),
            database_url,
            pool_size: parse(&lookup, "DATABASE_POOL_SIZE")?,
            metrics_enabled: parse(&lookup, "METRICS_ENABLED")?.unwrap_or(true),
            request_timeout: Duration::from_secs(
                parse(&lookup, "REQUEST_TIMEOUT_SECS")?.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        })
    }
}

/// `None` when the variable is unset or blank.
fn parse<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, Report<ConfigError>>
where
    T: FromStr,
    T::Err: Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<T>()
                .change_context(ConfigError)
                .attach_with(|| format!("{key} has an invalid value '{v}'"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, Report<ConfigError>> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = config(&[("DATABASE_URL", "postgres://localhost/news")]).unwrap();

        assert_eq!(
            AppConfig {
                host: DEFAULT_HOST,
                port: 8000,
                database_url: "postgres://localhost/news".into(),
                pool_size: None,
                metrics_enabled: true,
                request_timeout: Duration::from_secs(30),
            },
            config
        );
    }

    #[test]
    fn every_variable_is_read() {
        let config = config(&[
            ("DATABASE_URL", "postgres://db/news"),
            ("APP_HOST", "0.0.0.0"),
            ("APP_PORT", "9000"),
            ("DATABASE_POOL_SIZE", "4"),
            ("METRICS_ENABLED", "false"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();

        assert_eq!(IpAddr::V4(Ipv4Addr::UNSPECIFIED), config.host);
        assert_eq!(9000, config.port);
        assert_eq!(Some(4), config.pool_size);
        assert!(!config.metrics_enabled);
        assert_eq!(Duration::from_secs(5), config.request_timeout);
    }

    #[rstest]
    #[case::missing(&[])]
    #[case::blank(&[("DATABASE_URL", "  ")])]
    fn database_url_is_required(#[case] vars: &[(&str, &str)]) {
        assert!(config(vars).is_err());
    }

    #[rstest]
    #[case::port(("APP_PORT", "eighty"))]
    #[case::host(("APP_HOST", "not-an-ip"))]
    #[case::metrics(("METRICS_ENABLED", "yes"))]
    fn malformed_values_are_rejected(#[case] var: (&str, &str)) {
        assert!(config(&[("DATABASE_URL", "postgres://db/news"), var]).is_err());
    }
}
