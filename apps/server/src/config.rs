use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use url::Url;
use ysws_notifier_core::constants::{
    DEFAULT_NOTIFICATION_URL, DEFAULT_PUSH_CONCURRENCY, DEFAULT_PUSH_TIMEOUT_MS,
};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATA_PATH: &str = "./data/store.json";
const DEFAULT_CHECK_INTERVAL_SECS: u64 = 15 * 60;
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("expected 'text' or 'json', got '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub vapid_public_key: String,
    pub vapid_private_key: String,
    pub vapid_subject: String,
    pub catalog_url: Url,
    pub listen_addr: SocketAddr,
    pub data_path: PathBuf,
    pub check_interval: Duration,
    pub push_concurrency: usize,
    pub push_timeout: Duration,
    /// Timeout for the upstream catalog request.
    pub request_timeout: Duration,
    pub notification_url: String,
    pub prune_gone_subscriptions: bool,
    pub log_format: LogFormat,
}

impl Config {
    /// Reads configuration from the process environment, loading `.env` first.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| var(key).ok_or_else(|| anyhow!("{key} must be set"));

        let catalog_url = required("CATALOG_URL")?;
        let catalog_url =
            Url::parse(&catalog_url).with_context(|| format!("CATALOG_URL '{catalog_url}'"))?;
        if !matches!(catalog_url.scheme(), "http" | "https") {
            bail!("CATALOG_URL must be an http(s) URL");
        }

        Ok(Self {
            vapid_public_key: required("VAPID_PUBLIC_KEY")?,
            vapid_private_key: required("VAPID_PRIVATE_KEY")?,
            vapid_subject: required("VAPID_SUBJECT")?,
            catalog_url,
            listen_addr: parse_or(
                var("NOTIFIER_LISTEN_ADDR"),
                "NOTIFIER_LISTEN_ADDR",
                DEFAULT_LISTEN_ADDR.parse()?,
            )?,
            data_path: var("NOTIFIER_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            check_interval: Duration::from_secs(positive(
                parse_or(
                    var("NOTIFIER_CHECK_INTERVAL_SECS"),
                    "NOTIFIER_CHECK_INTERVAL_SECS",
                    DEFAULT_CHECK_INTERVAL_SECS,
                )?,
                "NOTIFIER_CHECK_INTERVAL_SECS",
            )?),
            push_concurrency: positive(
                parse_or(
                    var("NOTIFIER_PUSH_CONCURRENCY"),
                    "NOTIFIER_PUSH_CONCURRENCY",
                    DEFAULT_PUSH_CONCURRENCY,
                )?,
                "NOTIFIER_PUSH_CONCURRENCY",
            )?,
            push_timeout: Duration::from_millis(positive(
                parse_or(
                    var("NOTIFIER_PUSH_TIMEOUT_MS"),
                    "NOTIFIER_PUSH_TIMEOUT_MS",
                    DEFAULT_PUSH_TIMEOUT_MS,
                )?,
                "NOTIFIER_PUSH_TIMEOUT_MS",
            )?),
            request_timeout: Duration::from_millis(positive(
                parse_or(
                    var("NOTIFIER_REQUEST_TIMEOUT_MS"),
                    "NOTIFIER_REQUEST_TIMEOUT_MS",
                    DEFAULT_REQUEST_TIMEOUT_MS,
                )?,
                "NOTIFIER_REQUEST_TIMEOUT_MS",
            )?),
            notification_url: var("NOTIFIER_NOTIFICATION_URL")
                .unwrap_or_else(|| DEFAULT_NOTIFICATION_URL.to_string()),
            prune_gone_subscriptions: parse_or(
                var("NOTIFIER_PRUNE_GONE_SUBSCRIPTIONS"),
                "NOTIFIER_PRUNE_GONE_SUBSCRIPTIONS",
                false,
            )?,
            log_format: parse_or(
                var("NOTIFIER_LOG_FORMAT"),
                "NOTIFIER_LOG_FORMAT",
                LogFormat::Text,
            )?,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse()
            .map_err(|e| anyhow!("{key} has invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}

fn positive<T>(value: T, key: &str) -> anyhow::Result<T>
where
    T: PartialOrd + Default,
{
    if value > T::default() {
        Ok(value)
    } else {
        bail!("{key} must be greater than zero")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("VAPID_PUBLIC_KEY", "pub"),
        ("VAPID_PRIVATE_KEY", "priv"),
        ("VAPID_SUBJECT", "mailto:ops@example.com"),
        ("CATALOG_URL", "https://api.example.com/programs"),
    ];

    #[test]
    fn defaults_apply_when_only_required_values_are_set() {
        let config = Config::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.data_path, PathBuf::from("./data/store.json"));
        assert_eq!(config.check_interval, Duration::from_secs(900));
        assert_eq!(config.push_concurrency, 8);
        assert_eq!(config.push_timeout, Duration::from_millis(10_000));
        assert_eq!(config.request_timeout, Duration::from_millis(30_000));
        assert_eq!(config.notification_url, "https://ysws-tracker.pages.dev");
        assert!(!config.prune_gone_subscriptions);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn missing_required_value_is_an_error() {
        let err = Config::from_lookup(lookup(&REQUIRED[1..])).unwrap_err();
        assert!(err.to_string().contains("VAPID_PUBLIC_KEY"));
    }

    #[test]
    fn blank_required_value_counts_as_missing() {
        let mut vars = REQUIRED.to_vec();
        vars[2] = ("VAPID_SUBJECT", "   ");
        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("VAPID_SUBJECT"));
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("NOTIFIER_LISTEN_ADDR", "127.0.0.1:9000"),
            ("NOTIFIER_CHECK_INTERVAL_SECS", "60"),
            ("NOTIFIER_PUSH_CONCURRENCY", "2"),
            ("NOTIFIER_PRUNE_GONE_SUBSCRIPTIONS", "true"),
            ("NOTIFIER_LOG_FORMAT", "JSON"),
        ]);
        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.check_interval, Duration::from_secs(60));
        assert_eq!(config.push_concurrency, 2);
        assert!(config.prune_gone_subscriptions);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for (key, value) in [
            ("NOTIFIER_PUSH_CONCURRENCY", "0"),
            ("NOTIFIER_CHECK_INTERVAL_SECS", "soon"),
            ("NOTIFIER_LOG_FORMAT", "xml"),
            ("CATALOG_URL", "ftp://example.com/programs"),
        ] {
            let mut vars = REQUIRED.to_vec();
            // Later entries win in the lookup map.
            vars.push((key, value));
            let err = Config::from_lookup(lookup(&vars)).unwrap_err();
            assert!(err.to_string().contains(key), "{key}: {err}");
        }
    }
}
