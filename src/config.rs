use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_API_BASE_URL: &str = "https://labelspy-latest.onrender.com/api";
pub const DEFAULT_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub refresh_token: String,
    pub token_url: String,
}

/// Where the bearer credential comes from.
#[derive(Debug, Clone, Deserialize)]
pub enum IdentityConfig {
    Anonymous,
    StaticToken(String),
    Firebase(FirebaseConfig),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    /// Wait before each attempt; the first entry is usually zero.
    pub retry_delays: Vec<Duration>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub identity: IdentityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
            retry_delays: vec![
                Duration::ZERO,
                Duration::from_secs(2),
                Duration::from_secs(5),
            ],
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            identity: IdentityConfig::Anonymous,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = var("FINEPRINT_API_BASE_URL")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);

        let retry_delays = match var("FINEPRINT_RETRY_DELAYS_MS") {
            Some(raw) => parse_delays(&raw).context("parse FINEPRINT_RETRY_DELAYS_MS")?,
            None => defaults.retry_delays,
        };

        let timeout = match var("FINEPRINT_TIMEOUT_SECS") {
            Some(raw) => parse_secs(&raw).context("parse FINEPRINT_TIMEOUT_SECS")?,
            None => defaults.timeout,
        };
        let connect_timeout = match var("FINEPRINT_CONNECT_TIMEOUT_SECS") {
            Some(raw) => parse_secs(&raw).context("parse FINEPRINT_CONNECT_TIMEOUT_SECS")?,
            None => defaults.connect_timeout,
        };

        let identity = match (
            var("FINEPRINT_ID_TOKEN"),
            var("FIREBASE_API_KEY"),
            var("FIREBASE_REFRESH_TOKEN"),
        ) {
            (Some(token), _, _) if !token.trim().is_empty() => {
                IdentityConfig::StaticToken(token.trim().to_string())
            }
            (_, Some(api_key), Some(refresh_token)) => IdentityConfig::Firebase(FirebaseConfig {
                api_key,
                refresh_token,
                token_url: var("FIREBASE_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.into()),
            }),
            _ => IdentityConfig::Anonymous,
        };

        Ok(Self {
            api_base_url,
            retry_delays,
            timeout,
            connect_timeout,
            identity,
        })
    }
}

fn parse_secs(raw: &str) -> anyhow::Result<Duration> {
    let secs = raw
        .trim()
        .parse::<u64>()
        .with_context(|| format!("invalid number of seconds {:?}", raw))?;
    Ok(Duration::from_secs(secs))
}

fn parse_delays(raw: &str) -> anyhow::Result<Vec<Duration>> {
    let delays = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map(Duration::from_millis)
                .with_context(|| format!("invalid delay {:?}", s))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    anyhow::ensure!(!delays.is_empty(), "at least one attempt is required");
    Ok(delays)
}
