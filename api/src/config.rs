use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::adapters::WorkerPoolConfig;
use crate::app::DEFAULT_REVIEWERS_PER_PR;
use crate::error::ConfigError;

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_EVENT_WORKERS: usize = 4;
const DEFAULT_EVENT_TASK_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub http_addr: SocketAddr,
    /// Size of the event dispatch worker pool
    pub event_workers: usize,
    /// Advisory deadline per event task; also bounds shutdown drain
    pub event_task_timeout: Duration,
    pub reviewers_per_pr: usize,
    /// Fixed seed for reproducible reviewer selection
    pub shuffle_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let event_workers = parse_or(&get, "EVENT_WORKERS", DEFAULT_EVENT_WORKERS)?;
        if event_workers == 0 {
            return Err(ConfigError::Invalid {
                key: "EVENT_WORKERS",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            database_url: get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            http_addr: parse(
                "HTTP_ADDR",
                get("HTTP_ADDR").unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string()),
            )?,
            event_workers,
            event_task_timeout: Duration::from_millis(parse_or(
                &get,
                "EVENT_TASK_TIMEOUT_MS",
                DEFAULT_EVENT_TASK_TIMEOUT_MS,
            )?),
            reviewers_per_pr: parse_or(&get, "REVIEWERS_PER_PR", DEFAULT_REVIEWERS_PER_PR)?,
            shuffle_seed: get("SHUFFLE_SEED")
                .map(|raw| parse("SHUFFLE_SEED", raw))
                .transpose()?,
        })
    }

    pub fn worker_pool(&self) -> WorkerPoolConfig {
        WorkerPoolConfig {
            workers: self.event_workers,
            task_timeout: self.event_task_timeout,
        }
    }
}

fn parse<T: FromStr>(key: &'static str, raw: String) -> Result<T, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value: raw })
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    get(key).map_or(Ok(default), |raw| parse(key, raw))
}
