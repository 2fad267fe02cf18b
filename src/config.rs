use anyhow::{Context, Result, anyhow, bail};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::youtube::DEFAULT_API_BASE;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/trendtube-env";
pub const DEFAULT_TRENDTUBE_PORT: u16 = 8080;
pub const DEFAULT_TRENDTUBE_HOST: &str = "127.0.0.1";
pub const DEFAULT_REGION: &str = "US";
pub const DEFAULT_PAGE_SIZE: usize = 24;
pub const DEFAULT_CHANNEL_BATCH_LIMIT: usize = 50;
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 15;
/// Largest `maxResults` / id batch the Data API accepts.
pub const UPSTREAM_MAX_RESULTS: usize = 50;

/// Values read from the env-style config file or the process environment.
/// Unset keys stay `None` so sources can be layered.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub youtube_api_key: Option<String>,
    pub trendtube_host: Option<String>,
    pub trendtube_port: Option<u16>,
    pub default_region: Option<String>,
    pub www_root: Option<PathBuf>,
    pub youtube_api_base: Option<String>,
    pub page_size: Option<usize>,
    pub channel_batch_limit: Option<usize>,
    pub upstream_timeout_secs: Option<u64>,
}

/// Upstream truncation limits. Listings and searches return at most
/// `page_size` videos; avatar lookups cover at most `channel_batch_limit`
/// distinct channels and the remainder render without an avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchLimits {
    pub page_size: usize,
    pub channel_batch_limit: usize,
}

impl Default for FetchLimits {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            channel_batch_limit: DEFAULT_CHANNEL_BATCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// `None` keeps the server up but every data endpoint answers 500.
    pub youtube_api_key: Option<String>,
    pub host: String,
    pub port: u16,
    pub default_region: String,
    pub www_root: Option<PathBuf>,
    pub youtube_api_base: String,
    pub limits: FetchLimits,
    pub upstream_timeout: Duration,
}

impl EnvConfig {
    /// Applies one `KEY=value` pair. Unknown keys are ignored and empty
    /// values leave the key unset.
    fn apply(&mut self, key: &str, value: &str, source: &str) -> Result<()> {
        let value = value.trim().trim_matches('"');
        if value.is_empty() {
            return Ok(());
        }
        match key {
            "YOUTUBE_API_KEY" => self.youtube_api_key = Some(value.to_string()),
            "TRENDTUBE_HOST" => self.trendtube_host = Some(value.to_string()),
            "TRENDTUBE_PORT" => {
                let port: u16 = value
                    .parse()
                    .with_context(|| format!("Parsing TRENDTUBE_PORT from {source}"))?;
                self.trendtube_port = Some(port);
            }
            "DEFAULT_REGION" => self.default_region = Some(value.to_ascii_uppercase()),
            "WWW_ROOT" => self.www_root = Some(PathBuf::from(value)),
            "YOUTUBE_API_BASE" => self.youtube_api_base = Some(value.to_string()),
            "PAGE_SIZE" => {
                let size: usize = value
                    .parse()
                    .with_context(|| format!("Parsing PAGE_SIZE from {source}"))?;
                self.page_size = Some(size);
            }
            "CHANNEL_BATCH_LIMIT" => {
                let limit: usize = value
                    .parse()
                    .with_context(|| format!("Parsing CHANNEL_BATCH_LIMIT from {source}"))?;
                self.channel_batch_limit = Some(limit);
            }
            "UPSTREAM_TIMEOUT_SECS" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Parsing UPSTREAM_TIMEOUT_SECS from {source}"))?;
                self.upstream_timeout_secs = Some(secs);
            }
            _ => {}
        }
        Ok(())
    }

    /// Layers `overrides` on top of `self`; any key set in `overrides` wins.
    pub fn merge(self, overrides: EnvConfig) -> EnvConfig {
        EnvConfig {
            youtube_api_key: overrides.youtube_api_key.or(self.youtube_api_key),
            trendtube_host: overrides.trendtube_host.or(self.trendtube_host),
            trendtube_port: overrides.trendtube_port.or(self.trendtube_port),
            default_region: overrides.default_region.or(self.default_region),
            www_root: overrides.www_root.or(self.www_root),
            youtube_api_base: overrides.youtube_api_base.or(self.youtube_api_base),
            page_size: overrides.page_size.or(self.page_size),
            channel_batch_limit: overrides.channel_batch_limit.or(self.channel_batch_limit),
            upstream_timeout_secs: overrides.upstream_timeout_secs.or(self.upstream_timeout_secs),
        }
    }
}

pub fn read_env_config(path: &Path) -> Result<Option<EnvConfig>> {
    if !path.exists() {
        return Ok(None);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let source = path.display().to_string();
    let mut cfg = EnvConfig::default();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        if let Some((key, value_raw)) = trimmed.split_once('=') {
            cfg.apply(key.trim(), value_raw, &source)?;
        }
    }
    Ok(Some(cfg))
}

/// Builds an [`EnvConfig`] from environment-style pairs, normally
/// `std::env::vars()`.
pub fn env_config_from_vars<I>(vars: I) -> Result<EnvConfig>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut cfg = EnvConfig::default();
    for (key, value) in vars {
        cfg.apply(&key, &value, "the environment")?;
    }
    Ok(cfg)
}

/// Reads the config file (a missing file is fine) and layers the process
/// environment on top.
pub fn load_runtime_config_from(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let path = path.as_ref();
    let file = read_env_config(path)?.unwrap_or_default();
    let env = env_config_from_vars(std::env::vars())?;
    resolve_runtime_config(file.merge(env))
}

/// Fills defaults and validates limits.
pub fn resolve_runtime_config(cfg: EnvConfig) -> Result<RuntimeConfig> {
    let page_size = cfg.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    let channel_batch_limit = cfg.channel_batch_limit.unwrap_or(DEFAULT_CHANNEL_BATCH_LIMIT);
    for (key, value) in [
        ("PAGE_SIZE", page_size),
        ("CHANNEL_BATCH_LIMIT", channel_batch_limit),
    ] {
        if !(1..=UPSTREAM_MAX_RESULTS).contains(&value) {
            bail!("{key} must be between 1 and {UPSTREAM_MAX_RESULTS}, got {value}");
        }
    }

    let timeout_secs = cfg
        .upstream_timeout_secs
        .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(anyhow!("UPSTREAM_TIMEOUT_SECS must be greater than zero"));
    }

    Ok(RuntimeConfig {
        youtube_api_key: cfg.youtube_api_key,
        host: cfg
            .trendtube_host
            .unwrap_or_else(|| DEFAULT_TRENDTUBE_HOST.to_string()),
        port: cfg.trendtube_port.unwrap_or(DEFAULT_TRENDTUBE_PORT),
        default_region: cfg
            .default_region
            .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        www_root: cfg.www_root,
        youtube_api_base: cfg
            .youtube_api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        limits: FetchLimits {
            page_size,
            channel_batch_limit,
        },
        upstream_timeout: Duration::from_secs(timeout_secs),
    })
}
