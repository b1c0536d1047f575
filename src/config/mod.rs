mod file_config;

pub use file_config::FileConfig;

use crate::profile::FetchFailurePolicy;
use anyhow::{bail, Result};
use clap::ValueEnum;
use reqwest::Url;
use std::path::PathBuf;

/// Backend used when neither the command line nor the config file names one.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SEC: u64 = 30;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub api_base_url: Option<String>,
    pub request_timeout_sec: u64,
    pub cookie_file: Option<PathBuf>,
    pub secure_cookies: bool,
    pub fetch_failure_policy: FetchFailurePolicy,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            request_timeout_sec: DEFAULT_REQUEST_TIMEOUT_SEC,
            cookie_file: None,
            secure_cookies: false,
            fetch_failure_policy: FetchFailurePolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_sec: u64,
    /// Where session cookies are persisted. `None` keeps them in memory.
    pub cookie_file: Option<PathBuf>,
    /// Marks session cookies `Secure`; set it in production.
    pub secure_cookies: bool,
    pub fetch_failure_policy: FetchFailurePolicy,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let api_base_url = file
            .api_base_url
            .or_else(|| cli.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        validate_base_url(&api_base_url)?;

        let request_timeout_sec = file.request_timeout_sec.unwrap_or(cli.request_timeout_sec);
        if request_timeout_sec == 0 {
            bail!("request_timeout_sec must be greater than 0");
        }

        let cookie_file = file
            .cookie_file
            .map(PathBuf::from)
            .or_else(|| cli.cookie_file.clone());

        let secure_cookies = file.secure_cookies.unwrap_or(cli.secure_cookies);

        let fetch_failure_policy = match file.fetch_failure_policy {
            Some(s) => match parse_fetch_failure_policy(&s) {
                Some(policy) => policy,
                None => bail!("Unknown fetch_failure_policy: {:?}", s),
            },
            None => cli.fetch_failure_policy,
        };

        Ok(Self {
            api_base_url,
            request_timeout_sec,
            cookie_file,
            secure_cookies,
            fetch_failure_policy,
        })
    }
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let url = match Url::parse(base_url) {
        Ok(url) => url,
        Err(err) => bail!("Invalid api_base_url {:?}: {}", base_url, err),
    };
    if url.scheme() != "http" && url.scheme() != "https" {
        bail!("api_base_url must be http or https: {:?}", base_url);
    }
    Ok(())
}

fn parse_fetch_failure_policy(s: &str) -> Option<FetchFailurePolicy> {
    FetchFailurePolicy::from_str(s, true).ok()
}
