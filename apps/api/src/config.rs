use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::polling::RetryPolicy;

/// Which hosted LLM answers the prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Gemini,
}

impl LlmProvider {
    fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "gemini" => Ok(LlmProvider::Gemini),
            other => bail!("LLM_PROVIDER must be 'openai' or 'gemini', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing. LLM keys are optional:
/// without one the LLM-backed routes answer "not configured".
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    pub s3_region: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    /// Base URL under which stored objects are publicly readable.
    pub storage_public_url: String,
    pub llm_provider: LlmProvider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub job_board_url: String,
    pub course_feed_url: Option<String>,
    pub poll_max_attempts: u32,
    pub poll_interval_ms: u64,
    /// When set, poll delays double from `poll_interval_ms` up to this cap.
    pub poll_max_interval_ms: Option<u64>,
    pub cache_ttl_secs: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("Required environment variable '{key}' is not set"))
        };
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let or_default = |key: &str, default: &str| optional(key).unwrap_or_else(|| default.to_string());

        let s3_bucket = require("S3_BUCKET")?;
        let s3_endpoint = require("S3_ENDPOINT")?;
        let storage_public_url = optional("STORAGE_PUBLIC_URL").unwrap_or_else(|| {
            format!("{}/{}", s3_endpoint.trim_end_matches('/'), s3_bucket)
        });

        Ok(Config {
            database_url: require("DATABASE_URL")?,
            s3_region: or_default("S3_REGION", "us-east-1"),
            aws_access_key_id: require("AWS_ACCESS_KEY_ID")?,
            aws_secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
            storage_public_url: storage_public_url.trim_end_matches('/').to_string(),
            s3_bucket,
            s3_endpoint,
            llm_provider: LlmProvider::parse(&or_default("LLM_PROVIDER", "openai"))?,
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_model: or_default("OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: or_default("OPENAI_BASE_URL", "https://api.openai.com/v1"),
            gemini_api_key: optional("GEMINI_API_KEY"),
            gemini_model: or_default("GEMINI_MODEL", "gemini-1.5-flash"),
            job_board_url: or_default("JOB_BOARD_URL", "https://remotive.com/api/remote-jobs"),
            course_feed_url: optional("COURSE_FEED_URL"),
            poll_max_attempts: or_default("POLL_MAX_ATTEMPTS", "10")
                .parse::<u32>()
                .context("POLL_MAX_ATTEMPTS must be a positive integer")?,
            poll_interval_ms: or_default("POLL_INTERVAL_MS", "2000")
                .parse::<u64>()
                .context("POLL_INTERVAL_MS must be a number of milliseconds")?,
            poll_max_interval_ms: optional("POLL_MAX_INTERVAL_MS")
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("POLL_MAX_INTERVAL_MS must be a number of milliseconds")?,
            cache_ttl_secs: or_default("CACHE_TTL_SECS", "3600")
                .parse::<u64>()
                .context("CACHE_TTL_SECS must be a number of seconds")?,
            port: or_default("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: or_default("RUST_LOG", "info"),
        })
    }

    /// API key for the selected provider, if one is configured.
    pub fn llm_api_key(&self) -> Option<&str> {
        match self.llm_provider {
            LlmProvider::OpenAi => self.openai_api_key.as_deref(),
            LlmProvider::Gemini => self.gemini_api_key.as_deref(),
        }
    }

    /// Retry schedule for waiting on stored analyses.
    pub fn poll_policy(&self) -> RetryPolicy {
        let interval = Duration::from_millis(self.poll_interval_ms);
        match self.poll_max_interval_ms {
            Some(max) => RetryPolicy::exponential(
                self.poll_max_attempts,
                interval,
                Duration::from_millis(max).max(interval),
            ),
            None => RetryPolicy::fixed(self.poll_max_attempts, interval),
        }
    }
}
