//! Job board client.
//!
//! The board is an opaque HTTP service answering `GET {base}?search=&limit=` with
//! `{"jobs": [...]}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::jobs::models::JobPosting;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

#[derive(Debug, Error)]
pub enum JobBoardError {
    #[error("job board request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("job board returned status {status}")]
    Status { status: u16, body: String },

    #[error("job board response could not be parsed: {0}")]
    Parse(String),
}

/// Search parameters; also the cache key for listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
pub struct JobQuery {
    pub search: Option<String>,
    pub limit: Option<u32>,
}

impl JobQuery {
    /// Trims the search term and clamps the limit, so equivalent queries share a
    /// cache entry.
    pub fn normalized(self) -> Self {
        Self {
            search: self
                .search
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty()),
            limit: Some(self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)),
        }
    }

    fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT) as usize
    }
}

#[async_trait]
pub trait JobBoard: Send + Sync {
    async fn search(&self, query: &JobQuery) -> Result<Vec<JobPosting>, JobBoardError>;
}

#[derive(Debug, Deserialize)]
struct JobsEnvelope {
    #[serde(default)]
    jobs: Vec<JobPosting>,
}

/// Parses a board response body, keeping at most `limit` postings with a title.
pub fn parse_jobs(body: &str, limit: usize) -> Result<Vec<JobPosting>, JobBoardError> {
    let envelope: JobsEnvelope =
        serde_json::from_str(body).map_err(|e| JobBoardError::Parse(e.to_string()))?;
    Ok(envelope
        .jobs
        .into_iter()
        .filter(|job| !job.title.trim().is_empty())
        .take(limit)
        .collect())
}

#[derive(Clone)]
pub struct HttpJobBoard {
    client: Client,
    base_url: String,
}

impl HttpJobBoard {
    pub fn new(base_url: &str) -> Result<Self, JobBoardError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.to_string(),
        })
    }
}

#[async_trait]
impl JobBoard for HttpJobBoard {
    async fn search(&self, query: &JobQuery) -> Result<Vec<JobPosting>, JobBoardError> {
        let limit = query.effective_limit();
        let mut request = self
            .client
            .get(&self.base_url)
            .query(&[("limit", limit.to_string())]);
        if let Some(search) = &query.search {
            request = request.query(&[("search", search)]);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Job board returned {status}");
            return Err(JobBoardError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let jobs = parse_jobs(&body, limit)?;
        info!(count = jobs.len(), search = ?query.search, "Fetched job postings");
        Ok(jobs)
    }
}
