//! Recommendation data sources.
//!
//! `LlmRecommender` is the live source and `DemoRecommender` serves static data.
//! `FallbackRecommender` tries the live source and substitutes the demo one on any
//! error, recording which path produced the data.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use crate::cv::analysis::CvAnalysis;
use crate::errors::AppError;
use crate::jobs::models::JobPosting;
use crate::recommend::courses::Course;
use crate::recommend::matching::JobMatch;

#[async_trait]
pub trait Recommender: Send + Sync {
    async fn match_jobs(
        &self,
        cv: &CvAnalysis,
        jobs: &[JobPosting],
    ) -> Result<Vec<JobMatch>, AppError>;

    async fn recommend_courses(
        &self,
        cv: &CvAnalysis,
        jobs: &[JobPosting],
    ) -> Result<Vec<Course>, AppError>;

    async fn summarize_skills(&self, cv: &CvAnalysis) -> Result<String, AppError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Live,
    Demo,
}

/// Data tagged with the source that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Sourced<T> {
    pub source: SourceKind,
    /// Shown to the user when demo data stands in for live results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub data: T,
}

impl<T> Sourced<T> {
    pub fn live(data: T) -> Self {
        Self {
            source: SourceKind::Live,
            notice: None,
            data,
        }
    }

    pub fn demo(data: T, notice: impl Into<String>) -> Self {
        Self {
            source: SourceKind::Demo,
            notice: Some(notice.into()),
            data,
        }
    }
}

fn demo_notice(what: &str, err: &AppError) -> String {
    warn!(error = %err, "{what} failed, using demo data");
    format!("Showing demo {what} because live results are unavailable")
}

#[derive(Clone)]
pub struct FallbackRecommender {
    live: Arc<dyn Recommender>,
    demo: Arc<dyn Recommender>,
}

impl FallbackRecommender {
    pub fn new(live: Arc<dyn Recommender>, demo: Arc<dyn Recommender>) -> Self {
        Self { live, demo }
    }

    pub async fn match_jobs(
        &self,
        cv: &CvAnalysis,
        jobs: &[JobPosting],
    ) -> Result<Sourced<Vec<JobMatch>>, AppError> {
        match self.live.match_jobs(cv, jobs).await {
            Ok(matches) => Ok(Sourced::live(matches)),
            Err(e) => Ok(Sourced::demo(
                self.demo.match_jobs(cv, jobs).await?,
                demo_notice("job matches", &e),
            )),
        }
    }

    pub async fn recommend_courses(
        &self,
        cv: &CvAnalysis,
        jobs: &[JobPosting],
    ) -> Result<Sourced<Vec<Course>>, AppError> {
        match self.live.recommend_courses(cv, jobs).await {
            Ok(courses) => Ok(Sourced::live(courses)),
            Err(e) => Ok(Sourced::demo(
                self.demo.recommend_courses(cv, jobs).await?,
                demo_notice("course suggestions", &e),
            )),
        }
    }

    pub async fn summarize_skills(&self, cv: &CvAnalysis) -> Result<Sourced<String>, AppError> {
        match self.live.summarize_skills(cv).await {
            Ok(summary) => Ok(Sourced::live(summary)),
            Err(e) => Ok(Sourced::demo(
                self.demo.summarize_skills(cv).await?,
                demo_notice("skill summary", &e),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::recommend::demo::{demo_postings, DemoRecommender};
    use crate::recommend::live::LlmRecommender;

    fn fallback(model: ScriptedModel) -> FallbackRecommender {
        FallbackRecommender::new(
            Arc::new(LlmRecommender::new(Arc::new(model))),
            Arc::new(DemoRecommender),
        )
    }

    fn cv() -> CvAnalysis {
        CvAnalysis {
            name: Some("Ana".to_string()),
            skills: vec!["SQL".to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_live_result_reported_as_live() {
        let jobs = demo_postings();
        let reply = format!(
            r#"[{{"job_title": "{}", "percent": 90, "pros": ["SQL"], "cons": []}}]"#,
            jobs[0].title
        );
        let result = fallback(ScriptedModel::replying(&reply))
            .match_jobs(&cv(), &jobs)
            .await
            .unwrap();
        assert_eq!(result.source, SourceKind::Live);
        assert!(result.notice.is_none());
        assert_eq!(result.data.len(), 1);
    }

    #[tokio::test]
    async fn test_llm_failure_falls_back_to_demo() {
        let result = fallback(ScriptedModel::failing())
            .match_jobs(&cv(), &demo_postings())
            .await
            .unwrap();
        assert_eq!(result.source, SourceKind::Demo);
        assert!(result.notice.is_some());
        assert!(!result.data.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_reply_falls_back_to_demo() {
        let result = fallback(ScriptedModel::replying("no idea, sorry"))
            .recommend_courses(&cv(), &demo_postings())
            .await
            .unwrap();
        assert_eq!(result.source, SourceKind::Demo);
    }

    #[tokio::test]
    async fn test_summary_fallback() {
        let result = fallback(ScriptedModel::failing())
            .summarize_skills(&cv())
            .await
            .unwrap();
        assert_eq!(result.source, SourceKind::Demo);
        assert!(result.data.contains("SQL"));
    }

    #[test]
    fn test_sourced_serializes_source_lowercase() {
        let json = serde_json::to_value(Sourced::demo(vec![1], "demo")).unwrap();
        assert_eq!(json["source"], "demo");
        assert_eq!(json["notice"], "demo");
        let json = serde_json::to_value(Sourced::live(1)).unwrap();
        assert_eq!(json["source"], "live");
        assert!(json.get("notice").is_none());
    }
}
