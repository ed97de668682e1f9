use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::cv::analysis::CvAnalysis;
use crate::errors::AppError;
use crate::jobs::models::JobPosting;
use crate::llm_client::{strip_json_fences, ChatModel, ChatRequest};
use crate::recommend::courses::{parse_course_response, skill_gap, Course};
use crate::recommend::matching::{parse_match_response, JobMatch, MAX_MATCH_BATCH};
use crate::recommend::prompts::{
    build_course_prompt, build_job_match_prompt, build_skill_summary_prompt, course_system,
    job_match_system, SKILL_SUMMARY_SYSTEM,
};
use crate::recommend::source::Recommender;

/// Recommendations produced by the configured chat model.
#[derive(Clone)]
pub struct LlmRecommender {
    llm: Arc<dyn ChatModel>,
}

impl LlmRecommender {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Recommender for LlmRecommender {
    async fn match_jobs(
        &self,
        cv: &CvAnalysis,
        jobs: &[JobPosting],
    ) -> Result<Vec<JobMatch>, AppError> {
        if jobs.is_empty() {
            return Err(AppError::validation("At least one job posting is required"));
        }
        let batch = &jobs[..jobs.len().min(MAX_MATCH_BATCH)];

        let system = job_match_system();
        let prompt = build_job_match_prompt(cv, batch);
        let reply = self.llm.complete(ChatRequest::new(&system, &prompt)).await?;

        let matches = parse_match_response(&reply, batch)?;
        info!(
            sent = batch.len(),
            matched = matches.len(),
            "Job matching completed"
        );
        Ok(matches)
    }

    async fn recommend_courses(
        &self,
        cv: &CvAnalysis,
        jobs: &[JobPosting],
    ) -> Result<Vec<Course>, AppError> {
        let gap = skill_gap(cv, jobs);
        let system = course_system();
        let prompt = build_course_prompt(cv, &gap);
        let reply = self
            .llm
            .complete(ChatRequest::new(&system, &prompt).with_temperature(0.4))
            .await?;

        let courses = parse_course_response(&reply)?;
        info!(gap = gap.len(), courses = courses.len(), "Course suggestions generated");
        Ok(courses)
    }

    async fn summarize_skills(&self, cv: &CvAnalysis) -> Result<String, AppError> {
        let prompt = build_skill_summary_prompt(cv);
        let reply = self
            .llm
            .complete(ChatRequest::new(SKILL_SUMMARY_SYSTEM, &prompt).with_temperature(0.5))
            .await?;

        let summary = strip_json_fences(&reply).trim().to_string();
        if summary.is_empty() {
            return Err(AppError::Llm {
                message: "LLM returned an empty summary".to_string(),
                upstream_body: Some(reply),
            });
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;

    fn jobs(n: usize) -> Vec<JobPosting> {
        (0..n)
            .map(|i| JobPosting {
                id: i.to_string(),
                title: format!("Role {i}"),
                tags: vec!["Docker".to_string()],
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_only_first_ten_postings_are_sent_and_matched() {
        let all: Vec<String> = (0..12)
            .map(|i| format!(r#"{{"job_title": "Role {i}", "percent": {}}}"#, 50 + i))
            .collect();
        let model = Arc::new(ScriptedModel::replying(&format!("[{}]", all.join(","))));
        let recommender = LlmRecommender::new(model.clone());

        let matches = recommender
            .match_jobs(&CvAnalysis::default(), &jobs(12))
            .await
            .unwrap();

        assert_eq!(matches.len(), MAX_MATCH_BATCH);
        assert_eq!(matches[0].job.title, "Role 9");
        assert!(matches.windows(2).all(|w| w[0].percent >= w[1].percent));
        let prompt = model.last_prompt().unwrap();
        assert!(prompt.contains("Role 9"));
        assert!(!prompt.contains("Role 10"));
    }

    #[tokio::test]
    async fn test_empty_job_list_is_validation_error() {
        let model = Arc::new(ScriptedModel::replying("[]"));
        let err = LlmRecommender::new(model.clone())
            .match_jobs(&CvAnalysis::default(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_json_match_reply_is_error_not_empty_success() {
        let model = Arc::new(ScriptedModel::replying("I am unable to help."));
        let err = LlmRecommender::new(model)
            .match_jobs(&CvAnalysis::default(), &jobs(3))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_course_prompt_carries_skill_gap() {
        let model = Arc::new(ScriptedModel::replying(
            r#"[{"title": "Docker Mastery", "provider": "Udemy"}]"#,
        ));
        let courses = LlmRecommender::new(model.clone())
            .recommend_courses(&CvAnalysis::default(), &jobs(2))
            .await
            .unwrap();
        assert_eq!(courses[0].title, "Docker Mastery");
        assert!(model.last_prompt().unwrap().ends_with("Docker"));
    }

    #[tokio::test]
    async fn test_summary_is_trimmed() {
        let model = Arc::new(ScriptedModel::replying("  You are a strong analyst.\n"));
        let summary = LlmRecommender::new(model)
            .summarize_skills(&CvAnalysis::default())
            .await
            .unwrap();
        assert_eq!(summary, "You are a strong analyst.");
    }
}
