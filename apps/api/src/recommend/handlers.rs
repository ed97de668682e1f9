use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cv::analysis::CvAnalysis;
use crate::errors::{AppError, AppJson};
use crate::jobs::board::JobQuery;
use crate::jobs::models::JobPosting;
use crate::recommend::courses::{course_catalog, Course};
use crate::recommend::demo::demo_postings;
use crate::recommend::matching::JobMatch;
use crate::recommend::source::{SourceKind, Sourced};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MatchRequest {
    pub cv: CvAnalysis,
    #[serde(default)]
    pub jobs: Vec<JobPosting>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub cv: CvAnalysis,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationsRequest {
    pub cv: CvAnalysis,
    /// Postings to rank; fetched from the job board when absent.
    pub jobs: Option<Vec<JobPosting>>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub postings_source: SourceKind,
    pub jobs: Sourced<Vec<JobMatch>>,
    pub courses: Sourced<Vec<Course>>,
    pub summary: Sourced<String>,
}

/// POST /api/v1/job-match
pub async fn handle_job_match(
    State(state): State<AppState>,
    AppJson(request): AppJson<MatchRequest>,
) -> Result<Json<Vec<JobMatch>>, AppError> {
    let matches = state
        .recommender
        .match_jobs(&request.cv, &request.jobs)
        .await?;
    Ok(Json(matches))
}

/// POST /api/v1/course-recommend
/// Serves the static catalog whatever the request holds.
pub async fn handle_course_recommend() -> Json<Vec<Course>> {
    Json(course_catalog())
}

/// POST /api/v1/course-recommend/dynamic
pub async fn handle_course_recommend_dynamic(
    State(state): State<AppState>,
    AppJson(request): AppJson<MatchRequest>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = state
        .recommender
        .recommend_courses(&request.cv, &request.jobs)
        .await?;
    Ok(Json(courses))
}

/// POST /api/v1/skill-summary
pub async fn handle_skill_summary(
    State(state): State<AppState>,
    AppJson(request): AppJson<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let summary = state.recommender.summarize_skills(&request.cv).await?;
    Ok(Json(SummaryResponse { summary }))
}

/// POST /api/v1/recommendations
/// Never fails on upstream errors: each part falls back to demo data independently.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    AppJson(request): AppJson<RecommendationsRequest>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let (postings_source, postings) = match request.jobs {
        Some(jobs) if !jobs.is_empty() => (SourceKind::Live, jobs),
        _ => {
            let query = JobQuery::default().normalized();
            let board = state.job_board.clone();
            let fetched = state
                .job_cache
                .get_or_try_insert_with(query.clone(), || async move {
                    board.search(&query).await
                })
                .await;
            match fetched {
                Ok(jobs) if !jobs.is_empty() => (SourceKind::Live, jobs),
                Ok(_) => (SourceKind::Demo, demo_postings()),
                Err(e) => {
                    warn!(error = %e, "Job board unavailable, using demo postings");
                    (SourceKind::Demo, demo_postings())
                }
            }
        }
    };

    let jobs = state.fallback.match_jobs(&request.cv, &postings).await?;
    let courses = state
        .fallback
        .recommend_courses(&request.cv, &postings)
        .await?;
    let summary = state.fallback.summarize_skills(&request.cv).await?;

    Ok(Json(RecommendationsResponse {
        postings_source,
        jobs,
        courses,
        summary,
    }))
}

/// GET /api/v1/courses
/// Remote course feed when configured, the static catalog otherwise.
pub async fn handle_list_courses(State(state): State<AppState>) -> Json<Sourced<Vec<Course>>> {
    let Some(feed) = state.course_feed.clone() else {
        return Json(Sourced::demo(
            course_catalog(),
            "Course feed is not configured; showing the built-in catalog",
        ));
    };

    let fetched = state
        .course_cache
        .get_or_try_insert_with(feed.url().to_string(), || async move { feed.fetch().await })
        .await;

    Json(match fetched {
        Ok(courses) if !courses.is_empty() => Sourced::live(courses),
        Ok(_) => Sourced::demo(course_catalog(), "Course feed is empty"),
        Err(e) => {
            warn!(error = ?e, "Course feed unavailable, serving catalog");
            Sourced::demo(
                course_catalog(),
                "Course feed is unavailable; showing the built-in catalog",
            )
        }
    })
}
