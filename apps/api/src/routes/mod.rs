pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::cv::handlers as cv;
use crate::jobs::handlers as jobs;
use crate::mbti::handlers as mbti;
use crate::profile::handlers as profile;
use crate::recommend::handlers as recommend;
use crate::state::AppState;

/// Upper bound on an uploaded CV.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // CV pipeline
        .route(
            "/api/v1/cv/upload",
            post(cv::handle_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/cv/analysis", get(cv::handle_get_analysis))
        // Recommendations
        .route("/api/v1/job-match", post(recommend::handle_job_match))
        .route(
            "/api/v1/course-recommend",
            post(recommend::handle_course_recommend),
        )
        .route(
            "/api/v1/course-recommend/dynamic",
            post(recommend::handle_course_recommend_dynamic),
        )
        .route("/api/v1/skill-summary", post(recommend::handle_skill_summary))
        .route(
            "/api/v1/recommendations",
            post(recommend::handle_recommendations),
        )
        // Listings
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/courses", get(recommend::handle_list_courses))
        // Profiles
        .route("/api/v1/profiles", post(profile::handle_register))
        .route(
            "/api/v1/profiles/:user_id",
            get(profile::handle_get).patch(profile::handle_update),
        )
        // MBTI
        .route("/api/v1/mbti/questions", get(mbti::handle_questions))
        .route("/api/v1/mbti/score", post(mbti::handle_score))
        .route("/api/v1/mbti/types/:code", get(mbti::handle_describe))
        .with_state(state)
}
