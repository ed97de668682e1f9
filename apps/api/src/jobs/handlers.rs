use axum::{
    extract::State,
    Json,
};

use crate::errors::{AppError, AppQuery};
use crate::jobs::board::JobQuery;
use crate::jobs::models::JobPosting;
use crate::state::AppState;

/// GET /api/v1/jobs
/// Proxies the job board; results are cached per normalized query.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<JobQuery>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    let query = query.normalized();
    let board = state.job_board.clone();
    let jobs = state
        .job_cache
        .get_or_try_insert_with(query.clone(), || async move { board.search(&query).await })
        .await?;
    Ok(Json(jobs))
}
