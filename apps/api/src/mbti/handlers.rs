use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppJson};
use crate::mbti::descriptions::{describe, TypeDescription};
use crate::mbti::questions::{Question, QUESTION_BANK};
use crate::mbti::scoring::{score_answers, Answer, MbtiResult};
use crate::profile::completion::ProfileStage;
use crate::profile::repository::{mark_stages, upsert_profile, ProfilePatch};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    /// When present, the resulting type is stored on this user's profile.
    pub user_id: Option<Uuid>,
    pub answers: Vec<Answer>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    #[serde(flatten)]
    pub result: MbtiResult,
    pub profile_completion: Option<i32>,
}

/// GET /api/v1/mbti/questions
pub async fn handle_questions() -> Json<&'static [Question]> {
    Json(&QUESTION_BANK[..])
}

/// POST /api/v1/mbti/score
pub async fn handle_score(
    State(state): State<AppState>,
    AppJson(request): AppJson<ScoreRequest>,
) -> Result<Json<ScoreResponse>, AppError> {
    let result = score_answers(&request.answers).map_err(|e| AppError::validation(e.to_string()))?;

    let profile_completion = match request.user_id {
        Some(user_id) => {
            upsert_profile(
                &state.db,
                user_id,
                &ProfilePatch {
                    mbti_type: Some(result.type_code.clone()),
                    ..Default::default()
                },
            )
            .await?;
            let profile = mark_stages(&state.db, user_id, &[ProfileStage::MbtiCompleted]).await?;
            info!("Stored MBTI type {} for user {user_id}", result.type_code);
            Some(profile.completion)
        }
        None => None,
    };

    Ok(Json(ScoreResponse {
        result,
        profile_completion,
    }))
}

/// GET /api/v1/mbti/types/:code
/// Unknown codes get the generic description rather than a 404.
pub async fn handle_describe(Path(code): Path<String>) -> Json<&'static TypeDescription> {
    Json(describe(&code))
}
