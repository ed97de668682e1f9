use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::cv::retrieval::fetch_analysis;
use crate::cv::upload::{process_upload, UploadRequest};
use crate::errors::{AppError, AppQuery};
use crate::profile::completion::ProfileStage;
use crate::profile::repository::{mark_stages, upsert_profile, ProfilePatch};
use crate::state::AppState;
use crate::storage::CvPaths;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_path: String,
    pub json_file_path: String,
    pub public_url: String,
    pub profile_completion: i32,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisQuery {
    pub user_id: Uuid,
    /// The uploaded file name, extension included.
    pub file_name: String,
}

/// Collects the upload form. Unknown fields are ignored.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadRequest, AppError> {
    let mut file: Option<(String, bytes::Bytes)> = None;
    let mut user_id: Option<String> = None;
    let mut location = None;
    let mut mbti = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| AppError::validation("'file' field has no file name"))?;
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::validation(format!("Invalid file: {e}")))?;
                file = Some((file_name, data));
            }
            "user_id" | "location" | "mbti" | "mbti_type" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Invalid '{name}' field: {e}")))?;
                match name.as_str() {
                    "user_id" => user_id = Some(value),
                    "location" => location = Some(value),
                    _ => mbti = Some(value),
                }
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or_else(|| AppError::validation("'file' is required"))?;
    let user_id = user_id
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::validation("'user_id' is required"))?;
    let user_id = Uuid::parse_str(user_id)
        .map_err(|_| AppError::validation(format!("'{user_id}' is not a valid user id")))?;

    Ok(UploadRequest {
        user_id,
        file_name,
        bytes,
        location,
        mbti,
    })
}

/// POST /api/v1/cv/upload
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let request = read_upload_form(multipart).await?;
    let user_id = request.user_id;
    info!(user_id = %user_id, file = %request.file_name, "CV upload received");

    let outcome = process_upload(state.store.as_ref(), state.llm.as_ref(), request).await?;

    let analysis = &outcome.analysis;
    let mbti_type = analysis.mbti.clone();
    upsert_profile(
        &state.db,
        user_id,
        &ProfilePatch {
            location: analysis.location.clone(),
            mbti_type: mbti_type.clone(),
            years_of_experience: analysis.years_of_experience,
            ..Default::default()
        },
    )
    .await?;

    let mut stages = vec![ProfileStage::CvAnalyzed];
    if mbti_type.is_some() {
        stages.push(ProfileStage::MbtiCompleted);
    }
    let profile = mark_stages(&state.db, user_id, &stages).await?;

    Ok(Json(UploadResponse {
        success: true,
        file_path: outcome.paths.raw_key,
        json_file_path: outcome.paths.json_key,
        public_url: outcome.public_url,
        profile_completion: profile.completion,
    }))
}

/// GET /api/v1/cv/analysis
/// Waits for the derived analysis to become readable; 504 once the attempts run out.
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<AnalysisQuery>,
) -> Result<Json<Value>, AppError> {
    let paths = CvPaths::derive(params.user_id, &params.file_name).ok_or_else(|| {
        AppError::validation(format!("'{}' is not a valid file name", params.file_name))
    })?;

    let analysis = fetch_analysis(
        state.store.as_ref(),
        &paths.json_key,
        &state.poll_policy,
        &state.shutdown,
    )
    .await?;

    Ok(Json(analysis))
}
