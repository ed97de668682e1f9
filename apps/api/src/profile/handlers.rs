use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::{AppError, AppJson};
use crate::mbti::normalize_type_code;
use crate::models::profile::ProfileRow;
use crate::profile::completion::ProfileStage;
use crate::profile::repository::{get_profile, mark_stages, upsert_profile, ProfilePatch};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub fields: ProfileFields,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileFields {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub years_of_experience: Option<f32>,
    pub mbti_type: Option<String>,
}

impl ProfileFields {
    /// Trims text fields, drops blanks, and validates the rest.
    fn into_patch(self) -> Result<ProfilePatch, AppError> {
        let clean = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let email = clean(self.email);
        if let Some(email) = &email {
            if !email.contains('@') {
                return Err(AppError::validation(format!("'{email}' is not an email address")));
            }
        }

        if let Some(years) = self.years_of_experience {
            if !(0.0..=80.0).contains(&years) {
                return Err(AppError::validation(
                    "years_of_experience must be between 0 and 80",
                ));
            }
        }

        let mbti_type = match clean(self.mbti_type) {
            Some(raw) => Some(normalize_type_code(&raw).ok_or_else(|| {
                AppError::validation(format!("'{raw}' is not a valid MBTI type"))
            })?),
            None => None,
        };

        Ok(ProfilePatch {
            full_name: clean(self.full_name),
            email,
            phone: clean(self.phone),
            location: clean(self.location),
            years_of_experience: self.years_of_experience,
            mbti_type,
        })
    }
}

/// Stages a patch completes on its own.
fn stages_for(patch: &ProfilePatch) -> Vec<ProfileStage> {
    let mut stages = Vec::new();
    if patch.email.is_some() || patch.phone.is_some() {
        stages.push(ProfileStage::Contact);
    }
    if patch.mbti_type.is_some() {
        stages.push(ProfileStage::MbtiCompleted);
    }
    stages
}

/// POST /api/v1/profiles
pub async fn handle_register(
    State(state): State<AppState>,
    AppJson(request): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ProfileRow>), AppError> {
    let patch = request.fields.into_patch()?;
    upsert_profile(&state.db, request.user_id, &patch).await?;

    let mut stages = vec![ProfileStage::Registered];
    stages.extend(stages_for(&patch));
    let profile = mark_stages(&state.db, request.user_id, &stages).await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// GET /api/v1/profiles/:user_id
pub async fn handle_get(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileRow>, AppError> {
    let profile = get_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))?;
    Ok(Json(profile))
}

/// PATCH /api/v1/profiles/:user_id
pub async fn handle_update(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    AppJson(fields): AppJson<ProfileFields>,
) -> Result<Json<ProfileRow>, AppError> {
    if get_profile(&state.db, user_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Profile {user_id} not found")));
    }

    let patch = fields.into_patch()?;
    let profile = upsert_profile(&state.db, user_id, &patch).await?;

    let stages = stages_for(&patch);
    if stages.is_empty() {
        return Ok(Json(profile));
    }
    Ok(Json(mark_stages(&state.db, user_id, &stages).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_trims_and_drops_blanks() {
        let patch = ProfileFields {
            full_name: Some("  Ana Putri ".to_string()),
            location: Some("   ".to_string()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.full_name.as_deref(), Some("Ana Putri"));
        assert!(patch.location.is_none());
    }

    #[test]
    fn test_patch_normalizes_mbti() {
        let patch = ProfileFields {
            mbti_type: Some("entp".to_string()),
            ..Default::default()
        }
        .into_patch()
        .unwrap();
        assert_eq!(patch.mbti_type.as_deref(), Some("ENTP"));
    }

    #[test]
    fn test_patch_rejects_invalid_values() {
        let bad_mbti = ProfileFields {
            mbti_type: Some("ABCD".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_mbti.into_patch(), Err(AppError::Validation(_))));

        let bad_email = ProfileFields {
            email: Some("not-an-email".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad_email.into_patch(), Err(AppError::Validation(_))));

        let bad_years = ProfileFields {
            years_of_experience: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(bad_years.into_patch(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_stages_for_contact_and_mbti() {
        let patch = ProfilePatch {
            phone: Some("+62 811".to_string()),
            mbti_type: Some("INTJ".to_string()),
            ..Default::default()
        };
        assert_eq!(
            stages_for(&patch),
            vec![ProfileStage::Contact, ProfileStage::MbtiCompleted]
        );
        assert!(stages_for(&ProfilePatch::default()).is_empty());
    }
}
