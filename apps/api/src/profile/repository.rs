use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::ProfileRow;
use crate::profile::completion::{advance, ProfileStage};

/// Field changes for a profile. `None` leaves the stored value untouched.
#[derive(Debug, Default, Clone)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub years_of_experience: Option<f32>,
    pub mbti_type: Option<String>,
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, AppError> {
    Ok(
        sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Creates the profile if missing, then applies every `Some` field of the patch.
pub async fn upsert_profile(
    pool: &PgPool,
    user_id: Uuid,
    patch: &ProfilePatch,
) -> Result<ProfileRow, AppError> {
    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles
            (user_id, full_name, email, phone, location, years_of_experience, mbti_type)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (user_id) DO UPDATE SET
            full_name           = COALESCE(EXCLUDED.full_name, profiles.full_name),
            email               = COALESCE(EXCLUDED.email, profiles.email),
            phone               = COALESCE(EXCLUDED.phone, profiles.phone),
            location            = COALESCE(EXCLUDED.location, profiles.location),
            years_of_experience = COALESCE(EXCLUDED.years_of_experience, profiles.years_of_experience),
            mbti_type           = COALESCE(EXCLUDED.mbti_type, profiles.mbti_type),
            updated_at          = now()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&patch.full_name)
    .bind(&patch.email)
    .bind(&patch.phone)
    .bind(&patch.location)
    .bind(patch.years_of_experience)
    .bind(&patch.mbti_type)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Records completed pipeline stages and raises completion accordingly.
/// Completion never decreases.
pub async fn mark_stages(
    pool: &PgPool,
    user_id: Uuid,
    stages: &[ProfileStage],
) -> Result<ProfileRow, AppError> {
    let mut tx = pool.begin().await?;

    let current: Option<(Vec<String>, i32)> = sqlx::query_as(
        "SELECT completed_stages, completion FROM profiles WHERE user_id = $1 FOR UPDATE",
    )
    .bind(user_id)
    .fetch_optional(&mut *tx)
    .await?;

    let (mut completed, completion) =
        current.ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))?;
    let next = advance(completion, &mut completed, stages);

    let row = sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles
        SET completed_stages = $2,
            completion       = GREATEST(completion, $3),
            updated_at       = now()
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(&completed)
    .bind(next)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Profile {user_id} completion {completion} -> {} ({:?})",
        row.completion, stages
    );
    Ok(row)
}
