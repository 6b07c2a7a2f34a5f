use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::middlewares::AuthIdentity;
use crate::models::{Profile, ProfileResponse, RegisterProfileRequest, Role, UpdateProfileRequest};
use crate::utils::is_valid_email;

const PROFILE_COLUMNS: &str =
    "id, auth_subject, role, studio_id, display_name, email, phone, created_at, updated_at";

#[derive(Clone)]
pub struct AuthService {
    pool: DbPool,
}

impl AuthService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Creates the profile row for a verified identity. The hosted auth
    /// service owns credentials; this only records who the account is here.
    pub async fn register_profile(
        &self,
        identity: &AuthIdentity,
        request: RegisterProfileRequest,
    ) -> AppResult<ProfileResponse> {
        if request.display_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Display name is required".to_string(),
            ));
        }
        if !is_valid_email(&request.email) {
            return Err(AppError::ValidationError(
                "A valid email is required".to_string(),
            ));
        }

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT id FROM profiles WHERE auth_subject = $1")
                .bind(&identity.subject)
                .fetch_optional(&self.pool)
                .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError(
                "A profile already exists for this account".to_string(),
            ));
        }

        // staff joins an existing studio by slug; dancers start unattached
        let studio_id = match request.role {
            Role::Instructor | Role::Admin => {
                let slug = request.studio_slug.as_deref().ok_or_else(|| {
                    AppError::ValidationError(
                        "studio_slug is required for instructor and admin profiles".to_string(),
                    )
                })?;
                let id: Option<i64> = sqlx::query_scalar("SELECT id FROM studios WHERE slug = $1")
                    .bind(slug)
                    .fetch_optional(&self.pool)
                    .await?;
                Some(id.ok_or_else(|| AppError::NotFound("Studio not found".to_string()))?)
            }
            Role::Dancer => None,
        };

        let profile = sqlx::query_as::<_, Profile>(&format!(
            "INSERT INTO profiles (auth_subject, role, studio_id, display_name, email, phone) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(&identity.subject)
        .bind(request.role)
        .bind(studio_id)
        .bind(request.display_name.trim())
        .bind(&request.email)
        .bind(&request.phone)
        .fetch_one(&self.pool)
        .await?;

        log::info!(
            "Registered {} profile {} for subject {}",
            profile.role,
            profile.id,
            identity.subject
        );

        Ok(ProfileResponse::from(profile))
    }

    pub async fn update_profile(
        &self,
        profile_id: i64,
        request: UpdateProfileRequest,
    ) -> AppResult<ProfileResponse> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "UPDATE profiles SET display_name = COALESCE($2, display_name), \
             phone = COALESCE($3, phone), updated_at = now() \
             WHERE id = $1 RETURNING {PROFILE_COLUMNS}"
        ))
        .bind(profile_id)
        .bind(request.display_name)
        .bind(request.phone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

        Ok(ProfileResponse::from(profile))
    }
}
