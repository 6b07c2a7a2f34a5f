use super::{student_for_profile, studio_of};
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateWaiverTemplateRequest, Profile, SignWaiverRequest, UpdateWaiverTemplateRequest, Waiver,
    WaiverTemplate,
};

const TEMPLATE_COLUMNS: &str = "id, studio_id, title, body, version, active, created_at";

const WAIVER_COLUMNS: &str = "id, template_id, student_id, signature_name, signed_at";

#[derive(Clone)]
pub struct WaiverService {
    pool: DbPool,
}

impl WaiverService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list_templates(&self, profile: &Profile) -> AppResult<Vec<WaiverTemplate>> {
        let studio_id = match profile.studio_id {
            Some(id) => id,
            None => student_for_profile(&self.pool, profile.id).await?.studio_id,
        };

        let templates = sqlx::query_as::<_, WaiverTemplate>(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM waiver_templates \
             WHERE studio_id = $1 AND active = TRUE ORDER BY created_at"
        ))
        .bind(studio_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }

    pub async fn create_template(
        &self,
        profile: &Profile,
        request: CreateWaiverTemplateRequest,
    ) -> AppResult<WaiverTemplate> {
        let studio_id = studio_of(profile)?;

        if request.title.trim().is_empty() || request.body.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Title and body are required".to_string(),
            ));
        }

        let template = sqlx::query_as::<_, WaiverTemplate>(&format!(
            "INSERT INTO waiver_templates (studio_id, title, body) \
             VALUES ($1, $2, $3) RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(studio_id)
        .bind(request.title.trim())
        .bind(&request.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(template)
    }

    pub async fn update_template(
        &self,
        profile: &Profile,
        template_id: i64,
        request: UpdateWaiverTemplateRequest,
    ) -> AppResult<WaiverTemplate> {
        let studio_id = studio_of(profile)?;

        // a body change bumps the version so old signatures stay tied to
        // the text that was actually signed
        let bump_version = request.body.is_some();

        sqlx::query_as::<_, WaiverTemplate>(&format!(
            "UPDATE waiver_templates SET \
             title = COALESCE($3, title), \
             body = COALESCE($4, body), \
             active = COALESCE($5, active), \
             version = version + CASE WHEN $6 THEN 1 ELSE 0 END \
             WHERE id = $1 AND studio_id = $2 RETURNING {TEMPLATE_COLUMNS}"
        ))
        .bind(template_id)
        .bind(studio_id)
        .bind(request.title)
        .bind(request.body)
        .bind(request.active)
        .bind(bump_version)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Waiver template not found".to_string()))
    }

    pub async fn sign(&self, profile: &Profile, request: SignWaiverRequest) -> AppResult<Waiver> {
        let student = student_for_profile(&self.pool, profile.id).await?;

        if request.signature_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "signature_name is required".to_string(),
            ));
        }

        let template: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM waiver_templates \
             WHERE id = $1 AND studio_id = $2 AND active = TRUE",
        )
        .bind(request.template_id)
        .bind(student.studio_id)
        .fetch_optional(&self.pool)
        .await?;
        if template.is_none() {
            return Err(AppError::NotFound("Waiver template not found".to_string()));
        }

        let already_signed: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM waivers WHERE template_id = $1 AND student_id = $2",
        )
        .bind(request.template_id)
        .bind(student.id)
        .fetch_optional(&self.pool)
        .await?;
        if already_signed.is_some() {
            return Err(AppError::ValidationError(
                "Waiver has already been signed".to_string(),
            ));
        }

        let waiver = sqlx::query_as::<_, Waiver>(&format!(
            "INSERT INTO waivers (template_id, student_id, signature_name) \
             VALUES ($1, $2, $3) RETURNING {WAIVER_COLUMNS}"
        ))
        .bind(request.template_id)
        .bind(student.id)
        .bind(request.signature_name.trim())
        .fetch_one(&self.pool)
        .await?;

        log::info!(
            "Student {} signed waiver template {}",
            student.id,
            request.template_id
        );

        Ok(waiver)
    }

    pub async fn list_signatures(
        &self,
        profile: &Profile,
        template_id: i64,
    ) -> AppResult<Vec<Waiver>> {
        let studio_id = studio_of(profile)?;

        let template: Option<i64> =
            sqlx::query_scalar("SELECT id FROM waiver_templates WHERE id = $1 AND studio_id = $2")
                .bind(template_id)
                .bind(studio_id)
                .fetch_optional(&self.pool)
                .await?;
        if template.is_none() {
            return Err(AppError::NotFound("Waiver template not found".to_string()));
        }

        let waivers = sqlx::query_as::<_, Waiver>(&format!(
            "SELECT {WAIVER_COLUMNS} FROM waivers \
             WHERE template_id = $1 ORDER BY signed_at DESC"
        ))
        .bind(template_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(waivers)
    }
}
