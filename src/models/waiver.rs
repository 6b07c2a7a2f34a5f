use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WaiverTemplate {
    pub id: i64,
    pub studio_id: i64,
    pub title: String,
    pub body: String,
    pub version: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Waiver {
    pub id: i64,
    pub template_id: i64,
    pub student_id: i64,
    pub signature_name: String,
    pub signed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateWaiverTemplateRequest {
    #[schema(example = "Liability Release")]
    pub title: String,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateWaiverTemplateRequest {
    pub title: Option<String>,
    /// a body change bumps the template version
    pub body: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignWaiverRequest {
    pub template_id: i64,
    #[schema(example = "Maya Ortiz")]
    pub signature_name: String,
}
