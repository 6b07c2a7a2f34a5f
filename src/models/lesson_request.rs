use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LessonRequestStatus {
    Pending,
    Accepted,
    Declined,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LessonRequest {
    pub id: i64,
    pub studio_id: i64,
    pub student_id: i64,
    pub instructor_id: i64,
    pub requested_start: DateTime<Utc>,
    pub requested_end: DateTime<Utc>,
    pub message: Option<String>,
    pub status: LessonRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateLessonRequestRequest {
    pub instructor_id: i64,
    pub requested_start: DateTime<Utc>,
    pub requested_end: DateTime<Utc>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LessonRequestQuery {
    pub status: Option<LessonRequestStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
