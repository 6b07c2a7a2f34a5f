use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i64,
    pub studio_id: i64,
    pub instructor_id: i64,
    pub profile_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub level: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateStudentRequest {
    #[schema(example = "Maya")]
    pub first_name: String,
    #[schema(example = "Ortiz")]
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[schema(example = "intermediate")]
    pub level: Option<String>,
    /// link to a dancer profile so the student can act on their own behalf
    pub profile_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub level: Option<String>,
    pub profile_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentQuery {
    /// substring match against first or last name
    pub search: Option<String>,
    pub level: Option<String>,
    pub include_archived: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}
