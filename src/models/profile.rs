use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Account role stored as TEXT in the profiles table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Instructor,
    Dancer,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Instructor => write!(f, "instructor"),
            Role::Dancer => write!(f, "dancer"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profile {
    pub id: i64,
    #[serde(skip_serializing)]
    pub auth_subject: String,
    pub role: Role,
    pub studio_id: Option<i64>,
    pub display_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterProfileRequest {
    pub role: Role,
    #[schema(example = "Dana Whitfield")]
    pub display_name: String,
    #[schema(example = "dana@example.com")]
    pub email: String,
    pub phone: Option<String>,
    /// required for instructors and admins, joined by studio slug
    pub studio_slug: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub id: i64,
    pub role: Role,
    pub studio_id: Option<i64>,
    pub display_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            id: p.id,
            role: p.role,
            studio_id: p.studio_id,
            display_name: p.display_name,
            email: p.email,
            phone: p.phone,
            created_at: p.created_at,
        }
    }
}
