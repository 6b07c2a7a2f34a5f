use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Studio {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub address: Option<String>,
    pub place_id: Option<String>,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStudioRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    /// provider id from address autocomplete
    pub place_id: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InquiryStatus {
    New,
    Replied,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudioInquiry {
    pub id: i64,
    pub studio_id: i64,
    pub thread_id: String,
    pub subject: String,
    pub sender_name: Option<String>,
    pub sender_email: String,
    pub snippet: Option<String>,
    pub status: InquiryStatus,
    pub received_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InquiryQuery {
    pub status: Option<InquiryStatus>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReplyInquiryRequest {
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddressAutocompleteQuery {
    #[schema(example = "312 W 36th St")]
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InquirySyncResponse {
    pub fetched: usize,
    pub inserted: usize,
}
