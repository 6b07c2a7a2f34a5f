use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LessonPack {
    pub id: i64,
    pub studio_id: i64,
    pub name: String,
    pub lesson_count: i64,
    /// cents
    pub price: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Purchase record. `remaining_lessons` is the only mutable field and is
/// decremented exclusively through the conditional update in the ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LessonPackPurchase {
    pub id: i64,
    pub pack_id: i64,
    pub student_id: i64,
    pub lesson_count: i64,
    pub price: i64,
    pub remaining_lessons: i64,
    pub stripe_checkout_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LessonPackUsage {
    pub id: i64,
    pub purchase_id: i64,
    pub student_id: i64,
    pub lesson_request_id: Option<i64>,
    pub lessons_used: i64,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateLessonPackRequest {
    #[schema(example = "5-Lesson Pack")]
    pub name: String,
    #[schema(example = 5)]
    pub lesson_count: i64,
    /// cents
    #[schema(example = 32500)]
    pub price: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateLessonPackRequest {
    pub name: Option<String>,
    pub price: Option<i64>,
    pub active: Option<bool>,
}

/// Instructor/admin records an offline sale directly.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DirectPurchaseRequest {
    pub pack_id: i64,
    pub student_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpendLessonRequest {
    pub lesson_request_id: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpendLessonResponse {
    pub usage: LessonPackUsage,
    pub remaining_lessons: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseHistoryEntry {
    pub purchase: LessonPackPurchase,
    pub usage: Vec<LessonPackUsage>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LessonPackHistoryResponse {
    pub purchases: Vec<PurchaseHistoryEntry>,
    /// sum of remaining_lessons over all purchases
    pub total_remaining: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    pub checkout_url: String,
}
