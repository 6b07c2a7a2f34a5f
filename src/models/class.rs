use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// How a class's total cost is computed. Stored as TEXT.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    PerPerson,
    PerClass,
    PerHour,
    Tiered,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Enrolled,
    Dropped,
    Waitlisted,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Class {
    pub id: i64,
    pub studio_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub pricing_model: Option<PricingModel>,
    // amounts in cents; only the active model's fields are expected to be set
    pub cost_per_person: Option<i64>,
    pub base_cost: Option<i64>,
    pub cost_per_hour: Option<i64>,
    pub tiered_base_students: Option<i64>,
    pub tiered_additional_cost: Option<i64>,
    pub canceled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Class {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: i64,
    pub class_id: i64,
    pub student_id: i64,
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
}

/// Enrollment row joined with the student's name for roster views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EnrollmentDetail {
    pub id: i64,
    pub class_id: i64,
    pub student_id: i64,
    pub status: EnrollmentStatus,
    pub enrolled_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateClassRequest {
    #[schema(example = "Beginner Ballet")]
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub pricing_model: Option<PricingModel>,
    pub cost_per_person: Option<i64>,
    pub base_cost: Option<i64>,
    pub cost_per_hour: Option<i64>,
    pub tiered_base_students: Option<i64>,
    pub tiered_additional_cost: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateClassRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub pricing_model: Option<PricingModel>,
    pub cost_per_person: Option<i64>,
    pub base_cost: Option<i64>,
    pub cost_per_hour: Option<i64>,
    pub tiered_base_students: Option<i64>,
    pub tiered_additional_cost: Option<i64>,
    pub canceled: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassQuery {
    /// only classes starting on or after this instant
    pub from: Option<DateTime<Utc>>,
    /// only classes starting before this instant
    pub to: Option<DateTime<Utc>>,
    pub include_canceled: Option<bool>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassResponse {
    pub id: i64,
    pub studio_id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub capacity: Option<i32>,
    pub pricing_model: Option<PricingModel>,
    pub cost_per_person: Option<i64>,
    pub base_cost: Option<i64>,
    pub cost_per_hour: Option<i64>,
    pub tiered_base_students: Option<i64>,
    pub tiered_additional_cost: Option<i64>,
    pub canceled: bool,
    pub enrolled_count: i64,
    /// computed from the pricing model and current enrollment, in cents
    pub total_cost: i64,
}

impl ClassResponse {
    pub fn from_class(class: Class, enrolled_count: i64) -> Self {
        let total_cost = crate::pricing::class_cost(&class, enrolled_count);
        Self {
            id: class.id,
            studio_id: class.studio_id,
            instructor_id: class.instructor_id,
            title: class.title,
            description: class.description,
            location: class.location,
            start_time: class.start_time,
            end_time: class.end_time,
            capacity: class.capacity,
            pricing_model: class.pricing_model,
            cost_per_person: class.cost_per_person,
            base_cost: class.base_cost,
            cost_per_hour: class.cost_per_hour,
            tiered_base_students: class.tiered_base_students,
            tiered_additional_cost: class.tiered_additional_cost,
            canceled: class.canceled,
            enrolled_count,
            total_cost,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClassCostResponse {
    pub class_id: i64,
    pub pricing_model: Option<PricingModel>,
    pub enrolled_count: i64,
    pub total_cost: i64,
}
