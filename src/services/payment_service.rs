use super::{student_for_profile, studio_of};
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Payment, PaymentQuery, Profile, RecordPaymentRequest, Role};
use crate::utils::{PaginatedResponse, PaginationParams};

const PAYMENT_COLUMNS: &str = "id, studio_id, student_id, recorded_by, amount, method, \
     description, stripe_checkout_session_id, status, created_at";

#[derive(Clone)]
pub struct PaymentService {
    pool: DbPool,
}

impl PaymentService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Manual payment entry for cash/card sales taken at the front desk.
    pub async fn record_payment(
        &self,
        profile: &Profile,
        request: RecordPaymentRequest,
    ) -> AppResult<Payment> {
        let studio_id = studio_of(profile)?;

        if request.amount <= 0 {
            return Err(AppError::ValidationError(
                "amount must be positive".to_string(),
            ));
        }

        let student_exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM students WHERE id = $1 AND studio_id = $2")
                .bind(request.student_id)
                .bind(studio_id)
                .fetch_optional(&self.pool)
                .await?;
        if student_exists.is_none() {
            return Err(AppError::NotFound("Student not found".to_string()));
        }

        let payment = sqlx::query_as::<_, Payment>(&format!(
            "INSERT INTO payments (studio_id, student_id, recorded_by, amount, method, description) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PAYMENT_COLUMNS}"
        ))
        .bind(studio_id)
        .bind(request.student_id)
        .bind(profile.id)
        .bind(request.amount)
        .bind(request.method)
        .bind(&request.description)
        .fetch_one(&self.pool)
        .await?;

        log::info!(
            "Recorded {} payment {} for student {}",
            payment.method,
            payment.id,
            request.student_id
        );

        Ok(payment)
    }

    /// Staff see the studio ledger (optionally per student); dancers see
    /// only their own payments.
    pub async fn list_payments(
        &self,
        profile: &Profile,
        query: &PaymentQuery,
    ) -> AppResult<PaginatedResponse<Payment>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let (studio_id, student_id) = match profile.role {
            Role::Instructor | Role::Admin => (studio_of(profile)?, query.student_id),
            Role::Dancer => {
                let student = student_for_profile(&self.pool, profile.id).await?;
                (student.studio_id, Some(student.id))
            }
        };

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM payments \
             WHERE studio_id = $1 AND ($2::bigint IS NULL OR student_id = $2)",
        )
        .bind(studio_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;

        let payments = sqlx::query_as::<_, Payment>(&format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments \
             WHERE studio_id = $1 AND ($2::bigint IS NULL OR student_id = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(studio_id)
        .bind(student_id)
        .bind(params.get_limit())
        .bind(params.get_offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedResponse::new(payments, &params, total))
    }
}
