use super::{student_for_profile, studio_of};
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::external::StripeService;
use crate::external::stripe::CheckoutSession;
use crate::models::{
    CheckoutSessionResponse, CreateLessonPackRequest, DirectPurchaseRequest, LessonPack,
    LessonPackHistoryResponse, LessonPackPurchase, LessonPackUsage, Profile,
    PurchaseHistoryEntry, SpendLessonRequest, SpendLessonResponse, UpdateLessonPackRequest,
};
use uuid::Uuid;

const PACK_COLUMNS: &str = "id, studio_id, name, lesson_count, price, active, created_at";

const PURCHASE_COLUMNS: &str = "id, pack_id, student_id, lesson_count, price, \
     remaining_lessons, stripe_checkout_session_id, created_at, updated_at";

const USAGE_COLUMNS: &str =
    "id, purchase_id, student_id, lesson_request_id, lessons_used, note, created_at";

#[derive(Clone)]
pub struct LessonPackService {
    pool: DbPool,
    stripe_service: StripeService,
}

impl LessonPackService {
    pub fn new(pool: DbPool, stripe_service: StripeService) -> Self {
        Self {
            pool,
            stripe_service,
        }
    }

    pub async fn list_packs(&self, profile: &Profile) -> AppResult<Vec<LessonPack>> {
        let studio_id = match profile.studio_id {
            Some(id) => id,
            None => student_for_profile(&self.pool, profile.id).await?.studio_id,
        };

        let packs = sqlx::query_as::<_, LessonPack>(&format!(
            "SELECT {PACK_COLUMNS} FROM lesson_packs \
             WHERE studio_id = $1 AND active = TRUE ORDER BY lesson_count"
        ))
        .bind(studio_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(packs)
    }

    pub async fn create_pack(
        &self,
        profile: &Profile,
        request: CreateLessonPackRequest,
    ) -> AppResult<LessonPack> {
        let studio_id = studio_of(profile)?;

        if request.lesson_count <= 0 {
            return Err(AppError::ValidationError(
                "lesson_count must be positive".to_string(),
            ));
        }
        if request.price < 0 {
            return Err(AppError::ValidationError(
                "price must not be negative".to_string(),
            ));
        }

        let pack = sqlx::query_as::<_, LessonPack>(&format!(
            "INSERT INTO lesson_packs (studio_id, name, lesson_count, price) \
             VALUES ($1, $2, $3, $4) RETURNING {PACK_COLUMNS}"
        ))
        .bind(studio_id)
        .bind(request.name.trim())
        .bind(request.lesson_count)
        .bind(request.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(pack)
    }

    pub async fn update_pack(
        &self,
        profile: &Profile,
        pack_id: i64,
        request: UpdateLessonPackRequest,
    ) -> AppResult<LessonPack> {
        let studio_id = studio_of(profile)?;

        if let Some(price) = request.price
            && price < 0
        {
            return Err(AppError::ValidationError(
                "price must not be negative".to_string(),
            ));
        }

        sqlx::query_as::<_, LessonPack>(&format!(
            "UPDATE lesson_packs SET \
             name = COALESCE($3, name), \
             price = COALESCE($4, price), \
             active = COALESCE($5, active) \
             WHERE id = $1 AND studio_id = $2 RETURNING {PACK_COLUMNS}"
        ))
        .bind(pack_id)
        .bind(studio_id)
        .bind(request.name)
        .bind(request.price)
        .bind(request.active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson pack not found".to_string()))
    }

    /// Dancer buys a pack through hosted checkout. The purchase row is
    /// created by the completion webhook, not here.
    pub async fn create_checkout(
        &self,
        profile: &Profile,
        pack_id: i64,
    ) -> AppResult<CheckoutSessionResponse> {
        let student = student_for_profile(&self.pool, profile.id).await?;

        let pack = sqlx::query_as::<_, LessonPack>(&format!(
            "SELECT {PACK_COLUMNS} FROM lesson_packs \
             WHERE id = $1 AND studio_id = $2 AND active = TRUE"
        ))
        .bind(pack_id)
        .bind(student.studio_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson pack not found".to_string()))?;

        let reference = Uuid::new_v4().to_string();
        let metadata = [
            ("category", "lesson_pack".to_string()),
            ("pack_id", pack.id.to_string()),
            ("student_id", student.id.to_string()),
        ];

        let session = self
            .stripe_service
            .create_checkout_session(&pack.name, pack.price, &reference, &metadata)
            .await?;

        log::info!(
            "Created checkout session {} for student {} and pack {}",
            session.id,
            student.id,
            pack.id
        );

        Ok(CheckoutSessionResponse {
            checkout_url: session.url.unwrap_or_default(),
            session_id: session.id,
        })
    }

    /// Instructor/admin records an offline sale; the balance starts at the
    /// pack's lesson count.
    pub async fn direct_purchase(
        &self,
        profile: &Profile,
        request: DirectPurchaseRequest,
    ) -> AppResult<LessonPackPurchase> {
        let studio_id = studio_of(profile)?;

        let pack = sqlx::query_as::<_, LessonPack>(&format!(
            "SELECT {PACK_COLUMNS} FROM lesson_packs WHERE id = $1 AND studio_id = $2"
        ))
        .bind(request.pack_id)
        .bind(studio_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson pack not found".to_string()))?;

        let student_exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM students WHERE id = $1 AND studio_id = $2")
                .bind(request.student_id)
                .bind(studio_id)
                .fetch_optional(&self.pool)
                .await?;
        if student_exists.is_none() {
            return Err(AppError::NotFound("Student not found".to_string()));
        }

        let purchase = sqlx::query_as::<_, LessonPackPurchase>(&format!(
            "INSERT INTO lesson_pack_purchases \
             (pack_id, student_id, lesson_count, price, remaining_lessons) \
             VALUES ($1, $2, $3, $4, $3) RETURNING {PURCHASE_COLUMNS}"
        ))
        .bind(pack.id)
        .bind(request.student_id)
        .bind(pack.lesson_count)
        .bind(pack.price)
        .fetch_one(&self.pool)
        .await?;

        log::info!(
            "Recorded direct purchase {} of pack {} for student {}",
            purchase.id,
            pack.id,
            request.student_id
        );

        Ok(purchase)
    }

    /// Consumes one lesson from a purchase. The decrement and the usage
    /// insert commit together; the `remaining_lessons > 0` guard on the
    /// update is what keeps concurrent spenders from driving the balance
    /// negative.
    pub async fn spend_lesson(
        &self,
        profile: &Profile,
        purchase_id: i64,
        request: SpendLessonRequest,
    ) -> AppResult<SpendLessonResponse> {
        let student = student_for_profile(&self.pool, profile.id).await?;

        let mut tx = self.pool.begin().await?;

        let purchase = sqlx::query_as::<_, LessonPackPurchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM lesson_pack_purchases WHERE id = $1"
        ))
        .bind(purchase_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase not found".to_string()))?;

        if purchase.student_id != student.id {
            return Err(AppError::Forbidden);
        }

        if let Some(request_id) = request.lesson_request_id {
            let owned: Option<i64> = sqlx::query_scalar(
                "SELECT id FROM lesson_requests WHERE id = $1 AND student_id = $2",
            )
            .bind(request_id)
            .bind(student.id)
            .fetch_optional(&mut *tx)
            .await?;
            if owned.is_none() {
                return Err(AppError::NotFound("Lesson request not found".to_string()));
            }
        }

        let updated = sqlx::query(
            "UPDATE lesson_pack_purchases \
             SET remaining_lessons = remaining_lessons - 1, updated_at = now() \
             WHERE id = $1 AND remaining_lessons > 0",
        )
        .bind(purchase_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::ValidationError(
                "No lessons remaining on this pack".to_string(),
            ));
        }

        let usage = sqlx::query_as::<_, LessonPackUsage>(&format!(
            "INSERT INTO lesson_pack_usage \
             (purchase_id, student_id, lesson_request_id, lessons_used, note) \
             VALUES ($1, $2, $3, 1, $4) RETURNING {USAGE_COLUMNS}"
        ))
        .bind(purchase_id)
        .bind(student.id)
        .bind(request.lesson_request_id)
        .bind(&request.note)
        .fetch_one(&mut *tx)
        .await?;

        let remaining: i64 =
            sqlx::query_scalar("SELECT remaining_lessons FROM lesson_pack_purchases WHERE id = $1")
                .bind(purchase_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;

        log::info!(
            "Student {} spent a lesson from purchase {purchase_id}, {remaining} remaining",
            student.id
        );

        Ok(SpendLessonResponse {
            usage,
            remaining_lessons: remaining,
        })
    }

    pub async fn history(&self, profile: &Profile) -> AppResult<LessonPackHistoryResponse> {
        let student = student_for_profile(&self.pool, profile.id).await?;
        self.history_for_student_id(student.id).await
    }

    pub async fn history_for_student(
        &self,
        profile: &Profile,
        student_id: i64,
    ) -> AppResult<LessonPackHistoryResponse> {
        let studio_id = studio_of(profile)?;

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM students WHERE id = $1 AND studio_id = $2")
                .bind(student_id)
                .bind(studio_id)
                .fetch_optional(&self.pool)
                .await?;
        if exists.is_none() {
            return Err(AppError::NotFound("Student not found".to_string()));
        }

        self.history_for_student_id(student_id).await
    }

    async fn history_for_student_id(&self, student_id: i64) -> AppResult<LessonPackHistoryResponse> {
        let purchases = sqlx::query_as::<_, LessonPackPurchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM lesson_pack_purchases \
             WHERE student_id = $1 ORDER BY created_at DESC"
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        let purchase_ids: Vec<i64> = purchases.iter().map(|p| p.id).collect();
        let usage_rows: Vec<LessonPackUsage> = if purchase_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, LessonPackUsage>(&format!(
                "SELECT {USAGE_COLUMNS} FROM lesson_pack_usage \
                 WHERE purchase_id = ANY($1) ORDER BY created_at"
            ))
            .bind(&purchase_ids)
            .fetch_all(&self.pool)
            .await?
        };

        let mut usage_by_purchase: std::collections::HashMap<i64, Vec<LessonPackUsage>> =
            std::collections::HashMap::new();
        for usage in usage_rows {
            usage_by_purchase
                .entry(usage.purchase_id)
                .or_default()
                .push(usage);
        }

        let total_remaining = purchases.iter().map(|p| p.remaining_lessons).sum();
        let entries = purchases
            .into_iter()
            .map(|purchase| PurchaseHistoryEntry {
                usage: usage_by_purchase.remove(&purchase.id).unwrap_or_default(),
                purchase,
            })
            .collect();

        Ok(LessonPackHistoryResponse {
            purchases: entries,
            total_remaining,
        })
    }

    /// Called from the Stripe webhook when a checkout session completes.
    /// Safe to replay: the session id is unique on the purchase table.
    pub async fn handle_checkout_completed(&self, session: &CheckoutSession) -> AppResult<()> {
        if session.metadata.get("category").map(String::as_str) != Some("lesson_pack") {
            return Ok(());
        }
        if session.payment_status.as_deref() != Some("paid") {
            log::warn!(
                "Checkout session {} completed without payment ({:?})",
                session.id,
                session.payment_status
            );
            return Ok(());
        }

        let pack_id: i64 = parse_metadata_id(session, "pack_id")?;
        let student_id: i64 = parse_metadata_id(session, "student_id")?;

        let already: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM lesson_pack_purchases WHERE stripe_checkout_session_id = $1",
        )
        .bind(&session.id)
        .fetch_optional(&self.pool)
        .await?;
        if already.is_some() {
            log::info!("Checkout session {} already processed", session.id);
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        let pack = sqlx::query_as::<_, LessonPack>(&format!(
            "SELECT {PACK_COLUMNS} FROM lesson_packs WHERE id = $1"
        ))
        .bind(pack_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson pack not found".to_string()))?;

        let purchase = sqlx::query_as::<_, LessonPackPurchase>(&format!(
            "INSERT INTO lesson_pack_purchases \
             (pack_id, student_id, lesson_count, price, remaining_lessons, \
              stripe_checkout_session_id) \
             VALUES ($1, $2, $3, $4, $3, $5) RETURNING {PURCHASE_COLUMNS}"
        ))
        .bind(pack.id)
        .bind(student_id)
        .bind(pack.lesson_count)
        .bind(pack.price)
        .bind(&session.id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO payments \
             (studio_id, student_id, amount, method, description, \
              stripe_checkout_session_id, status) \
             VALUES ($1, $2, $3, 'stripe', $4, $5, 'succeeded')",
        )
        .bind(pack.studio_id)
        .bind(student_id)
        .bind(session.amount_total.unwrap_or(pack.price))
        .bind(format!("Lesson pack: {}", pack.name))
        .bind(&session.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        log::info!(
            "Created purchase {} from checkout session {} for student {student_id}",
            purchase.id,
            session.id
        );

        Ok(())
    }
}

fn parse_metadata_id(session: &CheckoutSession, key: &str) -> AppResult<i64> {
    session
        .metadata
        .get(key)
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| {
            AppError::ValidationError(format!(
                "Missing or invalid {key} in checkout session metadata"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn session(metadata: &[(&str, &str)]) -> CheckoutSession {
        CheckoutSession {
            id: "cs_test_1".to_string(),
            url: None,
            payment_status: Some("paid".to_string()),
            amount_total: Some(32500),
            metadata: metadata
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_parse_metadata_id() {
        let s = session(&[("pack_id", "7"), ("student_id", "12")]);
        assert_eq!(parse_metadata_id(&s, "pack_id").unwrap(), 7);
        assert_eq!(parse_metadata_id(&s, "student_id").unwrap(), 12);
    }

    #[test]
    fn test_parse_metadata_id_rejects_garbage() {
        let s = session(&[("pack_id", "seven")]);
        assert!(parse_metadata_id(&s, "pack_id").is_err());
        assert!(parse_metadata_id(&s, "student_id").is_err());
    }
}
