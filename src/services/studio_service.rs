use super::studio_of;
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::external::{MailthreadService, PlacePrediction, PlacesService};
use crate::models::{
    InquiryQuery, InquirySyncResponse, Profile, ReplyInquiryRequest, Studio, StudioInquiry,
    UpdateStudioRequest,
};
use crate::utils::{PaginatedResponse, PaginationParams};
use chrono::{DateTime, Utc};

const STUDIO_COLUMNS: &str = "id, name, slug, address, place_id, timezone, created_at";

const INQUIRY_COLUMNS: &str = "id, studio_id, thread_id, subject, sender_name, sender_email, \
     snippet, status, received_at, created_at";

#[derive(Clone)]
pub struct StudioService {
    pool: DbPool,
    mailthread_service: MailthreadService,
    places_service: PlacesService,
}

impl StudioService {
    pub fn new(
        pool: DbPool,
        mailthread_service: MailthreadService,
        places_service: PlacesService,
    ) -> Self {
        Self {
            pool,
            mailthread_service,
            places_service,
        }
    }

    pub async fn get_current(&self, profile: &Profile) -> AppResult<Studio> {
        let studio_id = studio_of(profile)?;

        sqlx::query_as::<_, Studio>(&format!(
            "SELECT {STUDIO_COLUMNS} FROM studios WHERE id = $1"
        ))
        .bind(studio_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Studio not found".to_string()))
    }

    pub async fn update_current(
        &self,
        profile: &Profile,
        request: UpdateStudioRequest,
    ) -> AppResult<Studio> {
        let studio_id = studio_of(profile)?;

        sqlx::query_as::<_, Studio>(&format!(
            "UPDATE studios SET \
             name = COALESCE($2, name), \
             address = COALESCE($3, address), \
             place_id = COALESCE($4, place_id), \
             timezone = COALESCE($5, timezone) \
             WHERE id = $1 RETURNING {STUDIO_COLUMNS}"
        ))
        .bind(studio_id)
        .bind(request.name)
        .bind(request.address)
        .bind(request.place_id)
        .bind(request.timezone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Studio not found".to_string()))
    }

    pub async fn address_autocomplete(&self, input: &str) -> AppResult<Vec<PlacePrediction>> {
        if input.trim().is_empty() {
            return Err(AppError::ValidationError("query is required".to_string()));
        }
        self.places_service.autocomplete(input.trim()).await
    }

    /// Pulls new inbox threads from the email provider into the inquiries
    /// table. On-demand; there is no background poller.
    pub async fn sync_inquiries(&self, profile: &Profile) -> AppResult<InquirySyncResponse> {
        let studio_id = studio_of(profile)?;

        let last_received: Option<DateTime<Utc>> = sqlx::query_scalar(
            "SELECT MAX(received_at) FROM studio_inquiries WHERE studio_id = $1",
        )
        .bind(studio_id)
        .fetch_one(&self.pool)
        .await?;

        let threads = self.mailthread_service.list_threads(last_received).await?;
        let fetched = threads.len();
        let mut inserted = 0usize;

        for thread in threads {
            let result = sqlx::query(
                "INSERT INTO studio_inquiries \
                 (studio_id, thread_id, subject, sender_name, sender_email, snippet, received_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 ON CONFLICT (thread_id) DO NOTHING",
            )
            .bind(studio_id)
            .bind(&thread.id)
            .bind(&thread.subject)
            .bind(&thread.sender_name)
            .bind(&thread.sender_email)
            .bind(&thread.snippet)
            .bind(thread.received_at)
            .execute(&self.pool)
            .await?;
            inserted += result.rows_affected() as usize;
        }

        log::info!(
            "Inquiry sync for studio {studio_id}: fetched {fetched}, inserted {inserted}"
        );

        Ok(InquirySyncResponse { fetched, inserted })
    }

    pub async fn list_inquiries(
        &self,
        profile: &Profile,
        query: &InquiryQuery,
    ) -> AppResult<PaginatedResponse<StudioInquiry>> {
        let studio_id = studio_of(profile)?;
        let params = PaginationParams::new(query.page, query.per_page);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM studio_inquiries \
             WHERE studio_id = $1 AND ($2::text IS NULL OR status = $2)",
        )
        .bind(studio_id)
        .bind(query.status)
        .fetch_one(&self.pool)
        .await?;

        let inquiries = sqlx::query_as::<_, StudioInquiry>(&format!(
            "SELECT {INQUIRY_COLUMNS} FROM studio_inquiries \
             WHERE studio_id = $1 AND ($2::text IS NULL OR status = $2) \
             ORDER BY received_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(studio_id)
        .bind(query.status)
        .bind(params.get_limit())
        .bind(params.get_offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedResponse::new(inquiries, &params, total))
    }

    /// Sends the reply on the provider thread, then marks the inquiry.
    pub async fn reply_to_inquiry(
        &self,
        profile: &Profile,
        inquiry_id: i64,
        request: ReplyInquiryRequest,
    ) -> AppResult<StudioInquiry> {
        let studio_id = studio_of(profile)?;

        if request.body.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Reply body is required".to_string(),
            ));
        }

        let inquiry = sqlx::query_as::<_, StudioInquiry>(&format!(
            "SELECT {INQUIRY_COLUMNS} FROM studio_inquiries WHERE id = $1 AND studio_id = $2"
        ))
        .bind(inquiry_id)
        .bind(studio_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Inquiry not found".to_string()))?;

        self.mailthread_service
            .send_reply(&inquiry.thread_id, request.body.trim())
            .await?;

        let updated = sqlx::query_as::<_, StudioInquiry>(&format!(
            "UPDATE studio_inquiries SET status = 'replied' \
             WHERE id = $1 RETURNING {INQUIRY_COLUMNS}"
        ))
        .bind(inquiry_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn close_inquiry(
        &self,
        profile: &Profile,
        inquiry_id: i64,
    ) -> AppResult<StudioInquiry> {
        let studio_id = studio_of(profile)?;

        sqlx::query_as::<_, StudioInquiry>(&format!(
            "UPDATE studio_inquiries SET status = 'closed' \
             WHERE id = $1 AND studio_id = $2 RETURNING {INQUIRY_COLUMNS}"
        ))
        .bind(inquiry_id)
        .bind(studio_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Inquiry not found".to_string()))
    }
}
