use super::{student_for_profile, studio_of};
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateLessonRequestRequest, LessonRequest, LessonRequestQuery, LessonRequestStatus, Profile,
    Role,
};
use crate::utils::{PaginatedResponse, PaginationParams};

const REQUEST_COLUMNS: &str = "id, studio_id, student_id, instructor_id, requested_start, \
     requested_end, message, status, created_at, updated_at";

#[derive(Clone)]
pub struct LessonRequestService {
    pool: DbPool,
}

impl LessonRequestService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn create_request(
        &self,
        profile: &Profile,
        request: CreateLessonRequestRequest,
    ) -> AppResult<LessonRequest> {
        let student = student_for_profile(&self.pool, profile.id).await?;

        if request.requested_end <= request.requested_start {
            return Err(AppError::ValidationError(
                "requested_end must be after requested_start".to_string(),
            ));
        }

        let instructor: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM profiles \
             WHERE id = $1 AND studio_id = $2 AND role = 'instructor'",
        )
        .bind(request.instructor_id)
        .bind(student.studio_id)
        .fetch_optional(&self.pool)
        .await?;
        if instructor.is_none() {
            return Err(AppError::NotFound("Instructor not found".to_string()));
        }

        let lesson_request = sqlx::query_as::<_, LessonRequest>(&format!(
            "INSERT INTO lesson_requests \
             (studio_id, student_id, instructor_id, requested_start, requested_end, message) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(student.studio_id)
        .bind(student.id)
        .bind(request.instructor_id)
        .bind(request.requested_start)
        .bind(request.requested_end)
        .bind(&request.message)
        .fetch_one(&self.pool)
        .await?;

        log::info!(
            "Student {} requested a private lesson with instructor {}",
            student.id,
            request.instructor_id
        );

        Ok(lesson_request)
    }

    /// Dancers see their own requests, instructors the ones addressed to
    /// them, admins everything in the studio.
    pub async fn list_requests(
        &self,
        profile: &Profile,
        query: &LessonRequestQuery,
    ) -> AppResult<PaginatedResponse<LessonRequest>> {
        let params = PaginationParams::new(query.page, query.per_page);

        let (studio_id, student_id, instructor_id) = match profile.role {
            Role::Dancer => {
                let student = student_for_profile(&self.pool, profile.id).await?;
                (student.studio_id, Some(student.id), None)
            }
            Role::Instructor => (studio_of(profile)?, None, Some(profile.id)),
            Role::Admin => (studio_of(profile)?, None, None),
        };

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM lesson_requests \
             WHERE studio_id = $1 \
             AND ($2::bigint IS NULL OR student_id = $2) \
             AND ($3::bigint IS NULL OR instructor_id = $3) \
             AND ($4::text IS NULL OR status = $4)",
        )
        .bind(studio_id)
        .bind(student_id)
        .bind(instructor_id)
        .bind(query.status)
        .fetch_one(&self.pool)
        .await?;

        let requests = sqlx::query_as::<_, LessonRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM lesson_requests \
             WHERE studio_id = $1 \
             AND ($2::bigint IS NULL OR student_id = $2) \
             AND ($3::bigint IS NULL OR instructor_id = $3) \
             AND ($4::text IS NULL OR status = $4) \
             ORDER BY created_at DESC LIMIT $5 OFFSET $6"
        ))
        .bind(studio_id)
        .bind(student_id)
        .bind(instructor_id)
        .bind(query.status)
        .bind(params.get_limit())
        .bind(params.get_offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedResponse::new(requests, &params, total))
    }

    pub async fn accept(&self, profile: &Profile, request_id: i64) -> AppResult<LessonRequest> {
        self.transition(profile, request_id, LessonRequestStatus::Pending,
            LessonRequestStatus::Accepted)
            .await
    }

    pub async fn decline(&self, profile: &Profile, request_id: i64) -> AppResult<LessonRequest> {
        self.transition(profile, request_id, LessonRequestStatus::Pending,
            LessonRequestStatus::Declined)
            .await
    }

    pub async fn complete(&self, profile: &Profile, request_id: i64) -> AppResult<LessonRequest> {
        self.transition(profile, request_id, LessonRequestStatus::Accepted,
            LessonRequestStatus::Completed)
            .await
    }

    async fn transition(
        &self,
        profile: &Profile,
        request_id: i64,
        from: LessonRequestStatus,
        to: LessonRequestStatus,
    ) -> AppResult<LessonRequest> {
        let existing = sqlx::query_as::<_, LessonRequest>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM lesson_requests WHERE id = $1"
        ))
        .bind(request_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson request not found".to_string()))?;

        if existing.instructor_id != profile.id {
            return Err(AppError::Forbidden);
        }
        if existing.status != from {
            return Err(AppError::ValidationError(format!(
                "Lesson request is not {from:?}"
            )));
        }

        let updated = sqlx::query_as::<_, LessonRequest>(&format!(
            "UPDATE lesson_requests SET status = $2, updated_at = now() \
             WHERE id = $1 AND status = $3 RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(request_id)
        .bind(to)
        .bind(from)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            AppError::ValidationError("Lesson request changed state concurrently".to_string())
        })?;

        Ok(updated)
    }
}
