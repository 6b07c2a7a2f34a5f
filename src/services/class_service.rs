use super::{student_for_profile, studio_of};
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{
    Class, ClassCostResponse, ClassQuery, ClassResponse, CreateClassRequest, Enrollment,
    EnrollmentDetail, Profile, Role, UpdateClassRequest,
};
use crate::pricing;
use crate::utils::{PaginatedResponse, PaginationParams};
use std::collections::HashMap;

const CLASS_COLUMNS: &str = "id, studio_id, instructor_id, title, description, location, \
     start_time, end_time, capacity, pricing_model, cost_per_person, base_cost, cost_per_hour, \
     tiered_base_students, tiered_additional_cost, canceled, created_at, updated_at";

const ENROLLMENT_COLUMNS: &str = "id, class_id, student_id, status, enrolled_at";

#[derive(Clone)]
pub struct ClassService {
    pool: DbPool,
}

impl ClassService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Studio the caller can see classes for: staff use their own studio,
    /// dancers the studio of their roster entry.
    async fn visible_studio(&self, profile: &Profile) -> AppResult<i64> {
        match profile.role {
            Role::Instructor | Role::Admin => studio_of(profile),
            Role::Dancer => Ok(student_for_profile(&self.pool, profile.id).await?.studio_id),
        }
    }

    pub async fn list_classes(
        &self,
        profile: &Profile,
        query: &ClassQuery,
    ) -> AppResult<PaginatedResponse<ClassResponse>> {
        let studio_id = self.visible_studio(profile).await?;
        let params = PaginationParams::new(query.page, query.per_page);
        let include_canceled = query.include_canceled.unwrap_or(false);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM classes \
             WHERE studio_id = $1 \
             AND ($2::timestamptz IS NULL OR start_time >= $2) \
             AND ($3::timestamptz IS NULL OR start_time < $3) \
             AND (canceled = FALSE OR $4)",
        )
        .bind(studio_id)
        .bind(query.from)
        .bind(query.to)
        .bind(include_canceled)
        .fetch_one(&self.pool)
        .await?;

        let classes = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes \
             WHERE studio_id = $1 \
             AND ($2::timestamptz IS NULL OR start_time >= $2) \
             AND ($3::timestamptz IS NULL OR start_time < $3) \
             AND (canceled = FALSE OR $4) \
             ORDER BY start_time LIMIT $5 OFFSET $6"
        ))
        .bind(studio_id)
        .bind(query.from)
        .bind(query.to)
        .bind(include_canceled)
        .bind(params.get_limit())
        .bind(params.get_offset())
        .fetch_all(&self.pool)
        .await?;

        let counts = self
            .enrolled_counts(classes.iter().map(|c| c.id).collect())
            .await?;
        let items = classes
            .into_iter()
            .map(|class| {
                let enrolled = counts.get(&class.id).copied().unwrap_or(0);
                ClassResponse::from_class(class, enrolled)
            })
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }

    async fn enrolled_counts(&self, class_ids: Vec<i64>) -> AppResult<HashMap<i64, i64>> {
        if class_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT class_id, COUNT(*) FROM enrollments \
             WHERE class_id = ANY($1) AND status = 'enrolled' GROUP BY class_id",
        )
        .bind(&class_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    async fn enrolled_count(&self, class_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM enrollments WHERE class_id = $1 AND status = 'enrolled'",
        )
        .bind(class_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn create_class(
        &self,
        profile: &Profile,
        request: CreateClassRequest,
    ) -> AppResult<ClassResponse> {
        let studio_id = studio_of(profile)?;
        validate_schedule_and_costs(
            request.start_time,
            request.end_time,
            &[
                request.cost_per_person,
                request.base_cost,
                request.cost_per_hour,
                request.tiered_base_students,
                request.tiered_additional_cost,
            ],
        )?;

        let class = sqlx::query_as::<_, Class>(&format!(
            "INSERT INTO classes \
             (studio_id, instructor_id, title, description, location, start_time, end_time, \
              capacity, pricing_model, cost_per_person, base_cost, cost_per_hour, \
              tiered_base_students, tiered_additional_cost) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
             RETURNING {CLASS_COLUMNS}"
        ))
        .bind(studio_id)
        .bind(profile.id)
        .bind(request.title.trim())
        .bind(&request.description)
        .bind(&request.location)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.capacity)
        .bind(request.pricing_model)
        .bind(request.cost_per_person)
        .bind(request.base_cost)
        .bind(request.cost_per_hour)
        .bind(request.tiered_base_students)
        .bind(request.tiered_additional_cost)
        .fetch_one(&self.pool)
        .await?;

        Ok(ClassResponse::from_class(class, 0))
    }

    pub async fn get_class(&self, profile: &Profile, class_id: i64) -> AppResult<ClassResponse> {
        let studio_id = self.visible_studio(profile).await?;
        let class = self.class_in_studio(class_id, studio_id).await?;
        let enrolled = self.enrolled_count(class_id).await?;
        Ok(ClassResponse::from_class(class, enrolled))
    }

    async fn class_in_studio(&self, class_id: i64, studio_id: i64) -> AppResult<Class> {
        sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1 AND studio_id = $2"
        ))
        .bind(class_id)
        .bind(studio_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Class not found".to_string()))
    }

    pub async fn update_class(
        &self,
        profile: &Profile,
        class_id: i64,
        request: UpdateClassRequest,
    ) -> AppResult<ClassResponse> {
        let studio_id = studio_of(profile)?;

        if let (Some(start), Some(end)) = (request.start_time, request.end_time)
            && end <= start
        {
            return Err(AppError::ValidationError(
                "end_time must be after start_time".to_string(),
            ));
        }
        validate_costs(&[
            request.cost_per_person,
            request.base_cost,
            request.cost_per_hour,
            request.tiered_base_students,
            request.tiered_additional_cost,
        ])?;

        let class = sqlx::query_as::<_, Class>(&format!(
            "UPDATE classes SET \
             title = COALESCE($3, title), \
             description = COALESCE($4, description), \
             location = COALESCE($5, location), \
             start_time = COALESCE($6, start_time), \
             end_time = COALESCE($7, end_time), \
             capacity = COALESCE($8, capacity), \
             pricing_model = COALESCE($9, pricing_model), \
             cost_per_person = COALESCE($10, cost_per_person), \
             base_cost = COALESCE($11, base_cost), \
             cost_per_hour = COALESCE($12, cost_per_hour), \
             tiered_base_students = COALESCE($13, tiered_base_students), \
             tiered_additional_cost = COALESCE($14, tiered_additional_cost), \
             canceled = COALESCE($15, canceled), \
             updated_at = now() \
             WHERE id = $1 AND studio_id = $2 RETURNING {CLASS_COLUMNS}"
        ))
        .bind(class_id)
        .bind(studio_id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.location)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.capacity)
        .bind(request.pricing_model)
        .bind(request.cost_per_person)
        .bind(request.base_cost)
        .bind(request.cost_per_hour)
        .bind(request.tiered_base_students)
        .bind(request.tiered_additional_cost)
        .bind(request.canceled)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Class not found".to_string()))?;

        let enrolled = self.enrolled_count(class_id).await?;
        Ok(ClassResponse::from_class(class, enrolled))
    }

    pub async fn cancel_class(&self, profile: &Profile, class_id: i64) -> AppResult<()> {
        let studio_id = studio_of(profile)?;
        let result = sqlx::query(
            "UPDATE classes SET canceled = TRUE, updated_at = now() \
             WHERE id = $1 AND studio_id = $2",
        )
        .bind(class_id)
        .bind(studio_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Class not found".to_string()));
        }
        Ok(())
    }

    pub async fn class_cost(
        &self,
        profile: &Profile,
        class_id: i64,
    ) -> AppResult<ClassCostResponse> {
        let studio_id = studio_of(profile)?;
        let class = self.class_in_studio(class_id, studio_id).await?;
        let enrolled = self.enrolled_count(class_id).await?;

        Ok(ClassCostResponse {
            class_id: class.id,
            pricing_model: class.pricing_model,
            enrolled_count: enrolled,
            total_cost: pricing::class_cost(&class, enrolled),
        })
    }

    pub async fn list_enrollments(
        &self,
        profile: &Profile,
        class_id: i64,
    ) -> AppResult<Vec<EnrollmentDetail>> {
        let studio_id = studio_of(profile)?;
        self.class_in_studio(class_id, studio_id).await?;

        let enrollments = sqlx::query_as::<_, EnrollmentDetail>(
            "SELECT e.id, e.class_id, e.student_id, e.status, e.enrolled_at, \
             s.first_name, s.last_name \
             FROM enrollments e JOIN students s ON s.id = e.student_id \
             WHERE e.class_id = $1 ORDER BY e.enrolled_at",
        )
        .bind(class_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(enrollments)
    }

    pub async fn enroll(&self, profile: &Profile, class_id: i64) -> AppResult<Enrollment> {
        let student = student_for_profile(&self.pool, profile.id).await?;
        let class = self.class_in_studio(class_id, student.studio_id).await?;

        if class.canceled {
            return Err(AppError::ValidationError(
                "Class has been canceled".to_string(),
            ));
        }

        // full classes go to the waitlist
        let enrolled = self.enrolled_count(class_id).await?;
        let status = match class.capacity {
            Some(capacity) if enrolled >= capacity as i64 => "waitlisted",
            _ => "enrolled",
        };

        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            "INSERT INTO enrollments (class_id, student_id, status) VALUES ($1, $2, $3) \
             ON CONFLICT (class_id, student_id) \
             DO UPDATE SET status = EXCLUDED.status, enrolled_at = now() \
             RETURNING {ENROLLMENT_COLUMNS}"
        ))
        .bind(class_id)
        .bind(student.id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        log::info!(
            "Student {} {} for class {class_id}",
            student.id,
            status
        );

        Ok(enrollment)
    }

    pub async fn drop(&self, profile: &Profile, class_id: i64) -> AppResult<()> {
        let student = student_for_profile(&self.pool, profile.id).await?;

        let result = sqlx::query(
            "UPDATE enrollments SET status = 'dropped' \
             WHERE class_id = $1 AND student_id = $2 AND status != 'dropped'",
        )
        .bind(class_id)
        .bind(student.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(
                "No active enrollment for this class".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_schedule_and_costs(
    start: chrono::DateTime<chrono::Utc>,
    end: chrono::DateTime<chrono::Utc>,
    amounts: &[Option<i64>],
) -> AppResult<()> {
    if end <= start {
        return Err(AppError::ValidationError(
            "end_time must be after start_time".to_string(),
        ));
    }
    validate_costs(amounts)
}

fn validate_costs(amounts: &[Option<i64>]) -> AppResult<()> {
    for amount in amounts.iter().flatten() {
        if *amount < 0 {
            return Err(AppError::ValidationError(
                "Pricing fields must not be negative".to_string(),
            ));
        }
    }
    Ok(())
}
