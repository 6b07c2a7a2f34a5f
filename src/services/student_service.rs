use super::{STUDENT_COLUMNS, studio_of};
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{CreateStudentRequest, Profile, Student, StudentQuery, UpdateStudentRequest};
use crate::utils::{PaginatedResponse, PaginationParams, is_valid_email, is_valid_phone};

#[derive(Clone)]
pub struct StudentService {
    pool: DbPool,
}

impl StudentService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list_students(
        &self,
        profile: &Profile,
        query: &StudentQuery,
    ) -> AppResult<PaginatedResponse<Student>> {
        let studio_id = studio_of(profile)?;
        let params = PaginationParams::new(query.page, query.per_page);

        let search = query
            .search
            .as_ref()
            .map(|s| format!("%{}%", s.trim().to_lowercase()));
        let include_archived = query.include_archived.unwrap_or(false);

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM students \
             WHERE studio_id = $1 \
             AND ($2::text IS NULL OR lower(first_name) LIKE $2 OR lower(last_name) LIKE $2) \
             AND ($3::text IS NULL OR level = $3) \
             AND (archived = FALSE OR $4)",
        )
        .bind(studio_id)
        .bind(&search)
        .bind(&query.level)
        .bind(include_archived)
        .fetch_one(&self.pool)
        .await?;

        let students = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students \
             WHERE studio_id = $1 \
             AND ($2::text IS NULL OR lower(first_name) LIKE $2 OR lower(last_name) LIKE $2) \
             AND ($3::text IS NULL OR level = $3) \
             AND (archived = FALSE OR $4) \
             ORDER BY last_name, first_name LIMIT $5 OFFSET $6"
        ))
        .bind(studio_id)
        .bind(&search)
        .bind(&query.level)
        .bind(include_archived)
        .bind(params.get_limit())
        .bind(params.get_offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(PaginatedResponse::new(students, &params, total))
    }

    pub async fn create_student(
        &self,
        profile: &Profile,
        request: CreateStudentRequest,
    ) -> AppResult<Student> {
        let studio_id = studio_of(profile)?;
        validate_contact(&request.email, &request.phone)?;

        if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "First and last name are required".to_string(),
            ));
        }

        let student = sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students \
             (studio_id, instructor_id, profile_id, first_name, last_name, email, phone, level) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(studio_id)
        .bind(profile.id)
        .bind(request.profile_id)
        .bind(request.first_name.trim())
        .bind(request.last_name.trim())
        .bind(&request.email)
        .bind(&request.phone)
        .bind(&request.level)
        .fetch_one(&self.pool)
        .await?;

        Ok(student)
    }

    pub async fn get_student(&self, profile: &Profile, student_id: i64) -> AppResult<Student> {
        let studio_id = studio_of(profile)?;

        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1 AND studio_id = $2"
        ))
        .bind(student_id)
        .bind(studio_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))
    }

    pub async fn update_student(
        &self,
        profile: &Profile,
        student_id: i64,
        request: UpdateStudentRequest,
    ) -> AppResult<Student> {
        let studio_id = studio_of(profile)?;
        validate_contact(&request.email, &request.phone)?;

        sqlx::query_as::<_, Student>(&format!(
            "UPDATE students SET \
             first_name = COALESCE($3, first_name), \
             last_name = COALESCE($4, last_name), \
             email = COALESCE($5, email), \
             phone = COALESCE($6, phone), \
             level = COALESCE($7, level), \
             profile_id = COALESCE($8, profile_id), \
             updated_at = now() \
             WHERE id = $1 AND studio_id = $2 RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(student_id)
        .bind(studio_id)
        .bind(request.first_name)
        .bind(request.last_name)
        .bind(request.email)
        .bind(request.phone)
        .bind(request.level)
        .bind(request.profile_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))
    }

    /// Soft removal; the roster entry stays for payment and waiver history.
    pub async fn archive_student(&self, profile: &Profile, student_id: i64) -> AppResult<()> {
        let studio_id = studio_of(profile)?;

        let result = sqlx::query(
            "UPDATE students SET archived = TRUE, updated_at = now() \
             WHERE id = $1 AND studio_id = $2",
        )
        .bind(student_id)
        .bind(studio_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Student not found".to_string()));
        }
        Ok(())
    }
}

fn validate_contact(email: &Option<String>, phone: &Option<String>) -> AppResult<()> {
    if let Some(email) = email
        && !is_valid_email(email)
    {
        return Err(AppError::ValidationError("Invalid email".to_string()));
    }
    if let Some(phone) = phone
        && !is_valid_phone(phone)
    {
        return Err(AppError::ValidationError("Invalid phone number".to_string()));
    }
    Ok(())
}
