pub mod auth_service;
pub mod class_service;
pub mod lesson_pack_service;
pub mod lesson_request_service;
pub mod note_service;
pub mod payment_service;
pub mod student_service;
pub mod studio_service;
pub mod waiver_service;

pub use auth_service::AuthService;
pub use class_service::ClassService;
pub use lesson_pack_service::LessonPackService;
pub use lesson_request_service::LessonRequestService;
pub use note_service::NoteService;
pub use payment_service::PaymentService;
pub use student_service::StudentService;
pub use studio_service::StudioService;
pub use waiver_service::WaiverService;

use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{Profile, Student};

pub(crate) const STUDENT_COLUMNS: &str =
    "id, studio_id, instructor_id, profile_id, first_name, last_name, \
     email, phone, level, archived, created_at, updated_at";

/// Resolves a dancer profile to their roster entry. Dancer-facing operations
/// (enroll, spend, sign, history) all act through this link.
pub(crate) async fn student_for_profile(pool: &DbPool, profile_id: i64) -> AppResult<Student> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE profile_id = $1 AND archived = FALSE"
    ))
    .bind(profile_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| {
        AppError::NotFound("No student record is linked to this profile".to_string())
    })
}

/// Staff profiles must be attached to a studio before touching studio data.
pub(crate) fn studio_of(profile: &Profile) -> AppResult<i64> {
    profile.studio_id.ok_or_else(|| {
        AppError::ValidationError("Profile is not attached to a studio".to_string())
    })
}
