pub mod auth;
pub mod classes;
pub mod lesson_packs;
pub mod lesson_requests;
pub mod notes;
pub mod payments;
pub mod students;
pub mod studios;
pub mod waivers;
pub mod webhook;

pub use auth::auth_config;
pub use classes::classes_config;
pub use lesson_packs::lesson_packs_config;
pub use lesson_requests::lesson_requests_config;
pub use notes::notes_config;
pub use payments::payments_config;
pub use students::students_config;
pub use studios::studios_config;
pub use waivers::waivers_config;
pub use webhook::webhook_config;

use actix_web::{HttpResponse, Result};
use serde_json::json;

pub async fn health() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}
