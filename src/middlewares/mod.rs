pub mod auth;
pub mod capability;
pub mod cors;

pub use auth::{AuthIdentity, AuthMiddleware, CurrentProfile};
pub use capability::CapabilityGuard;
pub use cors::create_cors;
