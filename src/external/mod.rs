pub mod llm;
pub mod mailthread;
pub mod places;
pub mod stripe;

pub use llm::LlmService;
pub use mailthread::MailthreadService;
pub use places::{PlacePrediction, PlacesService};
pub use stripe::StripeService;
