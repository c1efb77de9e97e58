pub mod health;
pub mod stories;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use stories::{get_story, list_stories};
