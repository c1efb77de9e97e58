pub mod database;
pub mod metrics;
pub mod query;
pub mod shaping;
pub mod stories;
pub mod store;

pub use database::MongoDb;
pub use self::metrics::{get_metrics, init_metrics};
pub use query::{StoryFilter, PAGE_SIZE};
pub use stories::StoryService;
pub use store::StoryStore;
