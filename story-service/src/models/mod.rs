pub mod story;

pub use story::{CoverRef, RefArticle, Story, StoryListing, Summary};
