pub mod stories;

pub use stories::{
    Pagination, RefArticleResponse, StoriesResponse, StoryDetail, StoryItem, StoryListParams,
};
