//! MongoDB query documents for the story collection.

use mongodb::bson::{doc, oid::ObjectId, Document};

pub const PAGE_SIZE: u64 = 10;

/// Listing filters after normalisation: no blank or repeated collection
/// tags, no blank search term.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryFilter {
    pub collections: Vec<String>,
    pub search: Option<String>,
}

impl StoryFilter {
    pub fn new(collections: Vec<String>, search: Option<String>) -> Self {
        let mut tags: Vec<String> = Vec::with_capacity(collections.len());
        for tag in collections {
            let tag = tag.trim();
            if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        let search = search
            .map(|term| term.trim().to_string())
            .filter(|term| !term.is_empty());

        Self {
            collections: tags,
            search,
        }
    }

    pub fn to_document(&self) -> Document {
        let mut filter = visible_filter();

        if !self.collections.is_empty() {
            filter.insert(
                "ref_articles.collection",
                doc! { "$in": self.collections.clone() },
            );
        }

        if let Some(term) = &self.search {
            let pattern = regex::escape(term);
            filter.insert(
                "$or",
                vec![
                    doc! { "headline": { "$regex": pattern.as_str(), "$options": "i" } },
                    doc! { "summary": { "$regex": pattern.as_str(), "$options": "i" } },
                ],
            );
        }

        filter
    }
}

/// Only stories that are both active and visible are ever served.
pub fn visible_filter() -> Document {
    doc! { "is_active": true, "is_visible": true }
}

pub fn detail_filter(id: ObjectId) -> Document {
    let mut filter = visible_filter();
    filter.insert("_id", id);
    filter
}

/// Newest first; `_id` breaks ties so pages never overlap.
pub fn listing_sort() -> Document {
    doc! { "latest_ref_article_at": -1, "_id": -1 }
}

pub fn listing_projection() -> Document {
    doc! {
        "_id": 1,
        "headline": 1,
        "latest_ref_article_at": 1,
        "ref_articles.cover_image": 1,
    }
}

pub fn detail_projection() -> Document {
    doc! {
        "_id": 1,
        "headline": 1,
        "summary": 1,
        "latest_ref_article_at": 1,
        "ref_articles": 1,
    }
}

pub fn skip_for_page(page: u64) -> u64 {
    page.saturating_sub(1).saturating_mul(PAGE_SIZE)
}
