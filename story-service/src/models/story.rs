use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

/// Story text as stored by ingestion: either raw prose or already split.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Summary {
    Text(String),
    Sentences(Vec<String>),
}

/// A story as read for the detail view.
#[derive(Debug, Clone, Deserialize)]
pub struct Story {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub summary: Option<Summary>,
    #[serde(deserialize_with = "lenient_datetime::deserialize")]
    pub latest_ref_article_at: DateTime<Utc>,
    #[serde(default)]
    pub ref_articles: Option<Vec<RefArticle>>,
}

/// The projection of a story needed for a feed entry.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryListing {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub headline: String,
    #[serde(deserialize_with = "lenient_datetime::deserialize")]
    pub latest_ref_article_at: DateTime<Utc>,
    #[serde(default)]
    pub ref_articles: Option<Vec<CoverRef>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefArticle {
    #[serde(deserialize_with = "lenient_id::deserialize")]
    pub article_id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(deserialize_with = "lenient_datetime::deserialize")]
    pub update_date: DateTime<Utc>,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverRef {
    #[serde(default)]
    pub cover_image: Option<String>,
}

impl Story {
    pub fn ref_articles(&self) -> &[RefArticle] {
        self.ref_articles.as_deref().unwrap_or_default()
    }
}

impl StoryListing {
    pub fn ref_articles(&self) -> &[CoverRef] {
        self.ref_articles.as_deref().unwrap_or_default()
    }
}

/// Timestamps are BSON datetimes, but older ingestion runs wrote RFC 3339
/// strings. Both decode to UTC.
mod lenient_datetime {
    use chrono::{DateTime, Utc};
    use mongodb::bson::Bson;
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::DateTime(dt) => Ok(dt.to_chrono()),
            Bson::String(raw) => DateTime::parse_from_rfc3339(&raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| D::Error::custom(format!("invalid timestamp {:?}: {}", raw, e))),
            other => Err(D::Error::custom(format!(
                "expected a datetime, found {:?}",
                other.element_type()
            ))),
        }
    }
}

/// Article ids are strings, or ObjectIds when ingestion copied the source `_id`.
mod lenient_id {
    use mongodb::bson::Bson;
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Bson::deserialize(deserializer)? {
            Bson::String(id) => Ok(id),
            Bson::ObjectId(oid) => Ok(oid.to_hex()),
            Bson::Int32(n) => Ok(n.to_string()),
            Bson::Int64(n) => Ok(n.to_string()),
            other => Err(D::Error::custom(format!(
                "expected an article id, found {:?}",
                other.element_type()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mongodb::bson::{self, doc, DateTime as BsonDateTime};

    #[test]
    fn decodes_bson_story_with_raw_summary() {
        let oid = ObjectId::new();
        let at = Utc.with_ymd_and_hms(2026, 2, 23, 12, 49, 0).unwrap();
        let document = doc! {
            "_id": oid,
            "headline": "Budget 2026 announced",
            "summary": "First sentence. Second sentence.",
            "latest_ref_article_at": BsonDateTime::from_chrono(at),
            "ref_articles": [{
                "article_id": "a-1",
                "url": "https://example.com/a-1",
                "title": "Budget",
                "update_date": BsonDateTime::from_chrono(at),
                "source": "The Straits Times",
                "cover_image": "https://img/a.jpg",
                "collection": "straits_times",
            }],
        };

        let story: Story = bson::from_document(document).unwrap();
        assert_eq!(story.id, oid);
        assert_eq!(story.latest_ref_article_at, at);
        assert_eq!(
            story.summary,
            Some(Summary::Text("First sentence. Second sentence.".to_string()))
        );
        let article = &story.ref_articles()[0];
        assert_eq!(article.article_id, "a-1");
        assert_eq!(article.collection.as_deref(), Some("straits_times"));
    }

    #[test]
    fn accepts_string_timestamps_and_split_summaries() {
        let document = doc! {
            "_id": ObjectId::new(),
            "headline": "Rail disruption",
            "summary": ["One.", "Two."],
            "latest_ref_article_at": "2026-01-05T08:30:00+08:00",
        };

        let story: Story = bson::from_document(document).unwrap();
        assert_eq!(
            story.latest_ref_article_at,
            Utc.with_ymd_and_hms(2026, 1, 5, 0, 30, 0).unwrap()
        );
        assert_eq!(
            story.summary,
            Some(Summary::Sentences(vec!["One.".into(), "Two.".into()]))
        );
        assert!(story.ref_articles().is_empty());
    }

    #[test]
    fn null_ref_articles_are_treated_as_empty() {
        let document = doc! {
            "_id": ObjectId::new(),
            "latest_ref_article_at": BsonDateTime::now(),
            "ref_articles": null,
        };

        let listing: StoryListing = bson::from_document(document).unwrap();
        assert_eq!(listing.headline, "");
        assert!(listing.ref_articles().is_empty());
    }

    #[test]
    fn object_id_article_ids_become_hex() {
        let article_oid = ObjectId::new();
        let document = doc! {
            "article_id": article_oid,
            "url": "https://example.com",
            "title": "t",
            "update_date": BsonDateTime::now(),
            "source": "Mothership",
        };

        let article: RefArticle = bson::from_document(document).unwrap();
        assert_eq!(article.article_id, article_oid.to_hex());
        assert!(article.cover_image.is_none());
    }

    #[test]
    fn rejects_non_timestamp_values() {
        let document = doc! {
            "_id": ObjectId::new(),
            "latest_ref_article_at": 42,
        };
        assert!(bson::from_document::<StoryListing>(document).is_err());
    }
}
