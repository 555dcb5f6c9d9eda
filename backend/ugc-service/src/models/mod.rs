/// UGC records and aggregate response models.
///
/// Records are stored with string ids and RFC 3339 date strings, so the serde
/// representation is shared between the HTTP layer and the document store and
/// a descending sort on `date` is chronological.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A film rating by one user: 10 is a like, 0 a dislike.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Like {
    pub user_id: Uuid,
    pub obj_id: Uuid,
    pub date: DateTime<Utc>,
    pub score: i32,
}

/// A film review. `review_id` is generated server-side on create.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub review_id: Uuid,
    pub user_id: Uuid,
    pub obj_id: Uuid,
    pub date: DateTime<Utc>,
    pub title: String,
    pub text: String,
}

/// A viewing bookmark. `timestamp` is the playback position; a film can be
/// bookmarked before watching starts, hence the zero default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookmark {
    pub user_id: Uuid,
    pub obj_id: Uuid,
    pub date: DateTime<Utc>,
    pub timestamp: i64,
}

/// Rating metrics computed over the likes of one object.
///
/// `absolute_rating` and `average_rating` are `None` when the object has no
/// likes at all; counts are plain zeros.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub recent_likes: Vec<Like>,
    pub absolute_rating: Option<i64>,
    pub average_rating: Option<f64>,
    pub likes: i64,
    pub dislikes: i64,
}

/// Everything about one film: rating metrics, recent reviews and the calling
/// user's bookmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilmAggregate {
    pub film_id: Uuid,
    #[serde(flatten)]
    pub rating: Rating,
    pub recent_reviews: Vec<Review>,
    pub bookmark: Option<Bookmark>,
}

/// Detailed view of one review: body, the author's film score and the
/// review's own like metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDetail {
    pub review_id: Uuid,
    pub title: String,
    pub text: String,
    pub film_score: Option<i32>,
    pub film_id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub rating: Rating,
}

/// Brief review listing entry with rating figures from the `$lookup`
/// aggregation over review likes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewBrief {
    pub review_id: Uuid,
    pub title: String,
    pub text: String,
    pub film_id: Uuid,
    pub user_id: Uuid,
    pub absolute_rating: Option<i64>,
    pub average_rating: Option<f64>,
}

/// A user's activity: recent likes, reviews and bookmarks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_likes: Option<Vec<Like>>,
    pub recent_reviews: Vec<Review>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmarks: Option<Vec<Bookmark>>,
}

/// Mutation acknowledgement body.
#[derive(Debug, Clone, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
}

impl StatusMessage {
    pub fn created() -> Self {
        Self {
            status: "successfully created",
        }
    }

    pub fn deleted() -> Self {
        Self {
            status: "successfully deleted",
        }
    }
}
