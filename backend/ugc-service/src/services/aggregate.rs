/// Rating fan-out over the like/review/bookmark services.
use uuid::Uuid;

use crate::db::StoreError;
use crate::models::{Like, Rating};

use super::catalog::{BookmarkService, LikeService, ReviewService};
use super::ugc::{Page, MAX_PAGE_SIZE};

const RECENT_LIKES: usize = 10;

/// Combines the per-collection services for one view (film or review).
///
/// Two instances exist: the film-side one reads likes from `like`, the
/// review-side one from `review_like`.
#[derive(Clone)]
pub struct AggregateService {
    pub likes: LikeService,
    pub reviews: ReviewService,
    pub bookmarks: BookmarkService,
}

impl AggregateService {
    pub fn new(likes: LikeService, reviews: ReviewService, bookmarks: BookmarkService) -> Self {
        Self {
            likes,
            reviews,
            bookmarks,
        }
    }

    /// Rating metrics for one object, computed over all of its likes
    /// (newest first).
    pub async fn rating(&self, obj_id: Uuid) -> Result<Rating, StoreError> {
        let likes = self
            .likes
            .search(Some(obj_id), None, Page::first(MAX_PAGE_SIZE), "-date")
            .await?;

        Ok(compute_rating(likes))
    }
}

/// `likes` must be sorted newest first; the ten most recent are echoed back.
fn compute_rating(likes: Vec<Like>) -> Rating {
    let total: i64 = likes.iter().map(|like| i64::from(like.score)).sum();
    let count = likes.len();

    let (absolute_rating, average_rating) = if count == 0 {
        (None, None)
    } else {
        (Some(total), Some(total as f64 / count as f64))
    };

    let likes_count = likes.iter().filter(|like| like.score == 10).count() as i64;
    let dislikes_count = likes.iter().filter(|like| like.score == 0).count() as i64;

    let mut recent = likes;
    recent.truncate(RECENT_LIKES);

    Rating {
        recent_likes: recent,
        absolute_rating,
        average_rating,
        likes: likes_count,
        dislikes: dislikes_count,
    }
}
