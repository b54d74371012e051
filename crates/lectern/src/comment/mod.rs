//! Comment threads attached to reviews.
//!
//! Comments are never versioned: the author may edit or delete them in
//! place. What a viewer sees is decided per request by the
//! [`visibility`] policy.

mod visibility;

pub use visibility::{Visibility, visible_to};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CommentId, ReviewId, UserId};

/// A comment on a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Store identifier.
    pub id: CommentId,
    /// The review this comment is attached to.
    pub review: ReviewId,
    /// Author account.
    pub author: UserId,
    /// Author display name as shown to viewers who may see the comment.
    pub author_name: String,
    /// Comment text.
    pub content: String,
    /// Audience tier controlling who may read the comment.
    pub visibility: Visibility,
    /// When the comment was created.
    pub created_at: DateTime<Utc>,
    /// When the comment was last edited.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Create a new comment.
    pub fn new(
        id: CommentId,
        review: ReviewId,
        author: UserId,
        author_name: impl Into<String>,
        content: impl Into<String>,
        visibility: Visibility,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            review,
            author,
            author_name: author_name.into(),
            content: content.into(),
            visibility,
            created_at: now,
            updated_at: now,
        }
    }
}
