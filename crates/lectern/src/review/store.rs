//! The review store: append-only version chains behind one write lock.
//!
//! Reviews are kept in creation order. Every mutation of a review's
//! version chain runs its read-current-append sequence under the write
//! lock, so version numbers are strictly monotonic and a stale edit is
//! rejected with `Conflict` instead of overwriting. Read paths clone
//! snapshots out of the read lock and never observe a partial append.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use tracing::debug;

use crate::comment::{Comment, Visibility};
use crate::error::{LecternError, Result};
use crate::ids::{CommentId, CourseId, ProfessorId, ReviewId, UserId};
use crate::summary::RatingSummary;

use super::rating::RatingSchema;
use super::types::{Rebuttal, Review, ReviewFields, ReviewVersion};

/// Holds all reviews with their versions, rebuttals, and comments.
#[derive(Debug)]
pub struct ReviewStore {
    reviews: RwLock<IndexMap<ReviewId, Review>>,
    next_review_id: AtomicU64,
    next_comment_id: AtomicU64,
}

impl ReviewStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            reviews: RwLock::new(IndexMap::new()),
            next_review_id: AtomicU64::new(1),
            next_comment_id: AtomicU64::new(1),
        }
    }

    /// Rebuild a store from previously snapshotted reviews.
    ///
    /// Id counters are re-seeded above the highest persisted id.
    pub fn from_reviews(reviews: Vec<Review>) -> Self {
        let max_review = reviews.iter().map(|r| r.id.0).max().unwrap_or(0);
        let max_comment = reviews
            .iter()
            .flat_map(|r| r.comments.iter())
            .map(|c| c.id.0)
            .max()
            .unwrap_or(0);

        Self {
            reviews: RwLock::new(reviews.into_iter().map(|r| (r.id, r)).collect()),
            next_review_id: AtomicU64::new(max_review + 1),
            next_comment_id: AtomicU64::new(max_comment + 1),
        }
    }

    /// Clone out every review, in creation order.
    pub fn snapshot(&self) -> Vec<Review> {
        self.reviews.read().unwrap().values().cloned().collect()
    }

    // =========================================================================
    // Review lifecycle
    // =========================================================================

    /// Create a review with version 1.
    ///
    /// The professor-teaches-course association is the engine's concern;
    /// the store validates the submitted fields against the schema.
    pub fn create(
        &self,
        reviewer: UserId,
        professor: ProfessorId,
        course: CourseId,
        fields: ReviewFields,
        schema: &RatingSchema,
    ) -> Result<Review> {
        validate_fields(&fields, schema)?;

        let id = ReviewId(self.next_review_id.fetch_add(1, Ordering::SeqCst));
        let version = ReviewVersion::from_fields(1, fields);
        let review = Review {
            id,
            professor,
            course,
            reviewer,
            created_at: version.created_at,
            versions: vec![version],
            rebuttal: None,
            comments: Vec::new(),
        };

        self.reviews.write().unwrap().insert(id, review.clone());
        debug!(review = %id, professor = %professor, "created review");
        Ok(review)
    }

    /// Append a new version to a review.
    ///
    /// Only the original author may edit. The edit must be based on the
    /// current version; a stale `expected_version` fails with `Conflict`
    /// and commits nothing.
    pub fn update(
        &self,
        review_id: ReviewId,
        editor: UserId,
        expected_version: u32,
        fields: ReviewFields,
        schema: &RatingSchema,
    ) -> Result<Review> {
        validate_fields(&fields, schema)?;

        let mut reviews = self.reviews.write().unwrap();
        let review = reviews
            .get_mut(&review_id)
            .ok_or_else(|| review_not_found(review_id))?;

        if review.reviewer != editor {
            return Err(LecternError::Forbidden(
                "Only the original author may edit a review".to_string(),
            ));
        }

        let current = review.version();
        if expected_version != current {
            return Err(LecternError::Conflict {
                expected: expected_version,
                actual: current,
            });
        }

        review
            .versions
            .push(ReviewVersion::from_fields(current + 1, fields));
        debug!(review = %review_id, version = current + 1, "appended review version");
        Ok(review.clone())
    }

    /// Delete a review, cascading to its rebuttal and comments.
    ///
    /// Only the original author or a moderator may delete.
    pub fn delete(&self, review_id: ReviewId, requester: UserId, can_moderate: bool) -> Result<()> {
        let mut reviews = self.reviews.write().unwrap();
        let review = reviews
            .get(&review_id)
            .ok_or_else(|| review_not_found(review_id))?;

        if review.reviewer != requester && !can_moderate {
            return Err(LecternError::Forbidden(
                "Only the original author or an administrator may delete a review".to_string(),
            ));
        }

        // shift_remove keeps the remaining reviews in creation order.
        reviews.shift_remove(&review_id);
        debug!(review = %review_id, "deleted review");
        Ok(())
    }

    /// Get one review with its full history.
    pub fn get(&self, review_id: ReviewId) -> Result<Review> {
        self.reviews
            .read()
            .unwrap()
            .get(&review_id)
            .cloned()
            .ok_or_else(|| review_not_found(review_id))
    }

    /// All reviews for a professor, in creation order.
    pub fn list_by_professor(&self, professor: ProfessorId) -> Vec<Review> {
        self.reviews
            .read()
            .unwrap()
            .values()
            .filter(|r| r.professor == professor)
            .cloned()
            .collect()
    }

    /// All reviews, in creation order.
    pub fn list_all(&self) -> Vec<Review> {
        self.snapshot()
    }

    /// All reviews authored by one reviewer, in creation order.
    pub fn list_by_reviewer(&self, reviewer: UserId) -> Vec<Review> {
        self.reviews
            .read()
            .unwrap()
            .values()
            .filter(|r| r.reviewer == reviewer)
            .cloned()
            .collect()
    }

    /// A review's version history, oldest first.
    pub fn list_versions(&self, review_id: ReviewId) -> Result<Vec<ReviewVersion>> {
        Ok(self.get(review_id)?.versions)
    }

    // =========================================================================
    // Rebuttal
    // =========================================================================

    /// Submit the professor's rebuttal to a review.
    ///
    /// `represents` is the professor the author is entitled to act for,
    /// as resolved by the caller. A review holds at most one rebuttal; a
    /// second submission replaces content and timestamp in place.
    pub fn submit_rebuttal(
        &self,
        review_id: ReviewId,
        author: UserId,
        represents: Option<ProfessorId>,
        content: impl Into<String>,
    ) -> Result<Rebuttal> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(LecternError::Validation(
                "Rebuttal content must not be empty".to_string(),
            ));
        }

        let mut reviews = self.reviews.write().unwrap();
        let review = reviews
            .get_mut(&review_id)
            .ok_or_else(|| review_not_found(review_id))?;

        if represents != Some(review.professor) {
            return Err(LecternError::Forbidden(
                "Only the reviewed professor may submit a rebuttal".to_string(),
            ));
        }

        let rebuttal = Rebuttal {
            author,
            content,
            created_at: chrono::Utc::now(),
        };
        let replaced = review.rebuttal.replace(rebuttal.clone()).is_some();
        debug!(review = %review_id, replaced, "submitted rebuttal");
        Ok(rebuttal)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Attach a comment to a review.
    pub fn add_comment(
        &self,
        review_id: ReviewId,
        author: UserId,
        author_name: impl Into<String>,
        content: impl Into<String>,
        visibility: Visibility,
    ) -> Result<Comment> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(LecternError::Validation(
                "Comment content must not be empty".to_string(),
            ));
        }

        let mut reviews = self.reviews.write().unwrap();
        let review = reviews
            .get_mut(&review_id)
            .ok_or_else(|| review_not_found(review_id))?;

        let id = CommentId(self.next_comment_id.fetch_add(1, Ordering::SeqCst));
        let comment = Comment::new(id, review_id, author, author_name, content, visibility);
        review.comments.push(comment.clone());
        debug!(review = %review_id, comment = %id, "added comment");
        Ok(comment)
    }

    /// Edit a comment's content. Author-only; comments are not versioned.
    pub fn edit_comment(
        &self,
        comment_id: CommentId,
        editor: UserId,
        content: impl Into<String>,
    ) -> Result<Comment> {
        let content = content.into();
        if content.trim().is_empty() {
            return Err(LecternError::Validation(
                "Comment content must not be empty".to_string(),
            ));
        }

        let mut reviews = self.reviews.write().unwrap();
        let comment = find_comment_mut(&mut reviews, comment_id)?;

        if comment.author != editor {
            return Err(LecternError::Forbidden(
                "Only the original author may edit a comment".to_string(),
            ));
        }

        comment.content = content;
        comment.updated_at = chrono::Utc::now();
        Ok(comment.clone())
    }

    /// Remove a comment. Author-only.
    pub fn delete_comment(&self, comment_id: CommentId, requester: UserId) -> Result<()> {
        let mut reviews = self.reviews.write().unwrap();

        let comment = find_comment_mut(&mut reviews, comment_id)?;
        if comment.author != requester {
            return Err(LecternError::Forbidden(
                "Only the original author may delete a comment".to_string(),
            ));
        }
        let review_id = comment.review;

        let review = reviews
            .get_mut(&review_id)
            .ok_or_else(|| review_not_found(review_id))?;
        review.comments.retain(|c| c.id != comment_id);
        debug!(review = %review_id, comment = %comment_id, "deleted comment");
        Ok(())
    }

    /// All comments on a review, unfiltered. Visibility filtering is the
    /// engine's per-request concern.
    pub fn comments(&self, review_id: ReviewId) -> Result<Vec<Comment>> {
        Ok(self.get(review_id)?.comments)
    }

    // =========================================================================
    // Aggregation
    // =========================================================================

    /// Professor-level rating summary over latest versions.
    ///
    /// Reflects edits and deletions immediately; returns the zero
    /// summary when the professor has no reviews.
    pub fn summarize(&self, professor: ProfessorId, schema: &RatingSchema) -> RatingSummary {
        let reviews = self.reviews.read().unwrap();
        let values: Vec<u8> = reviews
            .values()
            .filter(|r| r.professor == professor)
            .filter_map(|r| schema.primary_value(&r.latest().ratings))
            .collect();
        RatingSummary::from_values(&values)
    }
}

impl Default for ReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_fields(fields: &ReviewFields, schema: &RatingSchema) -> Result<()> {
    schema.validate(&fields.ratings)?;
    if fields.summary.trim().is_empty() {
        return Err(LecternError::Validation(
            "Review summary must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn review_not_found(id: ReviewId) -> LecternError {
    LecternError::NotFound(format!("Review {} not found", id))
}

fn find_comment_mut(
    reviews: &mut IndexMap<ReviewId, Review>,
    comment_id: CommentId,
) -> Result<&mut Comment> {
    reviews
        .values_mut()
        .flat_map(|r| r.comments.iter_mut())
        .find(|c| c.id == comment_id)
        .ok_or_else(|| LecternError::NotFound(format!("Comment {} not found", comment_id)))
}
