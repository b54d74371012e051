//! Main Lectern struct and public API.
//!
//! Every operation receives an authenticated [`Viewer`] and returns
//! role-filtered projections: reviewer identities leave the engine only
//! as pseudonyms, and comments are filtered per request by the
//! visibility policy. Authorization is checked once, at the operation
//! boundary, against the viewer's capability set.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::Viewer;
use crate::catalog::Catalog;
use crate::comment::{Comment, Visibility, visible_to};
use crate::error::{LecternError, Result};
use crate::identity::Anonymizer;
use crate::ids::{CommentId, CourseId, ProfessorId, ReviewId, UserId};
use crate::review::{RatingSchema, Ratings, Rebuttal, Review, ReviewFields, ReviewStore, ReviewVersion};
use crate::summary::RatingSummary;

/// Configuration for a Lectern engine.
#[derive(Debug, Clone, Default)]
pub struct LecternConfig {
    /// The rating schema this deployment collects.
    pub rating_schema: RatingSchema,
}

/// A review as shown to a viewer: latest fields, full history, rebuttal,
/// and the comments that viewer may see. The reviewer appears only as a
/// pseudonym.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewView {
    /// Review identifier.
    pub id: ReviewId,
    /// Reviewed professor.
    pub professor: ProfessorId,
    /// Course the evaluation concerns.
    pub course: CourseId,
    /// Stable pseudonym standing in for the reviewer.
    pub pseudonym: String,
    /// Current version number.
    pub version: u32,
    /// Latest rating values.
    pub ratings: Ratings,
    /// Latest summary text.
    pub summary: String,
    /// Latest strengths text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strengths: Option<String>,
    /// Latest weaknesses text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weaknesses: Option<String>,
    /// When the review was first created.
    pub created_at: DateTime<Utc>,
    /// When the latest version was created.
    pub updated_at: DateTime<Utc>,
    /// The professor's rebuttal, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebuttal: Option<Rebuttal>,
    /// Full version history, oldest first.
    pub versions: Vec<ReviewVersion>,
    /// Comments visible to the requesting viewer.
    pub comments: Vec<Comment>,
}

/// The review and comment lifecycle engine.
pub struct Lectern {
    config: LecternConfig,
    catalog: Arc<dyn Catalog>,
    anonymizer: Anonymizer,
    store: ReviewStore,
}

impl Lectern {
    /// Create an engine with default configuration over a catalog.
    pub fn new(catalog: impl Catalog + 'static) -> Self {
        Self::with_config(catalog, LecternConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(catalog: impl Catalog + 'static, config: LecternConfig) -> Self {
        Self {
            config,
            catalog: Arc::new(catalog),
            anonymizer: Anonymizer::new(),
            store: ReviewStore::new(),
        }
    }

    /// Replace the anonymizer, e.g. with a fixed-secret one.
    pub fn with_anonymizer(mut self, anonymizer: Anonymizer) -> Self {
        self.anonymizer = anonymizer;
        self
    }

    /// Replace the store, e.g. with one loaded from a snapshot.
    pub fn with_store(mut self, store: ReviewStore) -> Self {
        self.store = store;
        self
    }

    /// The rating schema in effect.
    pub fn rating_schema(&self) -> &RatingSchema {
        &self.config.rating_schema
    }

    /// The underlying store, for snapshot save/load.
    pub fn store(&self) -> &ReviewStore {
        &self.store
    }

    /// The catalog collaborator, e.g. for resolving viewers.
    pub fn catalog(&self) -> &dyn Catalog {
        self.catalog.as_ref()
    }

    // =========================================================================
    // Reviews
    // =========================================================================

    /// Create a review of `professor` for `course`, authored by the viewer.
    ///
    /// Requires the author capability; the professor must exist and be
    /// assigned to the course.
    pub fn create_review(
        &self,
        viewer: &Viewer,
        professor: ProfessorId,
        course: CourseId,
        fields: ReviewFields,
    ) -> Result<ReviewView> {
        if !viewer.can_author_review() {
            return Err(LecternError::Forbidden(
                "Only reviewers may create reviews".to_string(),
            ));
        }
        if self.catalog.professor(professor).is_none() {
            return Err(LecternError::NotFound(format!(
                "Professor {} not found",
                professor
            )));
        }
        if !self.catalog.course_taught_by(professor, course) {
            return Err(LecternError::InvalidAssociation(format!(
                "Professor {} is not assigned to course {}",
                professor, course
            )));
        }

        let review = self.store.create(
            viewer.id,
            professor,
            course,
            fields,
            &self.config.rating_schema,
        )?;
        info!(review = %review.id, professor = %professor, "review created");
        Ok(self.project(viewer, review))
    }

    /// Append a new version to the viewer's own review.
    ///
    /// `expected_version` is the version the edit was based on; a stale
    /// value fails with `Conflict`.
    pub fn update_review(
        &self,
        viewer: &Viewer,
        review_id: ReviewId,
        expected_version: u32,
        fields: ReviewFields,
    ) -> Result<ReviewView> {
        let review = self.store.update(
            review_id,
            viewer.id,
            expected_version,
            fields,
            &self.config.rating_schema,
        )?;
        info!(review = %review_id, version = review.version(), "review updated");
        Ok(self.project(viewer, review))
    }

    /// Delete a review (author or moderator), cascading rebuttal and
    /// comments.
    pub fn delete_review(&self, viewer: &Viewer, review_id: ReviewId) -> Result<()> {
        self.store
            .delete(review_id, viewer.id, viewer.can_moderate())?;
        info!(review = %review_id, "review deleted");
        Ok(())
    }

    /// Get one review as seen by the viewer.
    pub fn review(&self, viewer: &Viewer, review_id: ReviewId) -> Result<ReviewView> {
        let review = self.store.get(review_id)?;
        Ok(self.project(viewer, review))
    }

    /// All reviews of a professor, creation order, as seen by the viewer.
    pub fn reviews_for_professor(
        &self,
        viewer: &Viewer,
        professor: ProfessorId,
    ) -> Result<Vec<ReviewView>> {
        if self.catalog.professor(professor).is_none() {
            return Err(LecternError::NotFound(format!(
                "Professor {} not found",
                professor
            )));
        }

        Ok(self
            .store
            .list_by_professor(professor)
            .into_iter()
            .map(|review| self.project(viewer, review))
            .collect())
    }

    /// The review listing for the viewer's dashboard: every review for a
    /// moderator, the viewer's own reviews for a reviewer.
    pub fn reviews(&self, viewer: &Viewer) -> Result<Vec<ReviewView>> {
        let reviews = if viewer.can_moderate() {
            self.store.list_all()
        } else if viewer.can_author_review() {
            self.store.list_by_reviewer(viewer.id)
        } else {
            return Err(LecternError::Forbidden(
                "Only administrators and reviewers may list reviews".to_string(),
            ));
        };

        Ok(reviews
            .into_iter()
            .map(|review| self.project(viewer, review))
            .collect())
    }

    /// A review's version history, oldest first.
    pub fn review_versions(&self, review_id: ReviewId) -> Result<Vec<ReviewVersion>> {
        self.store.list_versions(review_id)
    }

    // =========================================================================
    // Rebuttals
    // =========================================================================

    /// Submit (or replace) the professor's rebuttal to a review.
    ///
    /// Requires the viewer to represent the reviewed professor.
    pub fn submit_rebuttal(
        &self,
        viewer: &Viewer,
        review_id: ReviewId,
        content: impl Into<String>,
    ) -> Result<Rebuttal> {
        let rebuttal = self.store.submit_rebuttal(
            review_id,
            viewer.id,
            viewer.represented_professor(),
            content,
        )?;
        info!(review = %review_id, "rebuttal submitted");
        Ok(rebuttal)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Attach a comment to a review. Visibility defaults to public.
    pub fn add_comment(
        &self,
        viewer: &Viewer,
        review_id: ReviewId,
        content: impl Into<String>,
        visibility: Option<Visibility>,
    ) -> Result<Comment> {
        self.store.add_comment(
            review_id,
            viewer.id,
            viewer.display_name.clone(),
            content,
            visibility.unwrap_or_default(),
        )
    }

    /// Edit the viewer's own comment.
    pub fn edit_comment(
        &self,
        viewer: &Viewer,
        comment_id: CommentId,
        content: impl Into<String>,
    ) -> Result<Comment> {
        self.store.edit_comment(comment_id, viewer.id, content)
    }

    /// Delete the viewer's own comment.
    pub fn delete_comment(&self, viewer: &Viewer, comment_id: CommentId) -> Result<()> {
        self.store.delete_comment(comment_id, viewer.id)
    }

    /// The comments on a review the viewer may see, filtered per request.
    pub fn visible_comments(&self, viewer: &Viewer, review_id: ReviewId) -> Result<Vec<Comment>> {
        let review = self.store.get(review_id)?;
        Ok(review
            .comments
            .iter()
            .filter(|comment| visible_to(comment, viewer, review.professor))
            .cloned()
            .collect())
    }

    // =========================================================================
    // Aggregation & identity
    // =========================================================================

    /// Professor-level rating summary over latest review versions.
    pub fn summarize(&self, professor: ProfessorId) -> Result<RatingSummary> {
        if self.catalog.professor(professor).is_none() {
            return Err(LecternError::NotFound(format!(
                "Professor {} not found",
                professor
            )));
        }
        Ok(self.store.summarize(professor, &self.config.rating_schema))
    }

    /// The pseudonym a reviewer carries within a professor's scope.
    ///
    /// Fails with `NotFound` when the reviewer is unknown to the catalog.
    pub fn anonymize(&self, reviewer: UserId, professor: ProfessorId) -> Result<String> {
        if !self.catalog.reviewer_exists(reviewer) {
            return Err(LecternError::NotFound(format!(
                "Reviewer {} has no known identity",
                reviewer
            )));
        }
        Ok(self.anonymizer.pseudonym(reviewer, professor))
    }

    /// Resolve a pseudonym back to a reviewer id.
    ///
    /// Moderators may resolve any pseudonym; a reviewer may resolve
    /// their own. Everyone else gets `Forbidden` whether or not the
    /// pseudonym was ever issued, so refusal reveals nothing.
    pub fn resolve_pseudonym(&self, viewer: &Viewer, pseudonym: &str) -> Result<UserId> {
        let resolved = self.anonymizer.resolve(pseudonym);
        if viewer.can_moderate() {
            return resolved;
        }

        match resolved {
            Ok(reviewer) if reviewer == viewer.id => Ok(reviewer),
            _ => Err(LecternError::Forbidden(
                "Pseudonyms are only resolvable by administrators or their owner".to_string(),
            )),
        }
    }

    // Project a stored review into what the viewer may see.
    fn project(&self, viewer: &Viewer, review: Review) -> ReviewView {
        let pseudonym = self.anonymizer.pseudonym(review.reviewer, review.professor);
        let latest = review.latest().clone();
        let comments = review
            .comments
            .iter()
            .filter(|comment| visible_to(comment, viewer, review.professor))
            .cloned()
            .collect();

        ReviewView {
            id: review.id,
            professor: review.professor,
            course: review.course,
            pseudonym,
            version: review.version(),
            ratings: latest.ratings,
            summary: latest.summary,
            strengths: latest.strengths,
            weaknesses: latest.weaknesses,
            created_at: review.created_at,
            updated_at: latest.created_at,
            rebuttal: review.rebuttal,
            versions: review.versions,
            comments,
        }
    }
}
