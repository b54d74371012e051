//! Review aggregate types: version chains, rebuttals, and the fields a
//! reviewer submits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::comment::Comment;
use crate::ids::{CourseId, ProfessorId, ReviewId, UserId};
use crate::review::rating::Ratings;

/// The editable fields of a review, as submitted on create or update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewFields {
    /// Rating values, one per schema dimension.
    pub ratings: Ratings,
    /// Required free-text summary.
    pub summary: String,
    /// Optional free-text strengths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strengths: Option<String>,
    /// Optional free-text weaknesses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weaknesses: Option<String>,
}

impl ReviewFields {
    /// Create fields with a summary and ratings; free-text extras via
    /// the `with_*` builders.
    pub fn new(ratings: Ratings, summary: impl Into<String>) -> Self {
        Self {
            ratings,
            summary: summary.into(),
            strengths: None,
            weaknesses: None,
        }
    }

    /// Set the strengths text.
    pub fn with_strengths(mut self, text: impl Into<String>) -> Self {
        self.strengths = Some(text.into());
        self
    }

    /// Set the weaknesses text.
    pub fn with_weaknesses(mut self, text: impl Into<String>) -> Self {
        self.weaknesses = Some(text.into());
        self
    }
}

/// An immutable snapshot of a review's fields at one point in its edit
/// history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewVersion {
    /// 1-based version number, strictly increasing per review.
    pub version: u32,
    /// Rating values at this version.
    pub ratings: Ratings,
    /// Summary text at this version.
    pub summary: String,
    /// Strengths text at this version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strengths: Option<String>,
    /// Weaknesses text at this version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weaknesses: Option<String>,
    /// When this version was created.
    pub created_at: DateTime<Utc>,
}

impl ReviewVersion {
    /// Snapshot submitted fields as the given version number.
    pub fn from_fields(version: u32, fields: ReviewFields) -> Self {
        Self {
            version,
            ratings: fields.ratings,
            summary: fields.summary,
            strengths: fields.strengths,
            weaknesses: fields.weaknesses,
            created_at: Utc::now(),
        }
    }
}

/// The reviewed professor's single response to a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rebuttal {
    /// Account of the professor who wrote the rebuttal.
    pub author: UserId,
    /// Rebuttal text.
    pub content: String,
    /// When the rebuttal was (last) submitted.
    pub created_at: DateTime<Utc>,
}

/// A reviewer's evaluation of a professor for one course, with its full
/// edit history, optional rebuttal, and comment thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// Store identifier.
    pub id: ReviewId,
    /// Reviewed professor.
    pub professor: ProfessorId,
    /// Course the evaluation concerns.
    pub course: CourseId,
    /// Author, fixed at creation.
    pub reviewer: UserId,
    /// When the review was first created. Edits never change this.
    pub created_at: DateTime<Utc>,
    /// Append-only version chain, oldest first. Never empty.
    pub versions: Vec<ReviewVersion>,
    /// The professor's rebuttal, if one was submitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebuttal: Option<Rebuttal>,
    /// Comment thread, in creation order.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Review {
    /// Current version number. Always equals the chain length.
    pub fn version(&self) -> u32 {
        self.versions.len() as u32
    }

    /// The latest version snapshot, whose fields the review displays.
    pub fn latest(&self) -> &ReviewVersion {
        // The chain is created with version 1 and is append-only.
        self.versions
            .last()
            .expect("review version chain is never empty")
    }
}
