//! Visibility scopes and the per-request filtering policy.

use serde::{Deserialize, Serialize};

use crate::auth::Viewer;
use crate::ids::ProfessorId;

use super::Comment;

/// Audience tier of a comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Visible to any authenticated viewer.
    #[default]
    Public,
    /// Visible to reviewers and admins.
    ReviewerOnly,
    /// Visible to the reviewed professor's account and admins.
    ProfessorOnly,
    /// Visible to admins only.
    AdminOnly,
}

impl Visibility {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::ReviewerOnly => "Reviewer only",
            Visibility::ProfessorOnly => "Professor only",
            Visibility::AdminOnly => "Admin only",
        }
    }
}

/// Whether a viewer may see a comment on a review of `professor`.
///
/// The author of a comment always sees it, regardless of scope. This is
/// evaluated fresh on every request; nothing here is cached.
pub fn visible_to(comment: &Comment, viewer: &Viewer, professor: ProfessorId) -> bool {
    if comment.author == viewer.id {
        return true;
    }

    match comment.visibility {
        Visibility::Public => true,
        Visibility::ReviewerOnly => viewer.can_author_review() || viewer.can_moderate(),
        Visibility::ProfessorOnly => viewer.represents(professor) || viewer.can_moderate(),
        Visibility::AdminOnly => viewer.can_moderate(),
    }
}
