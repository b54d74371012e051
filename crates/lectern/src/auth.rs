//! Viewer roles and capability sets.
//!
//! The engine never branches on raw role strings. Each request carries a
//! [`Viewer`] whose capability set was derived exactly once, at
//! construction, from the authenticated role and the catalog's
//! professor-account linkage. Operations check capabilities at their
//! boundary.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::ids::{ProfessorId, UserId};

/// Authenticated role of a viewer, as resolved by the (external)
/// authentication collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Course reviewer (review author).
    Reviewer,
    /// Professor account.
    Professor,
}

impl Role {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Reviewer => "Reviewer",
            Role::Professor => "Professor",
        }
    }
}

/// A single permission a viewer may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// May see everything, delete any review, and resolve pseudonyms.
    CanModerate,
    /// May author and edit their own reviews.
    CanAuthorReview,
    /// May act on behalf of the given professor (rebuttals,
    /// professor-scoped comment visibility).
    CanRepresentProfessor(ProfessorId),
}

/// An authenticated viewer plus their derived capability set.
#[derive(Debug, Clone)]
pub struct Viewer {
    /// Account identifier.
    pub id: UserId,
    /// Display name, used when the viewer authors comments.
    pub display_name: String,
    /// Authenticated role.
    pub role: Role,
    capabilities: HashSet<Capability>,
}

impl Viewer {
    /// Resolve a viewer's capability set from their role.
    ///
    /// A professor account only gains [`Capability::CanRepresentProfessor`]
    /// when the catalog links it to a professor record.
    pub fn resolve(
        id: UserId,
        display_name: impl Into<String>,
        role: Role,
        catalog: &dyn Catalog,
    ) -> Self {
        let mut capabilities = HashSet::new();
        match role {
            Role::Admin => {
                capabilities.insert(Capability::CanModerate);
            }
            Role::Reviewer => {
                capabilities.insert(Capability::CanAuthorReview);
            }
            Role::Professor => {
                if let Some(professor_id) = catalog.professor_for_account(id) {
                    capabilities.insert(Capability::CanRepresentProfessor(professor_id));
                }
            }
        }

        Self {
            id,
            display_name: display_name.into(),
            role,
            capabilities,
        }
    }

    /// Check whether the viewer holds a capability.
    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Check whether the viewer may moderate (admin).
    pub fn can_moderate(&self) -> bool {
        self.can(Capability::CanModerate)
    }

    /// Check whether the viewer may author reviews.
    pub fn can_author_review(&self) -> bool {
        self.can(Capability::CanAuthorReview)
    }

    /// Check whether the viewer represents the given professor.
    pub fn represents(&self, professor: ProfessorId) -> bool {
        self.can(Capability::CanRepresentProfessor(professor))
    }

    /// The professor this viewer represents, if any.
    pub fn represented_professor(&self) -> Option<ProfessorId> {
        self.capabilities.iter().find_map(|cap| match cap {
            Capability::CanRepresentProfessor(id) => Some(*id),
            _ => None,
        })
    }
}
