//! Catalog collaborator interface.
//!
//! Professors, courses, and their assignments are owned by an external
//! catalog component. The engine only needs the narrow lookup surface
//! captured by the [`Catalog`] trait; [`InMemoryCatalog`] is a complete
//! in-process implementation for tests and embedders that do not bring
//! their own.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::ids::{CourseId, ProfessorId, UserId};

/// A professor as seen through the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfessorRecord {
    /// Catalog identifier.
    pub id: ProfessorId,
    /// Display name.
    pub name: String,
    /// Department the professor belongs to.
    pub department: String,
    /// Linked account, if the professor can log in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<UserId>,
    /// Courses the professor teaches.
    #[serde(default)]
    pub courses: Vec<CourseId>,
}

/// Lookup capability supplied by the catalog collaborator.
pub trait Catalog: Send + Sync {
    /// Whether the professor is assigned to teach the course.
    fn course_taught_by(&self, professor: ProfessorId, course: CourseId) -> bool;

    /// Look up a professor record.
    fn professor(&self, id: ProfessorId) -> Option<ProfessorRecord>;

    /// The professor linked to an account, if any.
    fn professor_for_account(&self, account: UserId) -> Option<ProfessorId>;

    /// Whether the reviewer account is known.
    fn reviewer_exists(&self, id: UserId) -> bool;
}

/// In-memory catalog backed by plain maps.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    professors: RwLock<HashMap<ProfessorId, ProfessorRecord>>,
    reviewers: RwLock<HashSet<UserId>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a professor record.
    pub fn add_professor(&self, record: ProfessorRecord) {
        self.professors.write().unwrap().insert(record.id, record);
    }

    /// Register a reviewer account.
    pub fn add_reviewer(&self, id: UserId) {
        self.reviewers.write().unwrap().insert(id);
    }

    /// Replace a professor's course assignments.
    ///
    /// Returns `false` when the professor is unknown.
    pub fn assign_courses(&self, professor: ProfessorId, courses: Vec<CourseId>) -> bool {
        match self.professors.write().unwrap().get_mut(&professor) {
            Some(record) => {
                record.courses = courses;
                true
            }
            None => false,
        }
    }
}

impl Catalog for InMemoryCatalog {
    fn course_taught_by(&self, professor: ProfessorId, course: CourseId) -> bool {
        self.professors
            .read()
            .unwrap()
            .get(&professor)
            .is_some_and(|record| record.courses.contains(&course))
    }

    fn professor(&self, id: ProfessorId) -> Option<ProfessorRecord> {
        self.professors.read().unwrap().get(&id).cloned()
    }

    fn professor_for_account(&self, account: UserId) -> Option<ProfessorId> {
        self.professors
            .read()
            .unwrap()
            .values()
            .find(|record| record.account == Some(account))
            .map(|record| record.id)
    }

    fn reviewer_exists(&self, id: UserId) -> bool {
        self.reviewers.read().unwrap().contains(&id)
    }
}
