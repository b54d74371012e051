//! Lectern: anonymized, versioned review and comment lifecycle engine
//! for professor/course evaluations.
//!
//! Reviewers submit evaluations, professors respond with a single
//! rebuttal per review, and participants attach visibility-scoped
//! comments - while every edit of a review is retained as an immutable
//! version snapshot and reviewer identities are only ever exposed as
//! stable pseudonyms.
//!
//! # Core principles
//!
//! - **Append-only history**: editing a review appends a version; prior
//!   versions never change.
//! - **Capability-checked access**: every operation authorizes against
//!   an explicit capability set, not role strings.
//! - **Anonymity by default**: raw reviewer ids leave the engine only
//!   through the administrator/self resolution side channel.
//!
//! # Example
//!
//! ```
//! use lectern::{
//!     InMemoryCatalog, Lectern, ProfessorRecord, ReviewFields, Role, Viewer,
//! };
//! use lectern::ids::{CourseId, ProfessorId, UserId};
//!
//! let catalog = InMemoryCatalog::new();
//! catalog.add_professor(ProfessorRecord {
//!     id: ProfessorId(1),
//!     name: "Ada Lovelace".to_string(),
//!     department: "Mathematics".to_string(),
//!     account: Some(UserId(10)),
//!     courses: vec![CourseId(100)],
//! });
//! catalog.add_reviewer(UserId(2));
//!
//! let engine = Lectern::new(catalog);
//! let reviewer = Viewer::resolve(UserId(2), "Sam", Role::Reviewer, engine.catalog());
//!
//! let ratings = [("overall".to_string(), 5)].into_iter().collect();
//! let view = engine
//!     .create_review(
//!         &reviewer,
//!         ProfessorId(1),
//!         CourseId(100),
//!         ReviewFields::new(ratings, "Excellent course"),
//!     )
//!     .unwrap();
//!
//! assert_eq!(view.version, 1);
//! assert!(view.pseudonym.starts_with("anon-"));
//! ```

pub mod auth;
pub mod catalog;
pub mod comment;
pub mod error;
pub mod identity;
pub mod ids;
pub mod review;
pub mod summary;

mod engine;

pub use crate::engine::{Lectern, LecternConfig, ReviewView};
pub use auth::{Capability, Role, Viewer};
pub use catalog::{Catalog, InMemoryCatalog, ProfessorRecord};
pub use comment::{Comment, Visibility};
pub use error::{LecternError, Result};
pub use identity::Anonymizer;
pub use review::{RatingSchema, Ratings, Rebuttal, Review, ReviewFields, ReviewStore, ReviewVersion};
pub use summary::RatingSummary;
