//! Newtype identifiers for the entities the engine touches.
//!
//! Professors and courses are owned by the catalog collaborator and
//! referenced by id only; reviews and comments are allocated by the
//! [`ReviewStore`](crate::review::ReviewStore).

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

id_type!(
    /// Account identifier issued by the (external) authentication collaborator.
    UserId
);
id_type!(
    /// Professor identifier owned by the catalog collaborator.
    ProfessorId
);
id_type!(
    /// Course identifier owned by the catalog collaborator.
    CourseId
);
id_type!(
    /// Review identifier allocated by the review store.
    ReviewId
);
id_type!(
    /// Comment identifier allocated by the review store.
    CommentId
);
