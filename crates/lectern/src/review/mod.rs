//! Reviews: version chains, rebuttals, rating schemas, and the store.

pub mod rating;

mod persistence;
mod store;
mod types;

pub use persistence::SNAPSHOT_VERSION;
pub use rating::{RATING_MAX, RATING_MIN, RatingSchema, Ratings};
pub use store::ReviewStore;
pub use types::{Rebuttal, Review, ReviewFields, ReviewVersion};
