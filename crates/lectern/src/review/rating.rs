//! Configurable rating schemas.
//!
//! Deployments differ on what a review scores: a single overall rating,
//! or a named set of dimensions. The schema is configuration, not a code
//! path; the store validates submissions against it and the aggregation
//! engine averages its primary dimension.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{LecternError, Result};

/// Lowest accepted rating value.
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating value.
pub const RATING_MAX: u8 = 5;

/// Submitted rating values, keyed by dimension name in schema order.
pub type Ratings = IndexMap<String, u8>;

/// The rating dimensions a deployment collects, plus the dimension the
/// professor-level average is computed over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingSchema {
    /// Dimension names, in display order.
    pub dimensions: Vec<String>,
    /// Dimension the aggregation engine averages.
    pub primary: String,
}

impl RatingSchema {
    /// Single-dimension schema: one `overall` rating.
    pub fn overall() -> Self {
        Self {
            dimensions: vec!["overall".to_string()],
            primary: "overall".to_string(),
        }
    }

    /// Five-dimension course feedback schema.
    ///
    /// Averages `clarity` unless overridden with
    /// [`with_primary`](Self::with_primary).
    pub fn course_feedback() -> Self {
        Self {
            dimensions: ["fairness", "clarity", "engagement", "workload", "confidence"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            primary: "clarity".to_string(),
        }
    }

    /// Override the primary (averaged) dimension.
    pub fn with_primary(mut self, dimension: impl Into<String>) -> Self {
        self.primary = dimension.into();
        self
    }

    /// Validate submitted ratings against this schema.
    ///
    /// Every schema dimension must be present, no extra dimensions are
    /// accepted, and every value must lie in 1..=5.
    pub fn validate(&self, ratings: &Ratings) -> Result<()> {
        for dimension in &self.dimensions {
            match ratings.get(dimension) {
                None => {
                    return Err(LecternError::Validation(format!(
                        "Missing rating dimension '{}'",
                        dimension
                    )));
                }
                Some(&value) if !(RATING_MIN..=RATING_MAX).contains(&value) => {
                    return Err(LecternError::Validation(format!(
                        "Rating '{}' is {} but must be between {} and {}",
                        dimension, value, RATING_MIN, RATING_MAX
                    )));
                }
                Some(_) => {}
            }
        }

        if let Some(extra) = ratings.keys().find(|k| !self.dimensions.contains(k)) {
            return Err(LecternError::Validation(format!(
                "Unknown rating dimension '{}'",
                extra
            )));
        }

        Ok(())
    }

    /// The primary-dimension value of a validated rating set.
    pub fn primary_value(&self, ratings: &Ratings) -> Option<u8> {
        ratings.get(&self.primary).copied()
    }
}

impl Default for RatingSchema {
    fn default() -> Self {
        Self::overall()
    }
}
