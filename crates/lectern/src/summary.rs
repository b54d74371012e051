//! Professor-level rating summaries.

use serde::{Deserialize, Serialize};

/// Aggregate rating for one professor, computed over the latest version
/// of every non-deleted review referencing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Mean of the schema's primary dimension. `0.0` with no reviews.
    pub average_rating: f64,
    /// Number of reviews included in the mean.
    pub review_count: usize,
}

impl RatingSummary {
    /// Summary for a professor with no reviews.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compute a summary from primary-dimension values.
    pub fn from_values(values: &[u8]) -> Self {
        if values.is_empty() {
            return Self::empty();
        }

        let total: u32 = values.iter().map(|&v| u32::from(v)).sum();
        Self {
            average_rating: f64::from(total) / values.len() as f64,
            review_count: values.len(),
        }
    }
}
