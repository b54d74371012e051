//! Snapshot persistence for the review store - save/load JSON files.
//!
//! The engine itself is storage-agnostic; this layer exists so an
//! embedder without a database can keep review state across restarts.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LecternError, Result};
use crate::review::types::Review;

use super::store::ReviewStore;

/// Current version of the snapshot format.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// On-disk shape of a store snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct StoreSnapshot {
    snapshot_version: String,
    reviews: Vec<Review>,
}

impl ReviewStore {
    /// Save the store to a JSON snapshot file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use lectern::review::ReviewStore;
    /// # fn example(store: &ReviewStore) -> lectern::Result<()> {
    /// store.save("reviews.snapshot.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    LecternError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            LecternError::Persistence(format!("Failed to create file '{}': {}", path.display(), e))
        })?;

        let snapshot = StoreSnapshot {
            snapshot_version: SNAPSHOT_VERSION.to_string(),
            reviews: self.snapshot(),
        };

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &snapshot)
            .map_err(|e| LecternError::Persistence(format!("Failed to serialize store: {}", e)))?;

        Ok(())
    }

    /// Load a store from a JSON snapshot file.
    ///
    /// Review and comment id counters resume above the highest
    /// persisted id, so new entities never collide with loaded ones.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            LecternError::Persistence(format!("Failed to open file '{}': {}", path.display(), e))
        })?;

        let reader = BufReader::new(file);
        let snapshot: StoreSnapshot = serde_json::from_reader(reader).map_err(|e| {
            LecternError::Persistence(format!(
                "Failed to parse snapshot '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(Self::from_reviews(snapshot.reviews))
    }
}
