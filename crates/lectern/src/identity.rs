//! Identity anonymizer.
//!
//! Reviewers appear to professors and to other reviewers only as stable
//! pseudonyms. A pseudonym is derived from a process-local secret and the
//! (reviewer, professor) pair, so the same reviewer looks consistent
//! across one professor's reviews but cannot be correlated across
//! professors. The reverse mapping is retained as a side channel for
//! administrators and for the reviewer themself; nothing handed to other
//! roles allows inversion.

use std::collections::HashMap;
use std::sync::RwLock;

use sha2::{Digest, Sha256};

use crate::error::{LecternError, Result};
use crate::ids::{ProfessorId, UserId};

/// Number of digest bytes kept in a pseudonym (16 hex characters).
const PSEUDONYM_BYTES: usize = 8;

/// Derives and resolves reviewer pseudonyms.
pub struct Anonymizer {
    secret: [u8; 16],
    issued: RwLock<HashMap<String, UserId>>,
}

impl Anonymizer {
    /// Create an anonymizer with a fresh random secret.
    ///
    /// Pseudonyms are stable for the lifetime of the process.
    pub fn new() -> Self {
        let mut secret = [0u8; 16];
        for byte in &mut secret {
            *byte = fastrand::u8(..);
        }
        Self::with_secret(secret)
    }

    /// Create an anonymizer with a fixed secret.
    ///
    /// Deployments that need pseudonyms stable across restarts supply
    /// the same secret on every start.
    pub fn with_secret(secret: [u8; 16]) -> Self {
        Self {
            secret,
            issued: RwLock::new(HashMap::new()),
        }
    }

    /// Derive the pseudonym for a reviewer within a professor's scope.
    ///
    /// Deterministic: the same pair always yields the same label. The
    /// issued pseudonym is recorded for later [`resolve`](Self::resolve).
    pub fn pseudonym(&self, reviewer: UserId, scope: ProfessorId) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret);
        hasher.update(reviewer.0.to_le_bytes());
        hasher.update(scope.0.to_le_bytes());
        let digest = hasher.finalize();

        let mut label = String::with_capacity(5 + PSEUDONYM_BYTES * 2);
        label.push_str("anon-");
        for byte in &digest[..PSEUDONYM_BYTES] {
            label.push_str(&format!("{:02x}", byte));
        }

        self.issued.write().unwrap().insert(label.clone(), reviewer);
        label
    }

    /// Resolve a previously issued pseudonym back to the reviewer.
    ///
    /// This is the privileged side channel; callers must gate it to
    /// administrators or to the reviewer themself.
    pub fn resolve(&self, pseudonym: &str) -> Result<UserId> {
        self.issued
            .read()
            .unwrap()
            .get(pseudonym)
            .copied()
            .ok_or_else(|| LecternError::NotFound(format!("Pseudonym '{}' not issued", pseudonym)))
    }
}

impl Default for Anonymizer {
    fn default() -> Self {
        Self::new()
    }
}
