//! Lease record.
//!
//! A lease is a time-bounded exclusive claim on a stored entity. It is never
//! released explicitly: the owner clears it by saving the entity, otherwise
//! it expires once `now > acquired_at + duration_ms`.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lease {
    /// Opaque worker identity holding the claim.
    pub owner: String,
    /// When the claim was taken.
    pub acquired_at: Timestamp,
    /// Claim length in milliseconds.
    pub duration_ms: u64,
}

impl Lease {
    pub fn new(owner: impl Into<String>, acquired_at: Timestamp, duration_ms: u64) -> Self {
        Self {
            owner: owner.into(),
            acquired_at,
            duration_ms,
        }
    }

    pub fn expires_at(&self) -> Timestamp {
        self.acquired_at.saturating_add(self.duration_ms)
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at()
    }

    pub fn is_held_by(&self, owner: &str) -> bool {
        self.owner == owner
    }

    /// Live and owned by someone other than `owner`.
    pub fn blocks(&self, owner: &str, now: Timestamp) -> bool {
        !self.is_expired(now) && !self.is_held_by(owner)
    }
}
