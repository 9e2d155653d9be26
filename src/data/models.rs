//! Data models
//!
//! Rust structs representing database entities. Record ids are 24-character
//! lowercase hex strings; timestamps use chrono.

use chrono::{DateTime, Utc};
use rand::RngCore;
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Todo record ID wrapper (24 lowercase hex characters)
///
/// Example: "652d729bb8da04810695a943"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Generate a new random record id (12 random bytes, hex-encoded)
    pub fn new() -> Self {
        let mut bytes = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Whether a path parameter is well-formed as a record id
    ///
    /// Ids that fail this check are treated the same as unknown ids,
    /// so the store is never queried for them.
    pub fn is_well_formed(candidate: &str) -> bool {
        candidate.len() == 24 && candidate.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Token cache
// =============================================================================

/// A cached bearer-token resolution
///
/// Keyed by the SHA-256 hash of the raw bearer token; the raw token is
/// never persisted. Entries are created on first successful resolution
/// and never updated or deleted by the core (no revocation path).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CachedToken {
    /// Lowercase hex SHA-256 of the raw bearer token
    pub access_token_hash: String,
    /// Resolved GitHub login
    pub user: String,
    /// When the token was first resolved
    pub created_date: DateTime<Utc>,
}

// =============================================================================
// Todos
// =============================================================================

/// Client-supplied todo fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// A persisted todo, always scoped to its owning user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TodoRecord {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub user: String,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_record_ids_are_well_formed() {
        for _ in 0..32 {
            let id = RecordId::new();
            assert!(RecordId::is_well_formed(&id.0), "bad id: {}", id.0);
        }
    }

    #[test]
    fn record_id_shape_check() {
        assert!(RecordId::is_well_formed("652d729bb8da04810695a943"));
        assert!(RecordId::is_well_formed("652D729BB8DA04810695A943"));
        assert!(!RecordId::is_well_formed("652d729bb8da04810695a94"));
        assert!(!RecordId::is_well_formed("652d729bb8da04810695a9431"));
        assert!(!RecordId::is_well_formed("652d729bb8da04810695a94z"));
        assert!(!RecordId::is_well_formed(""));
    }
}
