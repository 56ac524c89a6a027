//! Source records for the `cons`, `cons_email` and `chapter` extracts.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Constituent identifier (`cons_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(pub u64);

/// Constituent email identifier (`cons_email_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmailId(pub u64);

/// Subscription grouping identifier (`chapter_id`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChapterId(pub i64);

impl ChapterId {
    /// The chapter the reference extracts are reported against.
    pub const DEFAULT: ChapterId = ChapterId(1);
}

impl Default for ChapterId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EmailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One constituent (`cons` row).
///
/// `created_at` and `modified_at` are taken as-is; either may be the earlier of
/// the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    /// Unique key.
    pub person_id: PersonId,
    /// Acquisition source code (`source`).
    pub source_code: String,
    /// `create_dt`, timezone-naive.
    pub created_at: NaiveDateTime,
    /// `modified_dt`, timezone-naive.
    pub modified_at: NaiveDateTime,
}

/// One email address of a constituent (`cons_email` row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailRecord {
    /// Owning constituent; a person may have several emails.
    pub person_id: PersonId,
    /// Unique key.
    pub email_id: EmailId,
    /// The address itself.
    pub address: String,
    /// Whether this is the person's main contact address.
    pub is_primary: bool,
}

/// Subscription state of one email in one chapter (`chapter` row).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRecord {
    /// Email this row belongs to; one email may have rows for several chapters.
    pub email_id: EmailId,
    /// Chapter the row applies to.
    pub chapter_id: ChapterId,
    /// `isunsub`.
    pub is_unsubscribed: bool,
}
