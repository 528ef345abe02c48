use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

pub type MemoId = i64;

/// A memo is one sales/invoice record in the ledger.
/// Memos are flat rows - there is no relationship between them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Memo {
    /// Assigned by the store at insertion, immutable afterwards
    pub id: MemoId,
    /// Calendar date of the sale, user-supplied (not the insertion time)
    pub date: NaiveDate,
    /// Who bought
    pub client_name: String,
    /// What was sold
    pub item_name: String,
    /// Number of units sold (always >= 1)
    pub item_count: i64,
    /// Unit price in cents
    pub item_price: Cents,
    /// Total in cents, supplied by the caller. The store never recomputes
    /// item_count * item_price on the caller's behalf.
    pub total_price: Cents,
    /// Amount received in cents
    pub paid: Cents,
    /// Outstanding amount in cents, supplied by the caller (same contract
    /// as total_price)
    pub due: Cents,
    /// Reference to an externally stored memo image, if any
    pub memo_image_url: Option<String>,
    /// Assigned once by the store at insertion. Default recency ordering key.
    pub created_at: DateTime<Utc>,
}

/// Fields for creating a memo. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMemo {
    pub date: NaiveDate,
    pub client_name: String,
    pub item_name: String,
    pub item_count: i64,
    pub item_price: Cents,
    pub total_price: Cents,
    pub paid: Cents,
    pub due: Cents,
    pub memo_image_url: Option<String>,
}

impl NewMemo {
    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.memo_image_url = Some(url.into());
        self
    }
}

/// Partial update for a memo. Only `Some` fields are applied; `None` fields
/// keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoPatch {
    pub date: Option<NaiveDate>,
    pub client_name: Option<String>,
    pub item_name: Option<String>,
    pub item_count: Option<i64>,
    pub item_price: Option<Cents>,
    pub total_price: Option<Cents>,
    pub paid: Option<Cents>,
    pub due: Option<Cents>,
    pub memo_image_url: Option<String>,
}

impl MemoPatch {
    /// Returns true when no field is supplied. Empty patches are rejected
    /// by the service rather than applied as no-ops.
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.client_name.is_none()
            && self.item_name.is_none()
            && self.item_count.is_none()
            && self.item_price.is_none()
            && self.total_price.is_none()
            && self.paid.is_none()
            && self.due.is_none()
            && self.memo_image_url.is_none()
    }
}

/// Sort order for ledger listings. Both keys sort descending (most recent
/// first); ascending order is not exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    Date,
}

impl SortKey {
    /// Column name in the memos table.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::CreatedAt => "created_at",
            SortKey::Date => "date",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "created_at" => Some(SortKey::CreatedAt),
            "date" => Some(SortKey::Date),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_patch() {
        assert!(MemoPatch::default().is_empty());
    }

    #[test]
    fn test_patch_with_one_field_is_not_empty() {
        let patch = MemoPatch {
            paid: Some(5000),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_sort_key_roundtrip() {
        for key in [SortKey::CreatedAt, SortKey::Date] {
            assert_eq!(SortKey::from_str(key.as_str()), Some(key));
        }
    }

    #[test]
    fn test_unknown_sort_key_defaults_to_created_at() {
        // Callers fall back to the default for unrecognized input
        let key = SortKey::from_str("client_name").unwrap_or_default();
        assert_eq!(key, SortKey::CreatedAt);
    }
}
