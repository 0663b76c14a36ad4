//! Transaction domain entity.
//! Framework-agnostic representation of a bookkeeping transaction under review.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::Status;

/// Domain entity representing a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub last_updated: DateTime<Utc>,
    pub date: DateTime<Utc>,
    pub description: String,
    pub vendor: Option<String>,
    pub category: Option<String>,
    pub spent_cents: i64,
    pub received_cents: i64,
    pub status: Status,
    pub comments: Vec<String>,
}

impl Transaction {
    /// A freshly ingested transaction, always in `AutoCategorized`.
    pub fn new(
        id: impl Into<String>,
        date: DateTime<Utc>,
        description: impl Into<String>,
        spent_cents: i64,
        received_cents: i64,
    ) -> Self {
        Self {
            id: id.into(),
            last_updated: Utc::now(),
            date,
            description: description.into(),
            vendor: None,
            category: None,
            spent_cents,
            received_cents,
            status: Status::AutoCategorized,
            comments: Vec::new(),
        }
    }

    /// Applies the writable fields of `update` and bumps `last_updated`.
    pub fn apply(&mut self, update: &TransactionUpdate, now: DateTime<Utc>) {
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(vendor) = &update.vendor {
            self.vendor = Some(vendor.clone());
        }
        if let Some(category) = &update.category {
            self.category = Some(category.clone());
        }
        self.last_updated = next_timestamp(self.last_updated, now);
    }
}

/// The only fields a mutation may write. `None` leaves a field untouched;
/// `Some(String::new())` stores an empty label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionUpdate {
    pub status: Option<Status>,
    pub vendor: Option<String>,
    pub category: Option<String>,
}

impl TransactionUpdate {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn vendor(vendor: impl Into<String>) -> Self {
        Self {
            vendor: Some(vendor.into()),
            ..Self::default()
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn with_vendor(mut self, vendor: Option<String>) -> Self {
        if vendor.is_some() {
            self.vendor = vendor;
        }
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        if category.is_some() {
            self.category = category;
        }
        self
    }
}

/// Wall-clock time, nudged forward so a record's timestamp never repeats.
pub fn next_timestamp(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + Duration::microseconds(1);
    if now > floor {
        now
    } else {
        floor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Transaction {
        Transaction::new(
            "t1",
            Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap(),
            "COFFEE SHOP 123",
            450,
            0,
        )
    }

    #[test]
    fn test_new_transaction_is_auto_categorized() {
        let tx = sample();
        assert_eq!(tx.status, Status::AutoCategorized);
        assert!(tx.vendor.is_none());
        assert!(tx.comments.is_empty());
    }

    #[test]
    fn test_apply_leaves_unset_fields_alone() {
        let mut tx = sample();
        tx.vendor = Some("Acme".to_string());
        let before = tx.last_updated;

        tx.apply(&TransactionUpdate::category("Sales"), before);

        assert_eq!(tx.vendor.as_deref(), Some("Acme"));
        assert_eq!(tx.category.as_deref(), Some("Sales"));
        assert_eq!(tx.status, Status::AutoCategorized);
        assert!(tx.last_updated > before);
    }

    #[test]
    fn test_apply_writes_explicit_empty_label() {
        let mut tx = sample();
        tx.vendor = Some("Acme".to_string());
        tx.apply(&TransactionUpdate::vendor(""), Utc::now());
        assert_eq!(tx.vendor.as_deref(), Some(""));
    }

    #[test]
    fn test_with_vendor_none_keeps_builder_value() {
        let update = TransactionUpdate::status(Status::Approved)
            .with_vendor(None)
            .with_category(Some("Sales".to_string()));
        assert_eq!(update.vendor, None);
        assert_eq!(update.category.as_deref(), Some("Sales"));
    }

    #[test]
    fn test_next_timestamp_is_strictly_increasing() {
        let previous = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert!(next_timestamp(previous, previous) > previous);
        assert!(next_timestamp(previous, previous - Duration::seconds(5)) > previous);

        let later = previous + Duration::seconds(1);
        assert_eq!(next_timestamp(previous, later), later);
    }
}
