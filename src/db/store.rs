//! The transaction store: the single owner of the persisted transactions.

use std::path::Path;

use rusqlite::Connection;

use crate::db::{connection, repository};
use crate::error::TransactionError;
use crate::models::transaction::{Transaction, TransactionDraft, validate_amount};

/// Creates, reads, updates and deletes transactions in a SQLite database.
///
/// Construct one in `main` and hand it to whatever presents the data. Every
/// method runs a single SQL statement, so a failed call never leaves a partial
/// write behind.
pub struct TransactionStore {
    conn: Connection,
}

impl TransactionStore {
    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TransactionError> {
        let path = path.as_ref();
        tracing::debug!("opening transaction database at {}", path.display());
        Ok(Self {
            conn: connection::establish_connection(path)?,
        })
    }

    /// A store that lives only as long as the returned value.
    pub fn open_in_memory() -> Result<Self, TransactionError> {
        Ok(Self {
            conn: connection::establish_in_memory_connection()?,
        })
    }

    /// Insert a new transaction and return the ID assigned to it.
    pub fn add(&self, draft: &TransactionDraft) -> Result<i64, TransactionError> {
        validate(draft)?;
        let id = repository::insert_transaction(&self.conn, draft)?;
        tracing::info!(id, kind = %draft.transaction_type, amount = %draft.amount, "added transaction");
        Ok(id)
    }

    /// Replace every field of transaction `id` except the ID itself.
    ///
    /// # Errors
    /// - [TransactionError::Validation] if the amount is negative or above
    ///   [MAX_AMOUNT](crate::models::transaction::MAX_AMOUNT),
    /// - [TransactionError::NotFound] if `id` does not exist.
    pub fn update(&self, id: i64, draft: &TransactionDraft) -> Result<(), TransactionError> {
        validate(draft)?;
        repository::update_transaction(&self.conn, id, draft)?;
        tracing::info!(id, kind = %draft.transaction_type, amount = %draft.amount, "updated transaction");
        Ok(())
    }

    /// Permanently remove transaction `id`.
    pub fn delete(&self, id: i64) -> Result<(), TransactionError> {
        repository::remove_transaction(&self.conn, id)?;
        tracing::info!(id, "deleted transaction");
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Transaction, TransactionError> {
        repository::get_transaction(&self.conn, id)
    }

    /// All transactions in ascending ID order.
    pub fn list_all(&self) -> Result<Vec<Transaction>, TransactionError> {
        let transactions = repository::get_all_transactions(&self.conn)?;
        tracing::debug!("loaded {} transactions", transactions.len());
        Ok(transactions)
    }
}

fn validate(draft: &TransactionDraft) -> Result<(), TransactionError> {
    validate_amount(draft.amount)
        .map(|_| ())
        .inspect_err(|e| tracing::warn!(amount = %draft.amount, "rejected amount: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::transaction::{MAX_AMOUNT, TransactionType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date(day: u32, month: u32, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn draft(transaction_type: TransactionType, amount: i64, description: &str) -> TransactionDraft {
        TransactionDraft::new(transaction_type, Decimal::new(amount, 0), date(1, 1, 2024), description)
    }

    #[test]
    fn test_add_then_list_contains_new_record() {
        let store = TransactionStore::open_in_memory().unwrap();
        store.add(&draft(TransactionType::Expense, 20, "Lunch")).unwrap();

        let new = TransactionDraft::new(
            TransactionType::Income,
            Decimal::new(150075, 2),
            date(15, 3, 2024),
            "Salary",
        );
        let id = store.add(&new).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 2);
        let matching: Vec<_> = all.iter().filter(|t| t.id == id).collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(*matching[0], Transaction::new(id, new));
    }

    #[test]
    fn test_add_negative_amount_is_rejected() {
        let store = TransactionStore::open_in_memory().unwrap();

        let result = store.add(&draft(TransactionType::Expense, -5, "Refund"));

        assert!(matches!(result, Err(TransactionError::Validation(_))));
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_add_zero_amount_is_allowed() {
        let store = TransactionStore::open_in_memory().unwrap();
        assert!(store.add(&draft(TransactionType::Income, 0, "")).is_ok());
    }

    #[test]
    fn test_largest_amount_can_be_listed_again() {
        let store = TransactionStore::open_in_memory().unwrap();
        let largest = TransactionDraft::new(TransactionType::Income, MAX_AMOUNT, date(1, 1, 2024), "Windfall");

        let id = store.add(&largest).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all, vec![Transaction::new(id, largest)]);
    }

    #[test]
    fn test_amount_above_limit_is_rejected() {
        let store = TransactionStore::open_in_memory().unwrap();
        let id = store.add(&draft(TransactionType::Income, 10, "Gift")).unwrap();
        let huge = TransactionDraft::new(
            TransactionType::Income,
            Decimal::MAX,
            date(1, 1, 2024),
            "Overflow",
        );

        assert!(matches!(store.add(&huge), Err(TransactionError::Validation(_))));
        assert!(matches!(store.update(id, &huge), Err(TransactionError::Validation(_))));

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, Decimal::new(10, 0));
    }

    #[test]
    fn test_update_replaces_fields_and_keeps_others() {
        let store = TransactionStore::open_in_memory().unwrap();
        let keep = store.add(&draft(TransactionType::Income, 1000, "Salary")).unwrap();
        let change = store.add(&draft(TransactionType::Expense, 40, "Groceries")).unwrap();
        let before = store.get(keep).unwrap();

        let replacement =
            TransactionDraft::new(TransactionType::Income, Decimal::new(55, 0), date(2, 2, 2024), "Refund");
        store.update(change, &replacement).unwrap();

        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], before);
        assert_eq!(all[1], Transaction::new(change, replacement));
    }

    #[test]
    fn test_update_missing_id_leaves_store_unchanged() {
        let store = TransactionStore::open_in_memory().unwrap();
        store.add(&draft(TransactionType::Income, 10, "Gift")).unwrap();
        let before = store.list_all().unwrap();

        let result = store.update(999, &draft(TransactionType::Expense, 1, "Nothing"));

        assert!(matches!(result, Err(TransactionError::NotFound(999))));
        assert_eq!(store.list_all().unwrap(), before);
    }

    #[test]
    fn test_update_negative_amount_is_rejected() {
        let store = TransactionStore::open_in_memory().unwrap();
        let id = store.add(&draft(TransactionType::Income, 10, "Gift")).unwrap();

        let result = store.update(id, &draft(TransactionType::Income, -10, "Gift"));

        assert!(matches!(result, Err(TransactionError::Validation(_))));
        assert_eq!(store.get(id).unwrap().amount, Decimal::new(10, 0));
    }

    #[test]
    fn test_delete_removes_only_that_record() {
        let store = TransactionStore::open_in_memory().unwrap();
        let first = store.add(&draft(TransactionType::Income, 10, "a")).unwrap();
        let second = store.add(&draft(TransactionType::Expense, 5, "b")).unwrap();

        store.delete(first).unwrap();

        let ids: Vec<i64> = store.list_all().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![second]);
    }

    #[test]
    fn test_second_delete_is_not_found() {
        let store = TransactionStore::open_in_memory().unwrap();
        let id = store.add(&draft(TransactionType::Income, 10, "a")).unwrap();

        store.delete(id).unwrap();
        let result = store.delete(id);

        assert!(matches!(result, Err(TransactionError::NotFound(_))));
    }

    #[test]
    fn test_deleted_ids_are_not_reused() {
        let store = TransactionStore::open_in_memory().unwrap();
        let first = store.add(&draft(TransactionType::Income, 10, "a")).unwrap();
        store.delete(first).unwrap();

        let second = store.add(&draft(TransactionType::Income, 10, "b")).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_data_survives_reopening_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("finance.db");

        let id = {
            let store = TransactionStore::open(&path).unwrap();
            store.add(&draft(TransactionType::Expense, 400, "Rent")).unwrap()
        };

        let store = TransactionStore::open(&path).unwrap();
        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].description, "Rent");
    }
}
