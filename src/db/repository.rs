use crate::error::TransactionError;
use crate::models::transaction::{DATE_FORMAT, Transaction, TransactionDraft, TransactionType};
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};

const SELECT_TRANSACTIONS: &str = "SELECT id, type, amount, date, description FROM transactions";

pub fn insert_transaction(
    conn: &Connection,
    draft: &TransactionDraft,
) -> Result<i64, TransactionError> {
    conn.execute(
        "INSERT INTO transactions (type, amount, date, description) VALUES (?1, ?2, ?3, ?4)",
        params![
            draft.transaction_type.as_str(),
            amount_to_real(&draft.amount)?,
            draft.date.format(DATE_FORMAT).to_string(),
            &draft.description,
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn update_transaction(
    conn: &Connection,
    id: i64,
    draft: &TransactionDraft,
) -> Result<(), TransactionError> {
    let rows_affected = conn.execute(
        "UPDATE transactions SET type = ?1, amount = ?2, date = ?3, description = ?4 WHERE id = ?5",
        params![
            draft.transaction_type.as_str(),
            amount_to_real(&draft.amount)?,
            draft.date.format(DATE_FORMAT).to_string(),
            &draft.description,
            id,
        ],
    )?;

    if rows_affected == 0 {
        return Err(TransactionError::NotFound(id));
    }

    Ok(())
}

pub fn remove_transaction(conn: &Connection, id: i64) -> Result<(), TransactionError> {
    let rows_affected = conn.execute("DELETE FROM transactions WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(TransactionError::NotFound(id));
    }

    Ok(())
}

pub fn get_transaction(conn: &Connection, id: i64) -> Result<Transaction, TransactionError> {
    conn.query_row(&format!("{SELECT_TRANSACTIONS} WHERE id = ?1"), [id], map_row)
        .optional()?
        .ok_or(TransactionError::NotFound(id))
}

pub fn get_all_transactions(conn: &Connection) -> Result<Vec<Transaction>, TransactionError> {
    let mut stmt = conn.prepare(&format!("{SELECT_TRANSACTIONS} ORDER BY id"))?;

    let transactions = stmt
        .query_map([], map_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(transactions)
}

/// Decode failures name the row ID so the row can still be deleted by ID.
fn map_row(row: &Row) -> rusqlite::Result<Transaction> {
    let id: i64 = row.get(0)?;
    let transaction_type_str: Option<String> = row.get(1)?;
    let stored_amount: f64 = row.get(2)?;
    let date_str: String = row.get(3)?;
    let description: Option<String> = row.get(4)?;

    let transaction_type_str = transaction_type_str.unwrap_or_default();
    let transaction_type = transaction_type_str.parse::<TransactionType>().map_err(|_| {
        let message = format!("Transaction {id} has invalid type '{transaction_type_str}'");
        conversion_error(1, Type::Text, message)
    })?;

    let amount = Decimal::from_f64(stored_amount).ok_or_else(|| {
        conversion_error(2, Type::Real, format!("Transaction {id} has invalid amount {stored_amount}"))
    })?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
        conversion_error(3, Type::Text, format!("Transaction {id} has invalid date '{date_str}': {e}"))
    })?;

    Ok(Transaction {
        id,
        transaction_type,
        amount,
        date,
        description: description.unwrap_or_default(),
    })
}

fn conversion_error(column: usize, column_type: Type, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, column_type, message.into())
}

fn amount_to_real(amount: &Decimal) -> Result<f64, TransactionError> {
    amount
        .to_f64()
        .ok_or_else(|| TransactionError::validation(format!("Amount {amount} cannot be stored")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::establish_in_memory_connection;

    fn create_test_draft(
        transaction_type: TransactionType,
        amount: i64,
        day: u32,
    ) -> TransactionDraft {
        TransactionDraft::new(
            transaction_type,
            Decimal::new(amount, 0),
            NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            "Test Transaction",
        )
    }

    #[test]
    fn test_insert_assigns_increasing_ids() {
        let conn = establish_in_memory_connection().unwrap();

        let first = insert_transaction(&conn, &create_test_draft(TransactionType::Income, 10, 1));
        let second = insert_transaction(&conn, &create_test_draft(TransactionType::Expense, 5, 2));
        let (first, second) = (first.unwrap(), second.unwrap());

        assert!(second > first);
    }

    #[test]
    fn test_date_is_stored_as_day_month_year_text() {
        let conn = establish_in_memory_connection().unwrap();
        let draft = create_test_draft(TransactionType::Income, 10, 9);
        let id = insert_transaction(&conn, &draft).unwrap();

        let stored: String = conn
            .query_row("SELECT date FROM transactions WHERE id = ?1", [id], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, "09-01-2024");
    }

    #[test]
    fn test_get_all_transactions_empty() {
        let conn = establish_in_memory_connection().unwrap();

        let result = get_all_transactions(&conn);
        assert!(result.is_ok());
        assert_eq!(result.unwrap().len(), 0);
    }

    #[test]
    fn test_get_all_transactions_ordered_by_id() {
        let conn = establish_in_memory_connection().unwrap();
        insert_transaction(&conn, &create_test_draft(TransactionType::Income, 10, 20)).unwrap();
        insert_transaction(&conn, &create_test_draft(TransactionType::Expense, 5, 3)).unwrap();

        let all = get_all_transactions(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].id < all[1].id);
        assert_eq!(all[0].transaction_type, TransactionType::Income);
    }

    #[test]
    fn test_legacy_rows_are_readable() {
        let conn = establish_in_memory_connection().unwrap();
        conn.execute(
            "INSERT INTO transactions (type, amount, date, description) \
             VALUES ('Expense', 12.5, '15-01-2024', NULL)",
            [],
        )
        .unwrap();

        let all = get_all_transactions(&conn).unwrap();
        assert_eq!(all[0].amount, Decimal::new(125, 1));
        assert_eq!(all[0].date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(all[0].description, "");
    }

    #[test]
    fn test_undecodable_row_is_storage_error() {
        let conn = establish_in_memory_connection().unwrap();
        conn.execute(
            "INSERT INTO transactions (type, amount, date, description) \
             VALUES ('Income', 1.0, '2024/01/15', '')",
            [],
        )
        .unwrap();

        let result = get_all_transactions(&conn);
        assert!(matches!(result, Err(TransactionError::Storage(_))));
    }

    #[test]
    fn test_row_with_empty_type_names_its_id_and_can_be_removed() {
        let conn = establish_in_memory_connection().unwrap();
        insert_transaction(&conn, &create_test_draft(TransactionType::Income, 10, 1)).unwrap();
        conn.execute(
            "INSERT INTO transactions (type, amount, date, description) VALUES ('', 10.0, '01-01-2024', 'x')",
            [],
        )
        .unwrap();
        let legacy_id = conn.last_insert_rowid();

        let err = get_all_transactions(&conn).unwrap_err();
        assert!(matches!(err, TransactionError::Storage(_)));
        assert!(err.to_string().contains(&format!("Transaction {legacy_id} has invalid type ''")));

        remove_transaction(&conn, legacy_id).unwrap();
        assert_eq!(get_all_transactions(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_get_transaction_not_found() {
        let conn = establish_in_memory_connection().unwrap();

        let result = get_transaction(&conn, 42);
        assert!(matches!(result, Err(TransactionError::NotFound(42))));
    }

    #[test]
    fn test_remove_transaction_not_found() {
        let conn = establish_in_memory_connection().unwrap();

        let result = remove_transaction(&conn, 7);
        assert!(matches!(result, Err(TransactionError::NotFound(7))));
    }
}
