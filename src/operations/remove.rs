use crate::db::store::TransactionStore;
use crate::error::TransactionError;

pub fn parse_transaction_id(input: &str) -> Result<i64, TransactionError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(TransactionError::validation("Transaction ID cannot be empty."));
    }

    input
        .parse::<i64>()
        .map_err(|_| TransactionError::validation(format!("Invalid transaction ID '{input}'.")))
}

pub fn remove_transaction_from_db(store: &TransactionStore, id_input: &str) -> Result<i64, TransactionError> {
    let id = parse_transaction_id(id_input)?;
    store.delete(id)?;
    Ok(id)
}
