use super::add::TransactionInput;
use crate::db::store::TransactionStore;
use crate::error::TransactionError;

/// Load transaction `id` as form input, ready to be edited and saved back.
pub fn load_transaction_for_edit(store: &TransactionStore, id: i64) -> Result<TransactionInput, TransactionError> {
    let transaction = store.get(id)?;
    Ok(TransactionInput::new(
        transaction.transaction_type.as_str(),
        transaction.amount.normalize().to_string(),
        transaction.formatted_date(),
        transaction.description,
    ))
}

pub fn edit_transaction_in_db(
    store: &TransactionStore,
    id: i64,
    input: &TransactionInput,
) -> Result<(), TransactionError> {
    let draft = input.parse().inspect_err(|e| tracing::warn!(id, "rejected edit: {}", e))?;
    store.update(id, &draft)
}
