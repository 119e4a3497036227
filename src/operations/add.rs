use crate::db::store::TransactionStore;
use crate::error::TransactionError;
use crate::models::transaction::{DATE_FORMAT, TransactionDraft, TransactionType, validate_amount};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

const MAX_DESCRIPTION_LEN: usize = 255;

/// Transaction fields exactly as typed by the user, before any validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionInput {
    pub transaction_type: String,
    pub amount: String,
    pub date: String,
    pub description: String,
}

impl TransactionInput {
    pub fn new(
        transaction_type: impl Into<String>,
        amount: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type: transaction_type.into(),
            amount: amount.into(),
            date: date.into(),
            description: description.into(),
        }
    }

    pub fn parse(&self) -> Result<TransactionDraft, TransactionError> {
        let transaction_type = TransactionType::from_str(&self.transaction_type)?;
        let amount = parse_amount(&self.amount)?;
        let date = parse_date(&self.date)?;

        let description = self.description.trim().to_string();
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(TransactionError::validation("Description too long"));
        }

        Ok(TransactionDraft::new(transaction_type, amount, date, description))
    }
}

pub fn parse_amount(input: &str) -> Result<Decimal, TransactionError> {
    let amount = Decimal::from_str(input.trim())
        .map_err(|_| TransactionError::validation("Please enter a valid amount."))?;
    validate_amount(amount)
}

/// Accepts `DD-MM-YYYY`, and `YYYY-MM-DD` as a fallback.
pub fn parse_date(input: &str) -> Result<NaiveDate, TransactionError> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(input, "%Y-%m-%d"))
        .map_err(|_| TransactionError::validation(format!("Invalid date '{input}'. Please use DD-MM-YYYY.")))
}

pub fn add_transaction_to_db(store: &TransactionStore, input: &TransactionInput) -> Result<i64, TransactionError> {
    let draft = input.parse().inspect_err(|e| tracing::warn!("rejected new transaction: {}", e))?;
    store.add(&draft)
}
