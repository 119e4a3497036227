use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::TransactionError;

/// Day-month-year, the format dates are stored in and shown with.
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Largest amount a single transaction may hold (one quadrillion). Sums of any
/// realistic number of such amounts stay far below `Decimal::MAX`, and every
/// value up to it survives the round trip through the `REAL` amount column.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            TransactionType::Income => TransactionType::Expense,
            TransactionType::Expense => TransactionType::Income,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(TransactionError::validation(
                "Invalid transaction type. Use 'Income' or 'Expense'.",
            )),
        }
    }
}

/// A stored transaction. `id` is assigned by the store and never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: i64,
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
}

impl Transaction {
    pub fn new(id: i64, draft: TransactionDraft) -> Self {
        Self {
            id,
            transaction_type: draft.transaction_type,
            amount: draft.amount,
            date: draft.date,
            description: draft.description,
        }
    }

    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// The user-editable fields of a transaction, already typed.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub transaction_type: TransactionType,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: String,
}

/// Rejects amounts below zero or above [MAX_AMOUNT].
pub fn validate_amount(amount: Decimal) -> Result<Decimal, TransactionError> {
    if amount < Decimal::ZERO {
        return Err(TransactionError::validation("Amount must not be negative."));
    }
    if amount > MAX_AMOUNT {
        return Err(TransactionError::validation(format!("Amount must not exceed {MAX_AMOUNT}.")));
    }
    Ok(amount)
}

impl TransactionDraft {
    pub fn new(
        transaction_type: TransactionType,
        amount: Decimal,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            transaction_type,
            amount,
            date,
            description: description.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parse_is_case_insensitive() {
        assert_eq!("income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!(" EXPENSE ".parse::<TransactionType>().unwrap(), TransactionType::Expense);
    }

    #[test]
    fn test_transaction_type_parse_rejects_unknown() {
        let result = "transfer".parse::<TransactionType>();
        assert!(matches!(result, Err(TransactionError::Validation(_))));
    }

    #[test]
    fn test_max_amount_is_one_quadrillion() {
        assert_eq!(MAX_AMOUNT, Decimal::new(1_000_000_000_000_000, 0));
    }

    #[test]
    fn test_validate_amount_bounds() {
        assert_eq!(validate_amount(Decimal::ZERO).unwrap(), Decimal::ZERO);
        assert_eq!(validate_amount(MAX_AMOUNT).unwrap(), MAX_AMOUNT);
        assert!(matches!(validate_amount(Decimal::new(-1, 2)), Err(TransactionError::Validation(_))));

        let result = validate_amount(MAX_AMOUNT + Decimal::new(1, 2));
        assert_eq!(result.unwrap_err().to_string(), "Amount must not exceed 1000000000000000.");
    }

    #[test]
    fn test_formatted_date_is_day_month_year() {
        let tx = Transaction::new(
            1,
            TransactionDraft::new(
                TransactionType::Income,
                Decimal::new(1000, 0),
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                "Salary",
            ),
        );
        assert_eq!(tx.formatted_date(), "05-01-2024");
    }
}
