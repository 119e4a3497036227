//! Income and expense bookkeeping backed by SQLite, with the aggregations the
//! dashboard charts are drawn from. Nothing in this library depends on a UI.

pub mod db;
pub mod error;
pub mod models;
pub mod operations;

pub use db::store::TransactionStore;
pub use error::TransactionError;
pub use models::transaction::{Transaction, TransactionDraft, TransactionType};
