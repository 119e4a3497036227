use std::path::Path;

use rusqlite::{Connection, Result};

// Column names and types match databases written by earlier versions of the app.
const CREATE_TRANSACTIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT,
    amount REAL,
    date TEXT,
    description TEXT
)";

pub fn establish_connection(path: impl AsRef<Path>) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.execute(CREATE_TRANSACTIONS_TABLE, [])?;
    Ok(conn)
}

pub fn establish_in_memory_connection() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    conn.execute(CREATE_TRANSACTIONS_TABLE, [])?;
    Ok(conn)
}
