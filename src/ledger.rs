//! The entry point for working with a ledger database.

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

use crate::{AccountsDbAdapter, Error, TransactionsDbAdapter, db::initialize};

/// A ledger backed by a single SQLite connection.
///
/// The account and transaction stores share the connection, so a transaction
/// recorded through one is immediately visible in balances read through the other.
#[derive(Debug, Clone)]
pub struct Ledger {
    db_connection: Arc<Mutex<Connection>>,
    accounts: AccountsDbAdapter,
    transactions: TransactionsDbAdapter,
}

impl Ledger {
    /// Create a new [Ledger] from a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));

        Ok(Self {
            accounts: AccountsDbAdapter::new(connection.clone()),
            transactions: TransactionsDbAdapter::new(connection.clone()),
            db_connection: connection,
        })
    }

    /// Open, and create if needed, the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        tracing::debug!("Opening ledger database at {}", path.display());

        Self::new(Connection::open(path)?)
    }

    /// Create a ledger that lives only as long as the returned value.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn open_in_memory() -> Result<Self, Error> {
        Self::new(Connection::open_in_memory()?)
    }

    /// The account store.
    pub fn accounts(&self) -> &AccountsDbAdapter {
        &self.accounts
    }

    /// The transaction store.
    pub fn transactions(&self) -> &TransactionsDbAdapter {
        &self.transactions
    }

    /// The shared database connection.
    pub fn db_connection(&self) -> Arc<Mutex<Connection>> {
        self.db_connection.clone()
    }
}
