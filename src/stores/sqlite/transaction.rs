//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error, Transaction,
    stores::{TransactionStore, sqlite::lock},
    transaction::db::{
        count_transactions_for_account, delete_transaction, get_transaction,
        get_transactions_for_account, save_transaction,
    },
    uid::Uid,
};

/// Stores transactions and their splits in a SQLite database.
///
/// Splits must refer to accounts that already exist, see
/// [AccountsDbAdapter](crate::AccountsDbAdapter).
#[derive(Debug, Clone)]
pub struct TransactionsDbAdapter {
    connection: Arc<Mutex<Connection>>,
}

impl TransactionsDbAdapter {
    /// Create a new adapter for the SQLite `connection`.
    ///
    /// The database must have been set up with [initialize_db](crate::initialize_db).
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for TransactionsDbAdapter {
    /// Save a transaction and its splits in a single SQL transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyTransaction] if the transaction has no splits,
    /// - [Error::InvalidAccount] if a split refers to an account that does not exist,
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn add_transaction(&self, transaction: &Transaction) -> Result<(), Error> {
        let connection = lock(&self.connection)?;
        let tx = connection.unchecked_transaction()?;

        save_transaction(transaction, &tx)?;

        tx.commit()?;
        Ok(())
    }

    /// Retrieve a transaction by its `uid`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `uid` does not refer to a valid transaction,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get_transaction(&self, uid: &Uid) -> Result<Transaction, Error> {
        let connection = lock(&self.connection)?;
        get_transaction(uid, &connection)
    }

    fn get_transactions_for_account(&self, account_uid: &Uid) -> Result<Vec<Transaction>, Error> {
        let connection = lock(&self.connection)?;
        get_transactions_for_account(account_uid, &connection)
    }

    fn count_transactions_for_account(&self, account_uid: &Uid) -> Result<u32, Error> {
        let connection = lock(&self.connection)?;
        count_transactions_for_account(account_uid, &connection)
    }

    /// Delete a transaction by its `uid`.
    ///
    /// # Errors
    /// This function will return an [Error::DeleteMissingTransaction] if the
    /// transaction does not exist.
    fn delete_transaction(&self, uid: &Uid) -> Result<(), Error> {
        let connection = lock(&self.connection)?;
        delete_transaction(uid, &connection)?;
        tracing::info!("Deleted transaction {uid}");

        Ok(())
    }
}
