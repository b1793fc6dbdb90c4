//! SQLite backed implementations of the store traits.
//!
//! Both adapters share one connection behind an `Arc<Mutex<_>>`, so writes
//! from either are serialized.

mod account;
mod transaction;

pub use account::AccountsDbAdapter;
pub use transaction::TransactionsDbAdapter;

use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::Error;

fn lock(connection: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|_| Error::DatabaseLockError)
}
