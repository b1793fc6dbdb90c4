//! Ledger is a double-entry bookkeeping library for personal finances.
//!
//! Accounts form a tree under a single root account and are stored in SQLite.
//! Transactions are made up of splits, each of which posts an amount of money
//! to one account. Account balances are computed from the split quantities.
//!
//! The easiest way to get started is [Ledger], which opens a database and
//! exposes an [AccountsDbAdapter] and a [TransactionsDbAdapter].

#![warn(missing_docs)]

mod account;
mod config;
mod db;
mod export;
mod ledger;
mod logging;
mod money;
mod transaction;
mod uid;

pub mod stores;

pub use account::{ACCOUNT_NAME_SEPARATOR, Account, AccountType, ROOT_ACCOUNT_NAME};
pub use config::Config;
pub use db::initialize as initialize_db;
pub use export::export_accounts_csv;
pub use ledger::Ledger;
pub use logging::setup_logging;
pub use money::{Commodity, Money};
pub use stores::{
    AccountStore, TransactionStore,
    sqlite::{AccountsDbAdapter, TransactionsDbAdapter},
};
pub use transaction::{ReconcileState, Split, Transaction, TransactionType};
pub use uid::Uid;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An empty string was used to create a unique identifier.
    #[error("a UID cannot be empty")]
    EmptyUid,

    /// An empty string was used as an account name.
    #[error("account name cannot be empty")]
    EmptyAccountName,

    /// The account name contains the separator used for full account names.
    #[error("the account name \"{0}\" must not contain ':'")]
    InvalidAccountName(String),

    /// The string does not name a known account type.
    #[error("\"{0}\" is not a valid account type")]
    InvalidAccountType(String),

    /// The string is not a currency code, e.g. "USD".
    #[error("\"{0}\" is not a valid currency code")]
    InvalidCurrencyCode(String),

    /// The string could not be parsed as a decimal amount of money.
    #[error("\"{0}\" is not a valid amount")]
    InvalidAmount(String),

    /// An amount of money does not fit in the integer representation used
    /// for storage.
    #[error("the amount {0} is too large to store")]
    AmountOverflow(String),

    /// Tried to combine amounts of money in different currencies.
    #[error("expected an amount in {expected} but got one in {found}")]
    CurrencyMismatch {
        /// The currency of the left hand side.
        expected: String,
        /// The currency of the right hand side.
        found: String,
    },

    /// The color is not a hex color string of the form "#RRGGBB".
    #[error("\"{0}\" is not a valid color, expected the form #RRGGBB")]
    InvalidColor(String),

    /// The parent UID of an account does not refer to an existing account.
    #[error("the parent account {0} does not exist")]
    InvalidParentAccount(Uid),

    /// Setting the parent would make an account its own ancestor.
    #[error("account {0} cannot be moved under itself or one of its descendants")]
    AccountCycle(Uid),

    /// Tried to save a second root account.
    #[error("the ledger already has a root account")]
    DuplicateRootAccount,

    /// The root account holds the account tree together and cannot be deleted.
    #[error("the root account cannot be deleted")]
    DeleteRootAccount,

    /// A split refers to an account that does not exist.
    #[error("a split refers to an account that is not in the database")]
    InvalidAccount,

    /// Tried to save a transaction with no splits.
    #[error("a transaction must have at least one split")]
    EmptyTransaction,

    /// Tried to update an account that does not exist
    #[error("tried to update an account that is not in the database")]
    UpdateMissingAccount,

    /// Tried to delete an account that does not exist
    #[error("tried to delete an account that is not in the database")]
    DeleteMissingAccount,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Writing CSV output failed.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// The log subscriber could not be set up.
    #[error("could not set up logging: {0}")]
    LoggingError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidAccount,
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}
