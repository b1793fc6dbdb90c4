//! Defines the transaction store trait.

use crate::{Error, Transaction, uid::Uid};

/// Handles the creation, retrieval and deletion of transactions.
pub trait TransactionStore {
    /// Save a transaction and its splits, replacing any previous version.
    ///
    /// Implementers should balance transactions whose splits do not cancel
    /// out by posting the difference to an imbalance account.
    fn add_transaction(&self, transaction: &Transaction) -> Result<(), Error>;

    /// Retrieve a transaction and its splits.
    fn get_transaction(&self, uid: &Uid) -> Result<Transaction, Error>;

    /// Retrieve the transactions that post to an account, ordered by date.
    fn get_transactions_for_account(&self, account_uid: &Uid) -> Result<Vec<Transaction>, Error>;

    /// Count the transactions that post to an account.
    fn count_transactions_for_account(&self, account_uid: &Uid) -> Result<u32, Error>;

    /// Delete a transaction and its splits.
    fn delete_transaction(&self, uid: &Uid) -> Result<(), Error>;
}
