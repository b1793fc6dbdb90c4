//! Defines the account store trait.

use crate::{Account, AccountType, Error, Money, money::Commodity, uid::Uid};

/// Handles the creation, retrieval and deletion of accounts.
pub trait AccountStore {
    /// Save an account and the transactions attached to it.
    ///
    /// Existing accounts are updated. Accounts without a parent are placed
    /// under the root account.
    fn add_record(&self, account: &Account) -> Result<(), Error>;

    /// Retrieve an account, without its transactions.
    fn get_record(&self, uid: &Uid) -> Result<Account, Error>;

    /// Retrieve every account except the root, ordered by full name.
    fn get_all_records(&self) -> Result<Vec<Account>, Error>;

    /// Delete an account and the transactions that post to it.
    ///
    /// Sub-accounts are moved up to the parent of the deleted account.
    fn delete_record(&self, uid: &Uid) -> Result<(), Error>;

    /// Delete an account, everything below it, and their transactions.
    fn recursive_delete_account(&self, uid: &Uid) -> Result<(), Error>;

    /// Move the sub-accounts of `uid` under `new_parent_uid`.
    fn reassign_descendant_accounts(&self, uid: &Uid, new_parent_uid: &Uid) -> Result<(), Error>;

    /// The short name of an account.
    fn get_account_name(&self, uid: &Uid) -> Result<String, Error>;

    /// The name of an account prefixed with the names of its ancestors.
    fn get_full_account_name(&self, uid: &Uid) -> Result<String, Error>;

    /// The parent of an account, `None` for the root account.
    fn get_parent_account_uid(&self, uid: &Uid) -> Result<Option<Uid>, Error>;

    /// The kind of an account.
    fn get_account_type(&self, uid: &Uid) -> Result<AccountType, Error>;

    /// The currency of an account.
    fn get_commodity(&self, uid: &Uid) -> Result<Commodity, Error>;

    /// Whether an account only groups other accounts.
    fn is_placeholder_account(&self, uid: &Uid) -> Result<bool, Error>;

    /// Whether an account is flagged as a favorite.
    fn is_favorite_account(&self, uid: &Uid) -> Result<bool, Error>;

    /// Flag or unflag an account as a favorite.
    fn set_favorite(&self, uid: &Uid, favorite: bool) -> Result<(), Error>;

    /// Retrieve the accounts flagged as favorite.
    fn get_favorite_accounts(&self) -> Result<Vec<Account>, Error>;

    /// Retrieve the direct children of the root account.
    fn get_top_level_accounts(&self) -> Result<Vec<Account>, Error>;

    /// Retrieve the direct children of an account.
    fn get_sub_accounts(&self, uid: &Uid) -> Result<Vec<Account>, Error>;

    /// Count the direct children of an account.
    fn get_sub_account_count(&self, uid: &Uid) -> Result<usize, Error>;

    /// Retrieve the UIDs of every account below an account.
    fn get_descendant_account_uids(&self, uid: &Uid) -> Result<Vec<Uid>, Error>;

    /// The balance of an account including its sub-accounts.
    fn get_account_balance(&self, uid: &Uid) -> Result<Money, Error>;

    /// The UID of the root account, which is created if needed.
    fn get_or_create_root_account_uid(&self) -> Result<Uid, Error>;

    /// The UID of the account that absorbs imbalances in `commodity`, which is created if needed.
    fn get_or_create_imbalance_account_uid(&self, commodity: &Commodity) -> Result<Uid, Error>;

    /// Create the missing accounts along a full name such as "Expenses:Food"
    /// and return the UID of the last one.
    fn create_account_hierarchy(
        &self,
        full_name: &str,
        account_type: AccountType,
        commodity: &Commodity,
    ) -> Result<Uid, Error>;

    /// Like [AccountStore::create_account_hierarchy], but the accounts it
    /// creates are flagged as placeholders.
    fn create_placeholder_hierarchy(
        &self,
        full_name: &str,
        account_type: AccountType,
        commodity: &Commodity,
    ) -> Result<Uid, Error>;
}
