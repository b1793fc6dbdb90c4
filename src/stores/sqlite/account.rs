//! Implements a SQLite backed account store.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Account, AccountType, Error, Money,
    account::db::{
        account_exists, create_account_hierarchy, create_placeholder_hierarchy, delete_account_row,
        delete_account_subtree, find_root_account_uid, get_account, get_all_accounts,
        get_child_accounts, get_descendant_uids, get_favorite_accounts,
        get_or_create_imbalance_account_uid, get_or_create_root_account_uid, reassign_children,
        save_account, update_favorite,
    },
    money::Commodity,
    stores::{AccountStore, sqlite::lock},
    transaction::db::{compute_account_balance, delete_transactions_for_account, save_transaction},
    uid::Uid,
};

/// Stores accounts in a SQLite database.
///
/// The adapter keeps the account tree consistent: every account other than
/// the root has a parent, full names follow the parent chain, and deleting an
/// account never leaves splits pointing at it.
#[derive(Debug, Clone)]
pub struct AccountsDbAdapter {
    connection: Arc<Mutex<Connection>>,
}

impl AccountsDbAdapter {
    /// Create a new adapter for the SQLite `connection`.
    ///
    /// The database must have been set up with [initialize_db](crate::initialize_db).
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl AccountStore for AccountsDbAdapter {
    /// Save the account and its attached transactions in a single SQL transaction.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidParentAccount] if the parent account does not exist,
    /// - [Error::AccountCycle] if the parent is the account itself or one of its descendants,
    /// - any error from [TransactionStore::add_transaction](crate::TransactionStore::add_transaction)
    ///   for the attached transactions,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn add_record(&self, account: &Account) -> Result<(), Error> {
        let connection = lock(&self.connection)?;
        let tx = connection.unchecked_transaction()?;

        save_account(account, &tx)?;

        for transaction in account.transactions() {
            save_transaction(transaction, &tx)?;
        }

        tx.commit()?;
        tracing::debug!(
            "Saved account {} ({}) with {} transactions",
            account.name(),
            account.uid(),
            account.transaction_count()
        );

        Ok(())
    }

    /// Retrieve an account by its `uid`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `uid` does not refer to a valid account,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get_record(&self, uid: &Uid) -> Result<Account, Error> {
        let connection = lock(&self.connection)?;
        get_account(uid, &connection)
    }

    fn get_all_records(&self) -> Result<Vec<Account>, Error> {
        let connection = lock(&self.connection)?;
        get_all_accounts(&connection)
    }

    /// Delete the account `uid` and every transaction with a split in it.
    ///
    /// The direct sub-accounts are moved under the parent of the deleted account.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DeleteMissingAccount] if the account does not exist,
    /// - [Error::DeleteRootAccount] if `uid` is the root account,
    /// - or [Error::SqlError] there is some other SQL error.
    fn delete_record(&self, uid: &Uid) -> Result<(), Error> {
        let connection = lock(&self.connection)?;
        let tx = connection.unchecked_transaction()?;

        let account = get_account(uid, &tx).map_err(|error| match error {
            Error::NotFound => Error::DeleteMissingAccount,
            error => error,
        })?;
        let Some(parent_uid) = account.parent_uid() else {
            return Err(Error::DeleteRootAccount);
        };

        let deleted_transactions = delete_transactions_for_account(uid, false, &tx)?;
        let moved_accounts = reassign_children(uid, parent_uid, &tx)?;
        delete_account_row(uid, &tx)?;

        tx.commit()?;
        tracing::info!(
            "Deleted account {} along with {deleted_transactions} transactions, moved {moved_accounts} sub-accounts",
            account.full_name()
        );

        Ok(())
    }

    /// Delete the account `uid`, all of its descendants, and their transactions.
    ///
    /// # Errors
    /// See [AccountsDbAdapter::delete_record].
    fn recursive_delete_account(&self, uid: &Uid) -> Result<(), Error> {
        let connection = lock(&self.connection)?;
        let tx = connection.unchecked_transaction()?;

        let account = get_account(uid, &tx).map_err(|error| match error {
            Error::NotFound => Error::DeleteMissingAccount,
            error => error,
        })?;
        if account.account_type() == AccountType::Root {
            return Err(Error::DeleteRootAccount);
        }

        let deleted_transactions = delete_transactions_for_account(uid, true, &tx)?;
        let deleted_accounts = delete_account_subtree(uid, &tx)?;

        tx.commit()?;
        tracing::info!(
            "Deleted {deleted_accounts} accounts under {} along with {deleted_transactions} transactions",
            account.full_name()
        );

        Ok(())
    }

    /// Move the sub-accounts of `uid` under `new_parent_uid`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `uid` does not exist,
    /// - [Error::InvalidParentAccount] if `new_parent_uid` does not exist,
    /// - [Error::AccountCycle] if `new_parent_uid` is `uid` or one of its descendants,
    /// - or [Error::SqlError] there is some other SQL error.
    fn reassign_descendant_accounts(&self, uid: &Uid, new_parent_uid: &Uid) -> Result<(), Error> {
        let connection = lock(&self.connection)?;
        let tx = connection.unchecked_transaction()?;

        if !account_exists(uid, &tx)? {
            return Err(Error::NotFound);
        }
        if !account_exists(new_parent_uid, &tx)? {
            return Err(Error::InvalidParentAccount(new_parent_uid.clone()));
        }
        if new_parent_uid == uid || get_descendant_uids(uid, &tx)?.contains(new_parent_uid) {
            return Err(Error::AccountCycle(new_parent_uid.clone()));
        }

        let moved = reassign_children(uid, new_parent_uid, &tx)?;

        tx.commit()?;
        tracing::info!("Moved {moved} sub-accounts of {uid} under {new_parent_uid}");

        Ok(())
    }

    fn get_account_name(&self, uid: &Uid) -> Result<String, Error> {
        Ok(self.get_record(uid)?.name().to_owned())
    }

    fn get_full_account_name(&self, uid: &Uid) -> Result<String, Error> {
        Ok(self.get_record(uid)?.full_name().to_owned())
    }

    fn get_parent_account_uid(&self, uid: &Uid) -> Result<Option<Uid>, Error> {
        Ok(self.get_record(uid)?.parent_uid().cloned())
    }

    fn get_account_type(&self, uid: &Uid) -> Result<AccountType, Error> {
        Ok(self.get_record(uid)?.account_type())
    }

    fn get_commodity(&self, uid: &Uid) -> Result<Commodity, Error> {
        Ok(self.get_record(uid)?.commodity().clone())
    }

    fn is_placeholder_account(&self, uid: &Uid) -> Result<bool, Error> {
        Ok(self.get_record(uid)?.is_placeholder())
    }

    /// Whether the account `uid` is flagged as a favorite.
    ///
    /// # Errors
    /// This function will return an [Error::NotFound] if `uid` does not refer to a valid account.
    fn is_favorite_account(&self, uid: &Uid) -> Result<bool, Error> {
        Ok(self.get_record(uid)?.is_favorite())
    }

    /// Flag or unflag the account `uid` as a favorite. Setting the flag to its
    /// current value is not an error.
    ///
    /// # Errors
    /// This function will return an [Error::UpdateMissingAccount] if the account does not exist.
    fn set_favorite(&self, uid: &Uid, favorite: bool) -> Result<(), Error> {
        let connection = lock(&self.connection)?;
        update_favorite(uid, favorite, &connection)?;
        tracing::debug!("Set favorite={favorite} for account {uid}");

        Ok(())
    }

    fn get_favorite_accounts(&self) -> Result<Vec<Account>, Error> {
        let connection = lock(&self.connection)?;
        get_favorite_accounts(&connection)
    }

    fn get_top_level_accounts(&self) -> Result<Vec<Account>, Error> {
        let connection = lock(&self.connection)?;

        match find_root_account_uid(&connection)? {
            Some(root_uid) => get_child_accounts(&root_uid, &connection),
            None => Ok(Vec::new()),
        }
    }

    fn get_sub_accounts(&self, uid: &Uid) -> Result<Vec<Account>, Error> {
        let connection = lock(&self.connection)?;
        get_child_accounts(uid, &connection)
    }

    fn get_sub_account_count(&self, uid: &Uid) -> Result<usize, Error> {
        Ok(self.get_sub_accounts(uid)?.len())
    }

    fn get_descendant_account_uids(&self, uid: &Uid) -> Result<Vec<Uid>, Error> {
        let connection = lock(&self.connection)?;
        get_descendant_uids(uid, &connection)
    }

    /// The balance of the account `uid` and its sub-accounts, in the account's currency.
    ///
    /// Sub-accounts in a different currency are left out.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `uid` does not refer to a valid account,
    /// - or [Error::SqlError] there is some other SQL error.
    fn get_account_balance(&self, uid: &Uid) -> Result<Money, Error> {
        let connection = lock(&self.connection)?;
        let account = get_account(uid, &connection)?;

        compute_account_balance(&account, &connection)
    }

    fn get_or_create_root_account_uid(&self) -> Result<Uid, Error> {
        let connection = lock(&self.connection)?;
        let tx = connection.unchecked_transaction()?;

        let uid = get_or_create_root_account_uid(&tx)?;

        tx.commit()?;
        Ok(uid)
    }

    fn get_or_create_imbalance_account_uid(&self, commodity: &Commodity) -> Result<Uid, Error> {
        let connection = lock(&self.connection)?;
        let tx = connection.unchecked_transaction()?;

        let uid = get_or_create_imbalance_account_uid(commodity, &tx)?;

        tx.commit()?;
        Ok(uid)
    }

    fn create_account_hierarchy(
        &self,
        full_name: &str,
        account_type: AccountType,
        commodity: &Commodity,
    ) -> Result<Uid, Error> {
        let connection = lock(&self.connection)?;
        let tx = connection.unchecked_transaction()?;

        let uid = create_account_hierarchy(full_name, account_type, commodity, &tx)?;

        tx.commit()?;
        Ok(uid)
    }

    fn create_placeholder_hierarchy(
        &self,
        full_name: &str,
        account_type: AccountType,
        commodity: &Commodity,
    ) -> Result<Uid, Error> {
        let connection = lock(&self.connection)?;
        let tx = connection.unchecked_transaction()?;

        let uid = create_placeholder_hierarchy(full_name, account_type, commodity, &tx)?;

        tx.commit()?;
        Ok(uid)
    }
}

#[cfg(test)]
mod accounts_db_adapter_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Account, AccountStore, AccountType, AccountsDbAdapter, Commodity, Error, Money, Split,
        Transaction, TransactionStore, TransactionsDbAdapter, Uid,
        account::db::find_root_account_uid, db::initialize,
    };

    fn get_adapters() -> (AccountsDbAdapter, TransactionsDbAdapter) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        (
            AccountsDbAdapter::new(connection.clone()),
            TransactionsDbAdapter::new(connection),
        )
    }

    fn get_test_adapter() -> AccountsDbAdapter {
        get_adapters().0
    }

    fn create_account(name: &str, adapter: &AccountsDbAdapter) -> Account {
        let account = Account::new(name, Commodity::usd()).unwrap();
        adapter.add_record(&account).expect("Could not create test account");
        account
    }

    fn create_sub_account(name: &str, parent: &Account, adapter: &AccountsDbAdapter) -> Account {
        let account = Account::new(name, Commodity::usd())
            .unwrap()
            .with_parent(parent.uid().clone());
        adapter.add_record(&account).expect("Could not create test account");
        account
    }

    fn usd(amount: &str) -> Money {
        Money::new(amount, "USD").unwrap()
    }

    #[test]
    fn add_and_get_record() {
        let adapter = get_test_adapter();
        let mut account = Account::new("Klaas", Commodity::usd()).unwrap();
        account.set_description("This is a test description");
        account.set_code(Some("1010"));
        account.set_color(Some("#336699")).unwrap();

        adapter.add_record(&account).unwrap();

        let saved = adapter.get_record(account.uid()).unwrap();
        assert_eq!(saved.name(), "Klaas");
        assert_eq!(saved.full_name(), "Klaas");
        assert_eq!(saved.description(), "This is a test description");
        assert_eq!(saved.account_type(), AccountType::Cash);
        assert_eq!(saved.code(), Some("1010"));
        assert_eq!(saved.color(), Some("#336699"));
        assert_eq!(saved.commodity(), &Commodity::usd());
    }

    #[test]
    fn get_missing_record_returns_not_found() {
        let adapter = get_test_adapter();

        assert_eq!(adapter.get_record(&Uid::generate()), Err(Error::NotFound));
    }

    #[test]
    fn sub_account_belongs_to_parent() {
        let adapter = get_test_adapter();
        let mut parent = Account::new("Assets", Commodity::usd()).unwrap();
        parent.set_uid(Uid::new("test").unwrap());
        adapter.add_record(&parent).unwrap();

        let sub_account = create_sub_account("Cash", &parent, &adapter);

        assert_eq!(
            adapter.get_parent_account_uid(sub_account.uid()),
            Ok(Some(Uid::new("test").unwrap()))
        );
        assert_eq!(
            adapter.get_full_account_name(sub_account.uid()),
            Ok("Assets:Cash".to_owned())
        );
        assert_eq!(adapter.get_sub_account_count(parent.uid()), Ok(1));
    }

    #[test]
    fn editing_account_updates_stored_information() {
        let adapter = get_test_adapter();
        let mut account = Account::new("oldName", Commodity::usd())
            .unwrap()
            .with_type(AccountType::Bank);
        account.set_description("oldDescription");
        adapter.add_record(&account).unwrap();

        account.set_name("updatedName").unwrap();
        account.set_description("updatedDescription");
        account.set_account_type(AccountType::Cash);
        adapter.add_record(&account).unwrap();

        let saved = adapter.get_record(account.uid()).unwrap();
        assert_eq!(saved.name(), "updatedName");
        assert_eq!(saved.full_name(), "updatedName");
        assert_eq!(saved.description(), "updatedDescription");
        assert_eq!(saved.account_type(), AccountType::Cash);
        assert_eq!(adapter.get_all_records().unwrap().len(), 1);
    }

    #[test]
    fn renaming_parent_updates_descendant_full_names() {
        let adapter = get_test_adapter();
        let mut assets = create_account("Assets", &adapter);
        let current = create_sub_account("Current", &assets, &adapter);
        let cash = create_sub_account("Cash", &current, &adapter);

        assets.set_name("Property").unwrap();
        adapter.add_record(&assets).unwrap();

        assert_eq!(
            adapter.get_full_account_name(current.uid()),
            Ok("Property:Current".to_owned())
        );
        assert_eq!(
            adapter.get_full_account_name(cash.uid()),
            Ok("Property:Current:Cash".to_owned())
        );
    }

    #[test]
    fn moving_account_under_its_descendant_fails() {
        let adapter = get_test_adapter();
        let mut assets = create_account("Assets", &adapter);
        let cash = create_sub_account("Cash", &assets, &adapter);

        assets.set_parent_uid(Some(cash.uid().clone()));

        assert_eq!(
            adapter.add_record(&assets),
            Err(Error::AccountCycle(assets.uid().clone()))
        );
    }

    #[test]
    fn favoring_account_flags_it_as_favorite() {
        let adapter = get_test_adapter();
        let mut account = Account::new("Wallet", Commodity::usd()).unwrap();
        account.set_uid(Uid::new("123").unwrap());
        adapter.add_record(&account).unwrap();
        assert_eq!(adapter.is_favorite_account(account.uid()), Ok(false));

        adapter.set_favorite(account.uid(), true).unwrap();

        assert_eq!(adapter.is_favorite_account(account.uid()), Ok(true));
        assert_eq!(adapter.get_favorite_accounts().unwrap().len(), 1);
    }

    #[test]
    fn favorite_flag_from_model_is_saved() {
        let adapter = get_test_adapter();
        let mut account = Account::new("Wallet", Commodity::usd()).unwrap();
        account.set_favorite(true);

        adapter.add_record(&account).unwrap();

        assert_eq!(adapter.is_favorite_account(account.uid()), Ok(true));
    }

    #[test]
    fn setting_favorite_twice_is_idempotent() {
        let adapter = get_test_adapter();
        let account = create_account("Wallet", &adapter);

        adapter.set_favorite(account.uid(), true).unwrap();
        adapter.set_favorite(account.uid(), true).unwrap();
        assert_eq!(adapter.is_favorite_account(account.uid()), Ok(true));

        adapter.set_favorite(account.uid(), false).unwrap();
        adapter.set_favorite(account.uid(), false).unwrap();
        assert_eq!(adapter.is_favorite_account(account.uid()), Ok(false));
    }

    #[test]
    fn favoring_missing_account_fails() {
        let adapter = get_test_adapter();

        assert_eq!(
            adapter.set_favorite(&Uid::generate(), true),
            Err(Error::UpdateMissingAccount)
        );
    }

    #[test]
    fn deleting_account_removes_it_from_lookups() {
        let adapter = get_test_adapter();
        let account = create_account("testName", &adapter);
        assert_eq!(
            adapter.get_account_name(account.uid()),
            Ok("testName".to_owned())
        );

        adapter.delete_record(account.uid()).unwrap();

        assert_eq!(adapter.get_account_name(account.uid()), Err(Error::NotFound));
        assert!(adapter.get_all_records().unwrap().is_empty());
    }

    #[test]
    fn deleting_missing_account_fails() {
        let adapter = get_test_adapter();

        assert_eq!(
            adapter.delete_record(&Uid::generate()),
            Err(Error::DeleteMissingAccount)
        );
    }

    #[test]
    fn deleting_root_account_fails() {
        let adapter = get_test_adapter();
        let root_uid = adapter.get_or_create_root_account_uid().unwrap();

        assert_eq!(adapter.delete_record(&root_uid), Err(Error::DeleteRootAccount));
        assert_eq!(
            adapter.recursive_delete_account(&root_uid),
            Err(Error::DeleteRootAccount)
        );
    }

    #[test]
    fn deleting_account_moves_sub_accounts_to_its_parent() {
        let adapter = get_test_adapter();
        let assets = create_account("Assets", &adapter);
        let current = create_sub_account("Current", &assets, &adapter);
        let cash = create_sub_account("Cash", &current, &adapter);

        adapter.delete_record(current.uid()).unwrap();

        assert_eq!(
            adapter.get_parent_account_uid(cash.uid()),
            Ok(Some(assets.uid().clone()))
        );
        assert_eq!(
            adapter.get_full_account_name(cash.uid()),
            Ok("Assets:Cash".to_owned())
        );
    }

    #[test]
    fn deleting_account_deletes_its_transactions() {
        let (accounts, transactions) = get_adapters();
        let cash = create_account("Cash", &accounts);
        let food = create_account("Food", &accounts);
        let mut transaction = Transaction::new("Lunch", Commodity::usd(), date!(2025 - 04 - 01));
        let split = Split::new(usd("-15"), cash.uid().clone());
        let pair = split.create_pair(food.uid().clone());
        transaction.add_split(split);
        transaction.add_split(pair);
        transactions.add_transaction(&transaction).unwrap();

        accounts.delete_record(food.uid()).unwrap();

        assert_eq!(
            transactions.get_transaction(transaction.uid()),
            Err(Error::NotFound)
        );
        assert_eq!(
            accounts.get_account_balance(cash.uid()),
            Ok(Money::zero(Commodity::usd()))
        );
    }

    #[test]
    fn recursive_delete_removes_whole_subtree() {
        let (adapter, transactions) = get_adapters();
        let assets = create_account("Assets", &adapter);
        let current = create_sub_account("Current", &assets, &adapter);
        let cash = create_sub_account("Cash", &current, &adapter);
        let other = create_account("Liabilities", &adapter);
        let mut transaction =
            Transaction::new("Withdrawal", Commodity::usd(), date!(2025 - 04 - 02));
        let split = Split::new(-usd("40"), other.uid().clone());
        let pair = split.create_pair(cash.uid().clone());
        transaction.add_split(split);
        transaction.add_split(pair);
        transactions.add_transaction(&transaction).unwrap();
        assert_eq!(adapter.get_account_balance(other.uid()), Ok(usd("-40")));

        adapter.recursive_delete_account(assets.uid()).unwrap();

        for uid in [assets.uid(), current.uid(), cash.uid()] {
            assert_eq!(adapter.get_record(uid), Err(Error::NotFound));
        }
        assert!(adapter.get_record(other.uid()).is_ok());
        assert_eq!(
            transactions.get_transaction(transaction.uid()),
            Err(Error::NotFound)
        );
        assert_eq!(
            adapter.get_account_balance(other.uid()),
            Ok(Money::zero(Commodity::usd()))
        );
    }

    #[test]
    fn reassign_descendants_moves_children() {
        let adapter = get_test_adapter();
        let old_parent = create_account("Old", &adapter);
        let new_parent = create_account("New", &adapter);
        let child = create_sub_account("Child", &old_parent, &adapter);

        adapter
            .reassign_descendant_accounts(old_parent.uid(), new_parent.uid())
            .unwrap();

        assert_eq!(adapter.get_sub_account_count(old_parent.uid()), Ok(0));
        assert_eq!(
            adapter.get_full_account_name(child.uid()),
            Ok("New:Child".to_owned())
        );
    }

    #[test]
    fn reassign_descendants_under_own_child_fails() {
        let adapter = get_test_adapter();
        let parent = create_account("Parent", &adapter);
        let child = create_sub_account("Child", &parent, &adapter);

        assert_eq!(
            adapter.reassign_descendant_accounts(parent.uid(), child.uid()),
            Err(Error::AccountCycle(child.uid().clone()))
        );
    }

    #[test]
    fn account_transactions_are_saved_with_account() {
        let (accounts, transactions) = get_adapters();
        let food = create_account("Food", &accounts);
        let mut cash = Account::new("Cash", Commodity::usd()).unwrap();
        for amount in ["1", "2", "3"] {
            let mut transaction =
                Transaction::new("Snack", Commodity::usd(), date!(2025 - 04 - 01));
            let split = Split::new(-usd(amount), cash.uid().clone());
            let pair = split.create_pair(food.uid().clone());
            transaction.add_split(split);
            transaction.add_split(pair);
            cash.add_transaction(transaction);
        }

        accounts.add_record(&cash).unwrap();

        assert_eq!(transactions.count_transactions_for_account(cash.uid()), Ok(3));
        assert_eq!(
            transactions.get_transactions_for_account(cash.uid()).unwrap().len(),
            cash.transaction_count()
        );
    }

    #[test]
    fn retrieving_balance_returns_split_quantity() {
        let adapter = get_test_adapter();
        let money = usd("5");
        let mut account = Account::new("Wallet", Commodity::usd()).unwrap();
        account.set_uid(Uid::new("123").unwrap());
        let mut transaction = Transaction::new("Test", Commodity::usd(), date!(2025 - 04 - 01));
        transaction.add_split(Split::new(money.clone(), account.uid().clone()));
        account.add_transaction(transaction);

        adapter.add_record(&account).unwrap();

        assert_eq!(adapter.get_account_balance(account.uid()), Ok(money));
    }

    #[test]
    fn balance_includes_sub_accounts_in_same_currency() {
        let (accounts, transactions) = get_adapters();
        let assets = create_account("Assets", &accounts);
        let cash = create_sub_account("Cash", &assets, &accounts);
        let euros = Account::new("Euros", Commodity::new("EUR").unwrap())
            .unwrap()
            .with_parent(assets.uid().clone());
        accounts.add_record(&euros).unwrap();
        let equity = Account::new("Opening Balances", Commodity::usd())
            .unwrap()
            .with_type(AccountType::Equity);
        accounts.add_record(&equity).unwrap();

        let mut opening = Transaction::new("Opening", Commodity::usd(), date!(2025 - 01 - 01));
        let split = Split::new(usd("250"), cash.uid().clone());
        let pair = split.create_pair(equity.uid().clone());
        opening.add_split(split);
        opening.add_split(pair);
        transactions.add_transaction(&opening).unwrap();

        let mut euro_opening = Transaction::new(
            "Opening",
            Commodity::new("EUR").unwrap(),
            date!(2025 - 01 - 01),
        );
        euro_opening.add_split(Split::new(Money::new("100", "EUR").unwrap(), euros.uid().clone()));
        transactions.add_transaction(&euro_opening).unwrap();

        assert_eq!(accounts.get_account_balance(assets.uid()), Ok(usd("250")));
        assert_eq!(accounts.get_account_balance(equity.uid()), Ok(usd("250")));
        assert_eq!(
            accounts.get_account_balance(euros.uid()),
            Money::new("100", "EUR")
        );
    }

    #[test]
    fn top_level_accounts_exclude_sub_accounts() {
        let adapter = get_test_adapter();
        let assets = create_account("Assets", &adapter);
        create_sub_account("Cash", &assets, &adapter);
        create_account("Expenses", &adapter);

        let names: Vec<String> = adapter
            .get_top_level_accounts()
            .unwrap()
            .iter()
            .map(|account| account.name().to_owned())
            .collect();

        assert_eq!(names, vec!["Assets", "Expenses"]);
    }

    #[test]
    fn top_level_accounts_of_empty_ledger_is_empty_and_creates_no_root() {
        let adapter = get_test_adapter();

        assert_eq!(adapter.get_top_level_accounts(), Ok(Vec::new()));
        assert_eq!(
            find_root_account_uid(&adapter.connection.lock().unwrap()),
            Ok(None)
        );
    }

    #[test]
    fn descendant_uids_cover_whole_subtree() {
        let adapter = get_test_adapter();
        let assets = create_account("Assets", &adapter);
        let current = create_sub_account("Current", &assets, &adapter);
        let cash = create_sub_account("Cash", &current, &adapter);

        let descendants = adapter.get_descendant_account_uids(assets.uid()).unwrap();

        assert_eq!(descendants, vec![current.uid().clone(), cash.uid().clone()]);
    }

    #[test]
    fn hierarchy_is_created_from_full_name() {
        let adapter = get_test_adapter();

        let uid = adapter
            .create_account_hierarchy(
                "Expenses:Food:Groceries",
                AccountType::Expense,
                &Commodity::usd(),
            )
            .unwrap();

        assert_eq!(
            adapter.get_full_account_name(&uid),
            Ok("Expenses:Food:Groceries".to_owned())
        );
        assert_eq!(adapter.get_account_type(&uid), Ok(AccountType::Expense));
        assert_eq!(adapter.get_all_records().unwrap().len(), 3);
    }

    #[test]
    fn lookups_return_stored_properties() {
        let adapter = get_test_adapter();
        let mut account = Account::new("Yen", Commodity::new("JPY").unwrap())
            .unwrap()
            .with_type(AccountType::Currency);
        account.set_placeholder(true);
        adapter.add_record(&account).unwrap();

        assert_eq!(
            adapter.get_commodity(account.uid()),
            Ok(Commodity::new("JPY").unwrap())
        );
        assert_eq!(adapter.get_account_type(account.uid()), Ok(AccountType::Currency));
        assert_eq!(adapter.is_placeholder_account(account.uid()), Ok(true));
    }
}
