//! Defines the core account models.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::{Error, Money, Transaction, money::Commodity, uid::Uid};

/// Separates the names of ancestors in an account's full name, e.g. "Assets:Current Assets:Cash".
pub const ACCOUNT_NAME_SEPARATOR: char = ':';

/// The name given to the root account when it is created.
pub const ROOT_ACCOUNT_NAME: &str = "Root Account";

// ============================================================================
// ACCOUNT TYPE
// ============================================================================

/// The kind of an account, which decides the sign of its balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Cash in a wallet or on hand.
    Cash,
    /// A bank account, e.g. checking or savings.
    Bank,
    /// A credit card.
    Credit,
    /// Anything owned that is not cash or a bank account.
    Asset,
    /// Money owed, e.g. a loan.
    Liability,
    /// Money earned, e.g. salary.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
    /// Bills to pay.
    Payable,
    /// Invoices to be paid to you.
    Receivable,
    /// Opening balances and retained earnings.
    Equity,
    /// Holdings of a foreign currency.
    Currency,
    /// Shares of a single company.
    Stock,
    /// Shares of a mutual fund.
    Mutual,
    /// Used for trading between commodities.
    Trading,
    /// The root of the account tree. There is only one.
    Root,
}

impl AccountType {
    /// All account types, in the order they are usually presented.
    pub const ALL: [AccountType; 15] = [
        AccountType::Cash,
        AccountType::Bank,
        AccountType::Credit,
        AccountType::Asset,
        AccountType::Liability,
        AccountType::Income,
        AccountType::Expense,
        AccountType::Payable,
        AccountType::Receivable,
        AccountType::Equity,
        AccountType::Currency,
        AccountType::Stock,
        AccountType::Mutual,
        AccountType::Trading,
        AccountType::Root,
    ];

    /// Whether debits increase the balance of this kind of account.
    ///
    /// For all other types, credits increase the balance.
    pub fn has_debit_normal_balance(&self) -> bool {
        matches!(
            self,
            AccountType::Cash
                | AccountType::Bank
                | AccountType::Asset
                | AccountType::Expense
                | AccountType::Receivable
                | AccountType::Stock
                | AccountType::Mutual
                | AccountType::Trading
        )
    }

    /// The upper case name of the account type, e.g. "CASH".
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Cash => "CASH",
            AccountType::Bank => "BANK",
            AccountType::Credit => "CREDIT",
            AccountType::Asset => "ASSET",
            AccountType::Liability => "LIABILITY",
            AccountType::Income => "INCOME",
            AccountType::Expense => "EXPENSE",
            AccountType::Payable => "PAYABLE",
            AccountType::Receivable => "RECEIVABLE",
            AccountType::Equity => "EQUITY",
            AccountType::Currency => "CURRENCY",
            AccountType::Stock => "STOCK",
            AccountType::Mutual => "MUTUAL",
            AccountType::Trading => "TRADING",
            AccountType::Root => "ROOT",
        }
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();

        AccountType::ALL
            .into_iter()
            .find(|account_type| account_type.as_str() == upper)
            .ok_or_else(|| Error::InvalidAccountType(s.to_owned()))
    }
}

impl Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for AccountType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for AccountType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        AccountType::from_str(value.as_str()?).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

// ============================================================================
// ACCOUNT
// ============================================================================

/// A named bucket of money in the ledger, e.g. "Cash in Wallet" or "Groceries".
///
/// Accounts form a tree. An account's full name is the names of its
/// ancestors and itself joined with [ACCOUNT_NAME_SEPARATOR], excluding the
/// root account. The full name is recomputed when the account is saved with
/// an [AccountStore](crate::AccountStore).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub(crate) uid: Uid,
    pub(crate) name: String,
    pub(crate) full_name: String,
    pub(crate) description: String,
    pub(crate) code: Option<String>,
    pub(crate) commodity: Commodity,
    pub(crate) account_type: AccountType,
    pub(crate) parent_uid: Option<Uid>,
    pub(crate) default_transfer_uid: Option<Uid>,
    pub(crate) color: Option<String>,
    pub(crate) placeholder: bool,
    pub(crate) hidden: bool,
    pub(crate) favorite: bool,
    #[serde(skip)]
    pub(crate) transactions: Vec<Transaction>,
}

impl Account {
    /// Create a new top level [AccountType::Cash] account with a fresh UID.
    ///
    /// # Errors
    ///
    /// This function will return a:
    /// - [Error::EmptyAccountName] if `name` is empty,
    /// - or [Error::InvalidAccountName] if `name` contains [ACCOUNT_NAME_SEPARATOR].
    pub fn new(name: &str, commodity: Commodity) -> Result<Self, Error> {
        let name = validate_account_name(name)?;

        Ok(Self {
            uid: Uid::generate(),
            full_name: name.clone(),
            name,
            description: String::new(),
            code: None,
            commodity,
            account_type: AccountType::Cash,
            parent_uid: None,
            default_transfer_uid: None,
            color: None,
            placeholder: false,
            hidden: false,
            favorite: false,
            transactions: Vec::new(),
        })
    }

    /// Set the account type, for chaining after [Account::new].
    pub fn with_type(mut self, account_type: AccountType) -> Self {
        self.account_type = account_type;
        self
    }

    /// Set the parent account, for chaining after [Account::new].
    pub fn with_parent(mut self, parent_uid: Uid) -> Self {
        self.parent_uid = Some(parent_uid);
        self
    }

    /// The unique identifier of the account.
    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    /// Replace the unique identifier of the account.
    pub fn set_uid(&mut self, uid: Uid) {
        self.uid = uid;
    }

    /// The short name of the account, e.g. "Cash".
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the account.
    ///
    /// # Errors
    ///
    /// See [Account::new] for the naming rules.
    pub fn set_name(&mut self, name: &str) -> Result<(), Error> {
        self.name = validate_account_name(name)?;
        Ok(())
    }

    /// The name of the account prefixed with the names of its ancestors,
    /// e.g. "Assets:Current Assets:Cash".
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Override the full name.
    ///
    /// Saving the account recomputes the full name from the account tree.
    pub fn set_full_name(&mut self, full_name: &str) {
        self.full_name = full_name.to_owned();
    }

    /// A free text description of the account.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Set the free text description of the account.
    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_owned();
    }

    /// An optional user defined account code, e.g. "1010".
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Set or clear the account code.
    pub fn set_code(&mut self, code: Option<&str>) {
        self.code = code.map(str::to_owned);
    }

    /// The currency of the account.
    pub fn commodity(&self) -> &Commodity {
        &self.commodity
    }

    /// Change the currency of the account.
    pub fn set_commodity(&mut self, commodity: Commodity) {
        self.commodity = commodity;
    }

    /// The kind of account.
    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Change the kind of account.
    pub fn set_account_type(&mut self, account_type: AccountType) {
        self.account_type = account_type;
    }

    /// The UID of the parent account, if any.
    pub fn parent_uid(&self) -> Option<&Uid> {
        self.parent_uid.as_ref()
    }

    /// Set or clear the parent account.
    pub fn set_parent_uid(&mut self, parent_uid: Option<Uid>) {
        self.parent_uid = parent_uid;
    }

    /// The account that transfers from this account go to by default.
    pub fn default_transfer_uid(&self) -> Option<&Uid> {
        self.default_transfer_uid.as_ref()
    }

    /// Set or clear the default transfer account.
    pub fn set_default_transfer_uid(&mut self, uid: Option<Uid>) {
        self.default_transfer_uid = uid;
    }

    /// The display color of the account as "#RRGGBB".
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// Set or clear the display color.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidColor] if `color` is not of the form "#RRGGBB".
    pub fn set_color(&mut self, color: Option<&str>) -> Result<(), Error> {
        self.color = match color {
            Some(color) => Some(validate_color(color)?),
            None => None,
        };

        Ok(())
    }

    /// Whether the account only groups other accounts and should not hold
    /// transactions itself.
    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Mark the account as a placeholder, or not.
    pub fn set_placeholder(&mut self, placeholder: bool) {
        self.placeholder = placeholder;
    }

    /// Whether the account is hidden from listings.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Hide or show the account.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Whether the account has been flagged as a favorite.
    pub fn is_favorite(&self) -> bool {
        self.favorite
    }

    /// Flag or unflag the account as a favorite.
    pub fn set_favorite(&mut self, favorite: bool) {
        self.favorite = favorite;
    }

    /// Attach a transaction to the account.
    ///
    /// Attached transactions are saved along with the account.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// The transactions attached to the account, in the order they were added.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The number of transactions attached to the account.
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// The balance of the attached transactions.
    ///
    /// Only splits posted to this account count. The sign follows the account
    /// type, so spending from a cash account lowers its balance and earning
    /// income raises the balance of an income account.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::CurrencyMismatch] if a split
    /// posted to this account has a quantity in a different currency.
    pub fn balance(&self) -> Result<Money, Error> {
        self.transactions.iter().try_fold(
            Money::zero(self.commodity.clone()),
            |total, transaction| {
                let balance =
                    transaction.balance_for_account(&self.uid, self.account_type, &self.commodity)?;

                total.checked_add(&balance)
            },
        )
    }
}

/// Trim `name` and check that it can be used as an account name.
pub(crate) fn validate_account_name(name: &str) -> Result<String, Error> {
    let name = name.trim();

    if name.is_empty() {
        Err(Error::EmptyAccountName)
    } else if name.contains(ACCOUNT_NAME_SEPARATOR) {
        Err(Error::InvalidAccountName(name.to_owned()))
    } else {
        Ok(name.to_owned())
    }
}

fn validate_color(color: &str) -> Result<String, Error> {
    let color = color.trim();
    let is_valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());

    if is_valid {
        Ok(color.to_ascii_uppercase())
    } else {
        Err(Error::InvalidColor(color.to_owned()))
    }
}
