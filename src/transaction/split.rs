//! Splits: one leg of a transaction, posting money to a single account.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::{Money, uid::Uid};

/// Which side of an account a split is posted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Increases asset and expense accounts.
    Debit,
    /// Increases liability, income and equity accounts.
    Credit,
}

impl TransactionType {
    /// The opposite side.
    pub fn invert(&self) -> Self {
        match self {
            TransactionType::Debit => TransactionType::Credit,
            TransactionType::Credit => TransactionType::Debit,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "DEBIT",
            TransactionType::Credit => "CREDIT",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "DEBIT" => Ok(TransactionType::Debit),
            "CREDIT" => Ok(TransactionType::Credit),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// Whether a split has been checked against a bank statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReconcileState {
    /// Not checked yet.
    #[default]
    NotReconciled,
    /// Seen on the statement but not yet reconciled.
    Cleared,
    /// Matched against the statement.
    Reconciled,
}

impl ReconcileState {
    fn as_str(&self) -> &'static str {
        match self {
            ReconcileState::NotReconciled => "n",
            ReconcileState::Cleared => "c",
            ReconcileState::Reconciled => "y",
        }
    }
}

impl ToSql for ReconcileState {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ReconcileState {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "n" => Ok(ReconcileState::NotReconciled),
            "c" => Ok(ReconcileState::Cleared),
            "y" => Ok(ReconcileState::Reconciled),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// One leg of a transaction.
///
/// The value is in the currency of the transaction and the quantity is in the
/// currency of the account. The two only differ for transfers between
/// currencies. Both are stored as non-negative amounts, the direction is given
/// by the [TransactionType].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub(crate) uid: Uid,
    pub(crate) value: Money,
    pub(crate) quantity: Money,
    pub(crate) split_type: TransactionType,
    pub(crate) memo: Option<String>,
    pub(crate) account_uid: Uid,
    pub(crate) transaction_uid: Option<Uid>,
    pub(crate) reconcile_state: ReconcileState,
}

impl Split {
    /// Post `amount` to the account `account_uid`.
    ///
    /// Non-negative amounts are debits and negative amounts are credits. The
    /// quantity is the same as the value, use [Split::set_quantity] for
    /// transfers between currencies.
    pub fn new(amount: Money, account_uid: Uid) -> Self {
        let split_type = if amount.is_negative() {
            TransactionType::Credit
        } else {
            TransactionType::Debit
        };
        let amount = amount.abs();

        Self {
            uid: Uid::generate(),
            quantity: amount.clone(),
            value: amount,
            split_type,
            memo: None,
            account_uid,
            transaction_uid: None,
            reconcile_state: ReconcileState::default(),
        }
    }

    /// Create the other side of this split, posting the same amount in the
    /// opposite direction to `account_uid`.
    pub fn create_pair(&self, account_uid: Uid) -> Self {
        Self {
            uid: Uid::generate(),
            value: self.value.clone(),
            quantity: self.value.clone(),
            split_type: self.split_type.invert(),
            memo: self.memo.clone(),
            account_uid,
            transaction_uid: self.transaction_uid.clone(),
            reconcile_state: ReconcileState::default(),
        }
    }

    /// The unique identifier of the split.
    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    /// The amount in the transaction's currency.
    pub fn value(&self) -> &Money {
        &self.value
    }

    /// Set the amount in the transaction's currency. The sign is discarded.
    pub fn set_value(&mut self, value: Money) {
        self.value = value.abs();
    }

    /// The amount in the account's currency.
    pub fn quantity(&self) -> &Money {
        &self.quantity
    }

    /// Set the amount in the account's currency. The sign is discarded.
    pub fn set_quantity(&mut self, quantity: Money) {
        self.quantity = quantity.abs();
    }

    /// Whether the split is a debit or a credit.
    pub fn split_type(&self) -> TransactionType {
        self.split_type
    }

    /// Change the direction of the split.
    pub fn set_split_type(&mut self, split_type: TransactionType) {
        self.split_type = split_type;
    }

    /// The value with debits positive and credits negative.
    pub fn signed_value(&self) -> Money {
        self.apply_sign(&self.value)
    }

    /// The quantity with debits positive and credits negative.
    pub fn signed_quantity(&self) -> Money {
        self.apply_sign(&self.quantity)
    }

    /// A note about this leg of the transaction.
    pub fn memo(&self) -> Option<&str> {
        self.memo.as_deref()
    }

    /// Set or clear the memo.
    pub fn set_memo(&mut self, memo: Option<&str>) {
        self.memo = memo.map(str::to_owned);
    }

    /// The account the split posts to.
    pub fn account_uid(&self) -> &Uid {
        &self.account_uid
    }

    /// Post the split to a different account.
    pub fn set_account_uid(&mut self, account_uid: Uid) {
        self.account_uid = account_uid;
    }

    /// The transaction the split belongs to, once it has been added to one.
    pub fn transaction_uid(&self) -> Option<&Uid> {
        self.transaction_uid.as_ref()
    }

    /// Whether the split has been reconciled.
    pub fn reconcile_state(&self) -> ReconcileState {
        self.reconcile_state
    }

    /// Change the reconcile state.
    pub fn set_reconcile_state(&mut self, reconcile_state: ReconcileState) {
        self.reconcile_state = reconcile_state;
    }

    fn apply_sign(&self, amount: &Money) -> Money {
        match self.split_type {
            TransactionType::Debit => amount.clone(),
            TransactionType::Credit => -amount.clone(),
        }
    }
}
