//! Defines the transaction model.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::{AccountType, Error, Money, Split, money::Commodity, uid::Uid};

/// A balanced set of splits recorded against one or more accounts, e.g.
/// paying for groceries with cash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub(crate) uid: Uid,
    pub(crate) description: String,
    pub(crate) notes: Option<String>,
    pub(crate) commodity: Commodity,
    pub(crate) date: Date,
    pub(crate) splits: Vec<Split>,
}

impl Transaction {
    /// Create a transaction without any splits.
    pub fn new(description: &str, commodity: Commodity, date: Date) -> Self {
        Self {
            uid: Uid::generate(),
            description: description.to_owned(),
            notes: None,
            commodity,
            date,
            splits: Vec::new(),
        }
    }

    /// The unique identifier of the transaction.
    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    /// What the transaction was for.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Change the description.
    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_owned();
    }

    /// Free text notes.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Set or clear the notes.
    pub fn set_notes(&mut self, notes: Option<&str>) {
        self.notes = notes.map(str::to_owned);
    }

    /// The currency that split values are expressed in.
    pub fn commodity(&self) -> &Commodity {
        &self.commodity
    }

    /// When the transaction happened.
    pub fn date(&self) -> Date {
        self.date
    }

    /// Change when the transaction happened.
    pub fn set_date(&mut self, date: Date) {
        self.date = date;
    }

    /// Add a split to the transaction.
    pub fn add_split(&mut self, mut split: Split) {
        split.transaction_uid = Some(self.uid.clone());
        self.splits.push(split);
    }

    /// The splits of the transaction, in the order they were added.
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// The sum of the signed split values.
    ///
    /// Zero for a balanced transaction. Positive means there are more debits
    /// than credits.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::CurrencyMismatch] if a split
    /// value is not in the transaction's currency.
    pub fn imbalance(&self) -> Result<Money, Error> {
        self.splits
            .iter()
            .try_fold(Money::zero(self.commodity.clone()), |total, split| {
                total.checked_add(&split.signed_value())
            })
    }

    /// Whether debits and credits cancel out.
    ///
    /// # Errors
    ///
    /// See [Transaction::imbalance].
    pub fn is_balanced(&self) -> Result<bool, Error> {
        Ok(self.imbalance()?.is_zero())
    }

    /// The change this transaction makes to the balance of an account.
    ///
    /// Sums the signed quantities of the splits posted to `account_uid`.
    /// For accounts with a credit normal balance the sum is negated, so
    /// that earning income is a positive change to an income account.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::CurrencyMismatch] if a matching
    /// split has a quantity that is not in `commodity`.
    pub fn balance_for_account(
        &self,
        account_uid: &Uid,
        account_type: AccountType,
        commodity: &Commodity,
    ) -> Result<Money, Error> {
        let total = self
            .splits
            .iter()
            .filter(|split| split.account_uid() == account_uid)
            .try_fold(Money::zero(commodity.clone()), |total, split| {
                total.checked_add(&split.signed_quantity())
            })?;

        if account_type.has_debit_normal_balance() {
            Ok(total)
        } else {
            Ok(-total)
        }
    }
}

#[cfg(test)]
mod transaction_tests {
    use time::macros::date;

    use crate::{AccountType, Commodity, Error, Money, Split, Transaction, Uid};

    fn usd(amount: &str) -> Money {
        Money::new(amount, "USD").unwrap()
    }

    #[test]
    fn add_split_stamps_transaction_uid() {
        let mut transaction =
            Transaction::new("Groceries", Commodity::usd(), date!(2025 - 03 - 01));

        transaction.add_split(Split::new(usd("5"), Uid::generate()));

        assert_eq!(
            transaction.splits()[0].transaction_uid(),
            Some(transaction.uid())
        );
    }

    #[test]
    fn transaction_with_matching_debits_and_credits_is_balanced() {
        let mut transaction =
            Transaction::new("Groceries", Commodity::usd(), date!(2025 - 03 - 01));
        let split = Split::new(usd("-42.10"), Uid::generate());
        let pair = split.create_pair(Uid::generate());
        transaction.add_split(split);
        transaction.add_split(pair);

        assert_eq!(transaction.is_balanced(), Ok(true));
        assert_eq!(transaction.imbalance(), Ok(Money::zero(Commodity::usd())));
    }

    #[test]
    fn single_split_is_unbalanced() {
        let mut transaction = Transaction::new("Gift", Commodity::usd(), date!(2025 - 03 - 01));
        transaction.add_split(Split::new(usd("5"), Uid::generate()));

        assert_eq!(transaction.is_balanced(), Ok(false));
        assert_eq!(transaction.imbalance(), Ok(usd("5")));
    }

    #[test]
    fn imbalance_fails_on_foreign_split_value() {
        let mut transaction = Transaction::new("Trip", Commodity::usd(), date!(2025 - 03 - 01));
        transaction.add_split(Split::new(Money::new("5", "EUR").unwrap(), Uid::generate()));

        assert_eq!(
            transaction.imbalance(),
            Err(Error::CurrencyMismatch {
                expected: "USD".to_owned(),
                found: "EUR".to_owned()
            })
        );
    }

    #[test]
    fn balance_for_account_ignores_other_accounts() {
        let cash = Uid::generate();
        let mut transaction =
            Transaction::new("Groceries", Commodity::usd(), date!(2025 - 03 - 01));
        let split = Split::new(usd("-20"), cash.clone());
        let pair = split.create_pair(Uid::generate());
        transaction.add_split(split);
        transaction.add_split(pair);

        let balance = transaction.balance_for_account(&cash, AccountType::Cash, &Commodity::usd());

        assert_eq!(balance, Ok(usd("-20")));
    }

    #[test]
    fn balance_for_credit_normal_account_is_negated() {
        let card = Uid::generate();
        let mut transaction = Transaction::new("Dinner", Commodity::usd(), date!(2025 - 03 - 01));
        transaction.add_split(Split::new(usd("-60"), card.clone()));

        let balance =
            transaction.balance_for_account(&card, AccountType::Credit, &Commodity::usd());

        assert_eq!(balance, Ok(usd("60")));
    }
}
