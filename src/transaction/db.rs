//! Database operations for transactions and their splits.

use rusqlite::{Connection, Row};

use crate::{
    Account, Error, Money, ReconcileState, Split, Transaction, TransactionType,
    account::db::{get_account_commodity, get_descendant_uids, get_or_create_imbalance_account_uid},
    money::Commodity,
    uid::Uid,
};

/// Create the transaction and split tables and their indexes.
pub fn create_transaction_tables(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS transactions (
            uid TEXT PRIMARY KEY NOT NULL,
            description TEXT NOT NULL,
            notes TEXT,
            currency TEXT NOT NULL,
            date TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS splits (
            uid TEXT PRIMARY KEY NOT NULL,
            transaction_uid TEXT NOT NULL,
            account_uid TEXT NOT NULL,
            type TEXT NOT NULL,
            value_num INTEGER NOT NULL,
            value_denom INTEGER NOT NULL,
            quantity_num INTEGER NOT NULL,
            quantity_denom INTEGER NOT NULL,
            quantity_commodity TEXT NOT NULL,
            memo TEXT,
            reconcile_state TEXT NOT NULL DEFAULT 'n',
            FOREIGN KEY(transaction_uid) REFERENCES transactions(uid) ON DELETE CASCADE,
            FOREIGN KEY(account_uid) REFERENCES accounts(uid)
        );

        CREATE INDEX IF NOT EXISTS idx_splits_transaction_uid ON splits(transaction_uid);
        CREATE INDEX IF NOT EXISTS idx_splits_account_uid ON splits(account_uid);",
    )?;

    Ok(())
}

/// Insert the transaction and its splits, replacing any previous version.
///
/// If the splits do not balance, a split for the difference is posted to the
/// imbalance account for the transaction's currency.
///
/// # Errors
/// This function will return a:
/// - [Error::EmptyTransaction] if the transaction has no splits,
/// - [Error::InvalidAccount] if a split refers to an account that does not exist,
/// - [Error::CurrencyMismatch] if a split value is not in the transaction's currency
///   or a split quantity is not in the currency of its account,
/// - [Error::AmountOverflow] if the split values cannot be summed,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn save_transaction(transaction: &Transaction, connection: &Connection) -> Result<(), Error> {
    if transaction.splits().is_empty() {
        return Err(Error::EmptyTransaction);
    }

    for split in transaction.splits() {
        let account_commodity = get_account_commodity(split.account_uid(), connection)?;
        let quantity_commodity = split.quantity().commodity();

        if quantity_commodity != &account_commodity {
            return Err(Error::CurrencyMismatch {
                expected: account_commodity.mnemonic().to_owned(),
                found: quantity_commodity.mnemonic().to_owned(),
            });
        }
    }

    let imbalance = transaction.imbalance()?;
    let balancing_split = if imbalance.is_zero() {
        None
    } else {
        let imbalance_uid =
            get_or_create_imbalance_account_uid(transaction.commodity(), connection)?;
        tracing::info!(
            "Transaction {} is out of balance by {imbalance}, posting the difference to the imbalance account",
            transaction.uid()
        );

        let mut split = Split::new(-imbalance, imbalance_uid);
        split.transaction_uid = Some(transaction.uid().clone());
        Some(split)
    };

    connection.execute(
        "INSERT INTO transactions (uid, description, notes, currency, date)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(uid) DO UPDATE SET
            description = excluded.description,
            notes = excluded.notes,
            currency = excluded.currency,
            date = excluded.date",
        (
            transaction.uid(),
            transaction.description(),
            transaction.notes(),
            transaction.commodity(),
            transaction.date(),
        ),
    )?;
    connection.execute(
        "DELETE FROM splits WHERE transaction_uid = ?1",
        [transaction.uid()],
    )?;

    let mut statement = connection.prepare(
        "INSERT INTO splits (uid, transaction_uid, account_uid, type, value_num, value_denom,
            quantity_num, quantity_denom, quantity_commodity, memo, reconcile_state)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
    )?;

    for split in transaction.splits().iter().chain(balancing_split.iter()) {
        statement.execute((
            split.uid(),
            transaction.uid(),
            split.account_uid(),
            split.split_type(),
            split.value().numerator()?,
            split.value().denominator(),
            split.quantity().numerator()?,
            split.quantity().denominator(),
            split.quantity().commodity(),
            split.memo(),
            split.reconcile_state(),
        ))?;
    }

    tracing::debug!(
        "Saved transaction {} with {} splits",
        transaction.uid(),
        transaction.splits().len() + balancing_split.iter().count()
    );

    Ok(())
}

/// Retrieve a transaction and its splits by UID.
pub fn get_transaction(uid: &Uid, connection: &Connection) -> Result<Transaction, Error> {
    let mut transaction = connection
        .prepare("SELECT uid, description, notes, currency, date FROM transactions WHERE uid = ?1")?
        .query_row([uid], map_transaction_row)?;

    transaction.splits = get_splits_for_transaction(&transaction, connection)?;

    Ok(transaction)
}

/// Retrieve the transactions with at least one split posted to `account_uid`,
/// ordered by date.
pub fn get_transactions_for_account(
    account_uid: &Uid,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let transactions: Vec<Transaction> = connection
        .prepare(
            "SELECT t.uid, t.description, t.notes, t.currency, t.date FROM transactions t
            WHERE t.uid IN (SELECT transaction_uid FROM splits WHERE account_uid = ?1)
            ORDER BY t.date ASC, t.uid ASC",
        )?
        .query_map([account_uid], map_transaction_row)?
        .collect::<Result<_, _>>()?;

    transactions
        .into_iter()
        .map(|mut transaction| {
            transaction.splits = get_splits_for_transaction(&transaction, connection)?;
            Ok(transaction)
        })
        .collect()
}

/// Count the transactions with at least one split posted to `account_uid`.
pub fn count_transactions_for_account(
    account_uid: &Uid,
    connection: &Connection,
) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(DISTINCT transaction_uid) FROM splits WHERE account_uid = ?1",
            [account_uid],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Delete a transaction and its splits.
///
/// # Errors
/// This function will return an [Error::DeleteMissingTransaction] if the transaction does not exist.
pub fn delete_transaction(uid: &Uid, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM transactions WHERE uid = ?1", [uid])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Delete every transaction with a split posted to `account_uid` or, if
/// `include_descendants` is set, to any account below it.
pub fn delete_transactions_for_account(
    account_uid: &Uid,
    include_descendants: bool,
    connection: &Connection,
) -> Result<usize, Error> {
    let deleted = if include_descendants {
        connection.execute(
            "WITH RECURSIVE subtree(uid) AS (
                SELECT ?1
                UNION ALL
                SELECT a.uid FROM accounts a JOIN subtree s ON a.parent_uid = s.uid
            )
            DELETE FROM transactions WHERE uid IN (
                SELECT transaction_uid FROM splits WHERE account_uid IN subtree
            )",
            [account_uid],
        )?
    } else {
        connection.execute(
            "DELETE FROM transactions WHERE uid IN (
                SELECT transaction_uid FROM splits WHERE account_uid = ?1
            )",
            [account_uid],
        )?
    };

    Ok(deleted)
}

/// Compute the balance of `account` and every account below it that is in
/// the same currency.
///
/// The result is in the account's currency and follows the sign convention
/// of the account type: see [AccountType::has_debit_normal_balance](crate::AccountType::has_debit_normal_balance).
pub fn compute_account_balance(account: &Account, connection: &Connection) -> Result<Money, Error> {
    let mut account_uids = vec![account.uid().clone()];
    account_uids.extend(get_descendant_uids(account.uid(), connection)?);

    let mut statement = connection.prepare(
        "SELECT s.type, s.quantity_num, s.quantity_denom, s.quantity_commodity, a.commodity
        FROM splits s JOIN accounts a ON a.uid = s.account_uid
        WHERE s.account_uid = ?1",
    )?;
    let mut total = Money::zero(account.commodity().clone());

    for account_uid in &account_uids {
        let rows = statement.query_map([account_uid], |row| {
            Ok((
                row.get::<_, TransactionType>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, Commodity>(3)?,
                row.get::<_, Commodity>(4)?,
            ))
        })?;

        for row in rows {
            let (split_type, numerator, denominator, quantity_commodity, account_commodity) = row?;

            if &account_commodity != account.commodity()
                || quantity_commodity != account_commodity
            {
                tracing::warn!(
                    "Skipping a {quantity_commodity} split in account {account_uid} \
                    when computing the {} balance of {}",
                    account.commodity(),
                    account.full_name()
                );
                continue;
            }

            let quantity = Money::from_fraction(numerator, denominator, quantity_commodity)?;
            total = match split_type {
                TransactionType::Debit => total.checked_add(&quantity)?,
                TransactionType::Credit => total.checked_sub(&quantity)?,
            };
        }
    }

    if account.account_type().has_debit_normal_balance() {
        Ok(total)
    } else {
        Ok(-total)
    }
}

fn get_splits_for_transaction(
    transaction: &Transaction,
    connection: &Connection,
) -> Result<Vec<Split>, Error> {
    let commodity = transaction.commodity().clone();

    let rows: Vec<SplitRow> = connection
        .prepare(
            "SELECT uid, transaction_uid, account_uid, type, value_num, value_denom,
                quantity_num, quantity_denom, quantity_commodity, memo, reconcile_state
            FROM splits WHERE transaction_uid = ?1 ORDER BY rowid ASC",
        )?
        .query_map([transaction.uid()], map_split_row)?
        .collect::<Result<_, _>>()?;

    rows.into_iter()
        .map(|row| row.into_split(commodity.clone()))
        .collect()
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        uid: row.get(0)?,
        description: row.get(1)?,
        notes: row.get(2)?,
        commodity: row.get(3)?,
        date: row.get(4)?,
        splits: Vec::new(),
    })
}

/// The columns of a split row, before the amounts are turned into [Money].
struct SplitRow {
    uid: Uid,
    transaction_uid: Uid,
    account_uid: Uid,
    split_type: TransactionType,
    value: (i64, i64),
    quantity: (i64, i64),
    quantity_commodity: Commodity,
    memo: Option<String>,
    reconcile_state: ReconcileState,
}

impl SplitRow {
    fn into_split(self, value_commodity: Commodity) -> Result<Split, Error> {
        Ok(Split {
            uid: self.uid,
            value: Money::from_fraction(self.value.0, self.value.1, value_commodity)?,
            quantity: Money::from_fraction(
                self.quantity.0,
                self.quantity.1,
                self.quantity_commodity,
            )?,
            split_type: self.split_type,
            memo: self.memo,
            account_uid: self.account_uid,
            transaction_uid: Some(self.transaction_uid),
            reconcile_state: self.reconcile_state,
        })
    }
}

fn map_split_row(row: &Row) -> Result<SplitRow, rusqlite::Error> {
    Ok(SplitRow {
        uid: row.get(0)?,
        transaction_uid: row.get(1)?,
        account_uid: row.get(2)?,
        split_type: row.get(3)?,
        value: (row.get(4)?, row.get(5)?),
        quantity: (row.get(6)?, row.get(7)?),
        quantity_commodity: row.get(8)?,
        memo: row.get(9)?,
        reconcile_state: row.get(10)?,
    })
}
