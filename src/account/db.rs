//! Database operations for accounts.
//!
//! These functions work on a plain [Connection] so they can be composed inside
//! a single SQL transaction by the [AccountsDbAdapter](crate::AccountsDbAdapter).

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error,
    account::{
        ACCOUNT_NAME_SEPARATOR, Account, AccountType, ROOT_ACCOUNT_NAME, validate_account_name,
    },
    money::Commodity,
    uid::Uid,
};

const SELECT_ACCOUNT: &str = "SELECT uid, name, full_name, description, code, commodity, type, \
    parent_uid, default_transfer_uid, color, placeholder, hidden, favorite FROM accounts";

/// Create the account table and its indexes.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS accounts (
            uid TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            full_name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            code TEXT,
            commodity TEXT NOT NULL,
            type TEXT NOT NULL,
            parent_uid TEXT,
            default_transfer_uid TEXT,
            color TEXT,
            placeholder INTEGER NOT NULL DEFAULT 0,
            hidden INTEGER NOT NULL DEFAULT 0,
            favorite INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY(parent_uid) REFERENCES accounts(uid) ON UPDATE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_accounts_parent_uid ON accounts(parent_uid);
        CREATE INDEX IF NOT EXISTS idx_accounts_full_name ON accounts(full_name);",
    )?;

    Ok(())
}

/// Retrieve a single account by UID, without its transactions.
pub fn get_account(uid: &Uid, connection: &Connection) -> Result<Account, Error> {
    connection
        .prepare(&format!("{SELECT_ACCOUNT} WHERE uid = ?1"))?
        .query_row([uid], map_account_row)
        .map_err(|error| error.into())
}

/// Whether an account with `uid` exists.
pub fn account_exists(uid: &Uid, connection: &Connection) -> Result<bool, Error> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE uid = ?1)",
            [uid],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// The currency of the account `uid`.
///
/// # Errors
/// This function will return an [Error::InvalidAccount] if the account does not exist.
pub fn get_account_commodity(uid: &Uid, connection: &Connection) -> Result<Commodity, Error> {
    connection
        .query_row(
            "SELECT commodity FROM accounts WHERE uid = ?1",
            [uid],
            |row| row.get(0),
        )
        .optional()?
        .ok_or(Error::InvalidAccount)
}

/// Retrieve every account except the root, ordered by full name.
pub fn get_all_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_ACCOUNT} WHERE type != 'ROOT' ORDER BY full_name ASC"
        ))?
        .query_map([], map_account_row)?
        .map(|maybe_account| maybe_account.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the direct children of the account `parent_uid`, ordered by name.
pub fn get_child_accounts(
    parent_uid: &Uid,
    connection: &Connection,
) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_ACCOUNT} WHERE parent_uid = ?1 ORDER BY name ASC"
        ))?
        .query_map([parent_uid], map_account_row)?
        .map(|maybe_account| maybe_account.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the accounts flagged as favorite, ordered by full name.
pub fn get_favorite_accounts(connection: &Connection) -> Result<Vec<Account>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_ACCOUNT} WHERE favorite = 1 ORDER BY full_name ASC"
        ))?
        .query_map([], map_account_row)?
        .map(|maybe_account| maybe_account.map_err(|error| error.into()))
        .collect()
}

/// Retrieve the UIDs of all accounts below `uid` in the tree, nearest first.
pub fn get_descendant_uids(uid: &Uid, connection: &Connection) -> Result<Vec<Uid>, Error> {
    connection
        .prepare(
            "WITH RECURSIVE descendants(uid, depth) AS (
                SELECT uid, 1 FROM accounts WHERE parent_uid = ?1
                UNION ALL
                SELECT a.uid, d.depth + 1 FROM accounts a JOIN descendants d ON a.parent_uid = d.uid
            )
            SELECT uid FROM descendants ORDER BY depth ASC",
        )?
        .query_map([uid], |row| row.get(0))?
        .map(|maybe_uid| maybe_uid.map_err(|error| error.into()))
        .collect()
}

/// Find the child of `parent_uid` called `name`.
pub fn find_child_by_name(
    parent_uid: &Uid,
    name: &str,
    connection: &Connection,
) -> Result<Option<Account>, Error> {
    connection
        .prepare(&format!(
            "{SELECT_ACCOUNT} WHERE parent_uid = ?1 AND name = ?2"
        ))?
        .query_row((parent_uid, name), map_account_row)
        .optional()
        .map_err(|error| error.into())
}

/// Insert the account or update it if it already exists.
///
/// Accounts without a parent are attached to the root account, which is
/// created if needed. The full name is derived from the parent chain and the
/// full names of any descendants are refreshed when it changes.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidParentAccount] if the parent does not exist,
/// - [Error::AccountCycle] if the parent is the account itself or one of its descendants,
/// - [Error::InvalidParentAccount] if a root account is given a parent,
/// - [Error::DuplicateRootAccount] if a different root account already exists,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn save_account(account: &Account, connection: &Connection) -> Result<(), Error> {
    let parent_uid = match (account.parent_uid(), account.account_type()) {
        (Some(parent_uid), AccountType::Root) => {
            return Err(Error::InvalidParentAccount(parent_uid.clone()));
        }
        (None, AccountType::Root) => match find_root_account_uid(connection)? {
            Some(root_uid) if &root_uid != account.uid() => {
                return Err(Error::DuplicateRootAccount);
            }
            _ => None,
        },
        (Some(parent_uid), _) => Some(parent_uid.clone()),
        (None, _) => Some(get_or_create_root_account_uid(connection)?),
    };

    if let Some(parent_uid) = &parent_uid {
        if parent_uid == account.uid()
            || get_descendant_uids(account.uid(), connection)?.contains(parent_uid)
        {
            return Err(Error::AccountCycle(account.uid().clone()));
        }
    }

    let full_name = compute_full_name(parent_uid.as_ref(), account.name(), connection)?;
    let previous_full_name: Option<String> = connection
        .query_row(
            "SELECT full_name FROM accounts WHERE uid = ?1",
            [account.uid()],
            |row| row.get(0),
        )
        .optional()?;

    connection.execute(
        "INSERT INTO accounts (uid, name, full_name, description, code, commodity, type,
            parent_uid, default_transfer_uid, color, placeholder, hidden, favorite)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
        ON CONFLICT(uid) DO UPDATE SET
            name = excluded.name,
            full_name = excluded.full_name,
            description = excluded.description,
            code = excluded.code,
            commodity = excluded.commodity,
            type = excluded.type,
            parent_uid = excluded.parent_uid,
            default_transfer_uid = excluded.default_transfer_uid,
            color = excluded.color,
            placeholder = excluded.placeholder,
            hidden = excluded.hidden,
            favorite = excluded.favorite",
        (
            account.uid(),
            account.name(),
            &full_name,
            account.description(),
            account.code(),
            account.commodity(),
            account.account_type(),
            parent_uid.as_ref(),
            account.default_transfer_uid(),
            account.color(),
            account.is_placeholder(),
            account.is_hidden(),
            account.is_favorite(),
        ),
    )?;

    match previous_full_name {
        Some(previous) if previous != full_name => {
            tracing::debug!("Account renamed from {previous:?} to {full_name:?}");
            refresh_descendant_full_names(account.uid(), connection)?;
        }
        _ => {}
    }

    Ok(())
}

/// Derive the full name of an account called `name` under `parent_uid`.
///
/// Children of the root account have a full name equal to their name.
pub fn compute_full_name(
    parent_uid: Option<&Uid>,
    name: &str,
    connection: &Connection,
) -> Result<String, Error> {
    let Some(parent_uid) = parent_uid else {
        return Ok(name.to_owned());
    };

    let (parent_type, parent_full_name): (AccountType, String) = connection
        .query_row(
            "SELECT type, full_name FROM accounts WHERE uid = ?1",
            [parent_uid],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .ok_or_else(|| Error::InvalidParentAccount(parent_uid.clone()))?;

    if parent_type == AccountType::Root {
        Ok(name.to_owned())
    } else {
        Ok(format!("{parent_full_name}{ACCOUNT_NAME_SEPARATOR}{name}"))
    }
}

/// Recompute the full names of every account below `uid`.
pub fn refresh_descendant_full_names(uid: &Uid, connection: &Connection) -> Result<(), Error> {
    for child in get_child_accounts(uid, connection)? {
        let full_name = compute_full_name(Some(uid), child.name(), connection)?;
        connection.execute(
            "UPDATE accounts SET full_name = ?1 WHERE uid = ?2",
            (&full_name, child.uid()),
        )?;
        refresh_descendant_full_names(child.uid(), connection)?;
    }

    Ok(())
}

/// Set the favorite flag of an account.
///
/// # Errors
/// This function will return an [Error::UpdateMissingAccount] if the account does not exist.
pub fn update_favorite(uid: &Uid, favorite: bool, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE accounts SET favorite = ?1 WHERE uid = ?2",
        (favorite, uid),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingAccount);
    }

    Ok(())
}

/// Move the direct children of `uid` under `new_parent_uid` and refresh their full names.
pub fn reassign_children(
    uid: &Uid,
    new_parent_uid: &Uid,
    connection: &Connection,
) -> Result<usize, Error> {
    let moved = connection.execute(
        "UPDATE accounts SET parent_uid = ?1 WHERE parent_uid = ?2",
        (new_parent_uid, uid),
    )?;
    refresh_descendant_full_names(new_parent_uid, connection)?;

    Ok(moved)
}

/// Delete the account row for `uid` and clear references to it as a default
/// transfer account.
///
/// The account must not have children.
pub fn delete_account_row(uid: &Uid, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "UPDATE accounts SET default_transfer_uid = NULL WHERE default_transfer_uid = ?1",
        [uid],
    )?;
    let rows_affected = connection.execute("DELETE FROM accounts WHERE uid = ?1", [uid])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingAccount);
    }

    Ok(())
}

/// Delete the account `uid` and every account below it.
pub fn delete_account_subtree(uid: &Uid, connection: &Connection) -> Result<usize, Error> {
    connection.execute(
        "WITH RECURSIVE subtree(uid) AS (
            SELECT ?1
            UNION ALL
            SELECT a.uid FROM accounts a JOIN subtree s ON a.parent_uid = s.uid
        )
        UPDATE accounts SET default_transfer_uid = NULL WHERE default_transfer_uid IN subtree",
        [uid],
    )?;

    let rows_affected = connection.execute(
        "WITH RECURSIVE subtree(uid) AS (
            SELECT ?1
            UNION ALL
            SELECT a.uid FROM accounts a JOIN subtree s ON a.parent_uid = s.uid
        )
        DELETE FROM accounts WHERE uid IN subtree",
        [uid],
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingAccount);
    }

    Ok(rows_affected)
}

/// Get the UID of the root account, if it has been created.
pub fn find_root_account_uid(connection: &Connection) -> Result<Option<Uid>, Error> {
    connection
        .query_row("SELECT uid FROM accounts WHERE type = 'ROOT'", [], |row| row.get(0))
        .optional()
        .map_err(|error| error.into())
}

/// Get the UID of the root account, creating the root account if it does not exist.
pub fn get_or_create_root_account_uid(connection: &Connection) -> Result<Uid, Error> {
    if let Some(uid) = find_root_account_uid(connection)? {
        return Ok(uid);
    }

    let root = Account::new(ROOT_ACCOUNT_NAME, Commodity::default())?.with_type(AccountType::Root);
    save_account(&root, connection)?;
    tracing::info!("Created root account {}", root.uid());

    Ok(root.uid().clone())
}

/// Get the UID of the top level account that absorbs the imbalance of
/// transactions in `commodity`, creating it if it does not exist.
pub fn get_or_create_imbalance_account_uid(
    commodity: &Commodity,
    connection: &Connection,
) -> Result<Uid, Error> {
    let root_uid = get_or_create_root_account_uid(connection)?;
    let name = format!("Imbalance-{}", commodity.mnemonic());

    if let Some(account) = find_child_by_name(&root_uid, &name, connection)? {
        return Ok(account.uid().clone());
    }

    let account = Account::new(&name, commodity.clone())?
        .with_type(AccountType::Bank)
        .with_parent(root_uid);
    save_account(&account, connection)?;
    tracing::info!("Created imbalance account {name}");

    Ok(account.uid().clone())
}

/// Create any missing accounts along `full_name`, e.g. "Expenses:Food:Groceries",
/// and return the UID of the last one.
///
/// Accounts that already exist are reused, new ones get `account_type` and `commodity`.
pub fn create_account_hierarchy(
    full_name: &str,
    account_type: AccountType,
    commodity: &Commodity,
    connection: &Connection,
) -> Result<Uid, Error> {
    build_account_hierarchy(full_name, account_type, commodity, false, connection)
}

/// Same as [create_account_hierarchy], except that the accounts it creates are
/// flagged as placeholders. Existing accounts keep their flags.
pub fn create_placeholder_hierarchy(
    full_name: &str,
    account_type: AccountType,
    commodity: &Commodity,
    connection: &Connection,
) -> Result<Uid, Error> {
    build_account_hierarchy(full_name, account_type, commodity, true, connection)
}

fn build_account_hierarchy(
    full_name: &str,
    account_type: AccountType,
    commodity: &Commodity,
    placeholder: bool,
    connection: &Connection,
) -> Result<Uid, Error> {
    let mut parent_uid = get_or_create_root_account_uid(connection)?;

    for name in full_name.split(ACCOUNT_NAME_SEPARATOR) {
        let name = validate_account_name(name)?;

        parent_uid = match find_child_by_name(&parent_uid, &name, connection)? {
            Some(existing) => existing.uid().clone(),
            None => {
                let mut account = Account::new(&name, commodity.clone())?
                    .with_type(account_type)
                    .with_parent(parent_uid);
                account.set_placeholder(placeholder);
                save_account(&account, connection)?;
                tracing::debug!("Created account {name} while building {full_name:?}");
                account.uid().clone()
            }
        };
    }

    Ok(parent_uid)
}

fn map_account_row(row: &Row) -> Result<Account, rusqlite::Error> {
    Ok(Account {
        uid: row.get(0)?,
        name: row.get(1)?,
        full_name: row.get(2)?,
        description: row.get(3)?,
        code: row.get(4)?,
        commodity: row.get(5)?,
        account_type: row.get(6)?,
        parent_uid: row.get(7)?,
        default_transfer_uid: row.get(8)?,
        color: row.get(9)?,
        placeholder: row.get(10)?,
        hidden: row.get(11)?,
        favorite: row.get(12)?,
        transactions: Vec::new(),
    })
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_account_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_account_table(&connection));
    }
}
