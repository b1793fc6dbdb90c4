//! Writes the account tree as CSV.

use std::io::Write;

use crate::{Account, AccountType, Error};

const ACCOUNTS_HEADER: [&str; 10] = [
    "type",
    "full_name",
    "name",
    "code",
    "description",
    "color",
    "commodity",
    "hidden",
    "placeholder",
    "favorite",
];

/// Write `accounts` to `writer` as CSV, one row per account after a header row.
///
/// The root account is skipped. Rows are written in the order given, so pass
/// the result of [AccountStore::get_all_records](crate::AccountStore::get_all_records)
/// to get them sorted by full name.
///
/// # Errors
/// Returns an [Error::CsvError] if writing to `writer` fails.
pub fn export_accounts_csv<W: Write>(accounts: &[Account], writer: W) -> Result<(), Error> {
    let mut csv = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv.write_record(ACCOUNTS_HEADER)?;

    let mut row_count = 0;
    for account in accounts
        .iter()
        .filter(|account| account.account_type() != AccountType::Root)
    {
        csv.write_record([
            account.account_type().as_str(),
            account.full_name(),
            account.name(),
            account.code().unwrap_or(""),
            account.description(),
            account.color().unwrap_or(""),
            account.commodity().mnemonic(),
            bool_field(account.is_hidden()),
            bool_field(account.is_placeholder()),
            bool_field(account.is_favorite()),
        ])?;
        row_count += 1;
    }

    csv.flush()
        .map_err(|error| Error::CsvError(error.to_string()))?;
    tracing::debug!("Exported {row_count} accounts as CSV");

    Ok(())
}

fn bool_field(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod export_tests {
    use crate::{Account, AccountType, Commodity, Uid, export_accounts_csv};

    fn export(accounts: &[Account]) -> String {
        let mut buffer = Vec::new();
        export_accounts_csv(accounts, &mut buffer).unwrap();

        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn empty_account_list_writes_header_only() {
        assert_eq!(
            export(&[]),
            "type,full_name,name,code,description,color,commodity,hidden,placeholder,favorite\n"
        );
    }

    #[test]
    fn writes_one_row_per_account() {
        let mut expenses = Account::new("Expenses", Commodity::usd())
            .unwrap()
            .with_type(AccountType::Expense);
        expenses.set_placeholder(true);
        let mut groceries = Account::new("Groceries", Commodity::usd())
            .unwrap()
            .with_type(AccountType::Expense)
            .with_parent(expenses.uid().clone());
        groceries.full_name = "Expenses:Groceries".to_owned();
        groceries.set_code(Some("5100"));
        groceries.set_description("Food, mostly");
        groceries.set_color(Some("#00ff00")).unwrap();
        groceries.set_favorite(true);

        let output = export(&[expenses, groceries]);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "EXPENSE,Expenses,Expenses,,,,USD,false,true,false");
        assert_eq!(
            lines[2],
            "EXPENSE,Expenses:Groceries,Groceries,5100,\"Food, mostly\",#00FF00,USD,false,false,true"
        );
    }

    #[test]
    fn root_account_is_skipped() {
        let mut root = Account::new("Root Account", Commodity::usd())
            .unwrap()
            .with_type(AccountType::Root);
        root.set_uid(Uid::new("root").unwrap());
        let cash = Account::new("Cash", Commodity::usd()).unwrap();

        let output = export(&[root, cash]);

        assert_eq!(output.lines().count(), 2);
        assert!(output.ends_with("CASH,Cash,Cash,,,,USD,false,false,false\n"));
    }
}
