use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::macros::date;

use ledger_rs::{
    AccountStore, AccountType, Commodity, Ledger, Money, Split, Transaction, TransactionStore, Uid,
};

/// A utility for creating a test database for the ledger CLI.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let ledger = Ledger::new(Connection::open(output_path)?)?;
    let accounts = ledger.accounts();
    let usd = Commodity::usd();

    println!("Creating test accounts...");

    let checking =
        accounts.create_account_hierarchy("Assets:Current:Checking", AccountType::Bank, &usd)?;
    let wallet =
        accounts.create_account_hierarchy("Assets:Current:Wallet", AccountType::Cash, &usd)?;
    let visa = accounts.create_account_hierarchy("Liabilities:Visa", AccountType::Credit, &usd)?;
    let salary = accounts.create_account_hierarchy("Income:Salary", AccountType::Income, &usd)?;
    let groceries =
        accounts.create_account_hierarchy("Expenses:Food:Groceries", AccountType::Expense, &usd)?;
    let rent = accounts.create_account_hierarchy("Expenses:Rent", AccountType::Expense, &usd)?;
    let opening =
        accounts.create_account_hierarchy("Equity:Opening Balances", AccountType::Equity, &usd)?;

    for placeholder in ["Assets", "Liabilities", "Income", "Expenses", "Equity"] {
        let uid = accounts.create_account_hierarchy(placeholder, AccountType::Asset, &usd)?;
        let mut account = accounts.get_record(&uid)?;
        account.set_placeholder(true);
        accounts.add_record(&account)?;
    }
    accounts.set_favorite(&checking, true)?;
    accounts.set_favorite(&groceries, true)?;

    println!("Creating test transactions...");

    let transfers = [
        (date!(2025 - 01 - 01), "Opening balance", &opening, &checking, "2500.00"),
        (date!(2025 - 01 - 01), "Opening balance", &opening, &wallet, "80.00"),
        (date!(2025 - 01 - 03), "January rent", &checking, &rent, "1450.00"),
        (date!(2025 - 01 - 07), "Supermarket", &visa, &groceries, "112.35"),
        (date!(2025 - 01 - 12), "Farmers market", &wallet, &groceries, "24.50"),
        (date!(2025 - 01 - 15), "Pay", &salary, &checking, "3120.00"),
        (date!(2025 - 01 - 20), "Credit card payment", &checking, &visa, "112.35"),
    ];

    for (date, description, from, to, amount) in transfers {
        record_transfer(ledger.transactions(), date, description, from, to, amount)?;
    }

    println!("Success!");

    Ok(())
}

fn record_transfer(
    transactions: &impl TransactionStore,
    date: time::Date,
    description: &str,
    from: &Uid,
    to: &Uid,
    amount: &str,
) -> Result<(), Box<dyn Error>> {
    let mut transaction = Transaction::new(description, Commodity::usd(), date);
    let split = Split::new(-Money::new(amount, "USD")?, from.clone());
    let pair = split.create_pair(to.clone());
    transaction.add_split(split);
    transaction.add_split(pair);

    transactions.add_transaction(&transaction)?;

    Ok(())
}
