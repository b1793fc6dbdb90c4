use std::{error::Error, fs::File, path::PathBuf, process::exit};

use clap::{Parser, Subcommand};
use time::{Date, OffsetDateTime, macros::format_description};

use ledger_rs::{
    ACCOUNT_NAME_SEPARATOR, Account, AccountStore, AccountType, Commodity, Config, Ledger, Money,
    Split, Transaction, TransactionStore, export_accounts_csv, setup_logging,
};

/// Manage a double-entry ledger stored in a SQLite database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database. Overrides `LEDGER_DB_PATH`.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Currency code for new accounts. Overrides `LEDGER_CURRENCY`.
    #[arg(long, global = true)]
    currency: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the database and its root account.
    Init,

    /// Add an account, creating any missing parent accounts as placeholders of the same type.
    AddAccount {
        /// The full name of the account, e.g. "Expenses:Food:Groceries".
        full_name: String,

        /// The account type, e.g. BANK or EXPENSE.
        #[arg(long = "type", short = 't', default_value = "ASSET")]
        account_type: AccountType,

        #[arg(long, short)]
        description: Option<String>,

        /// An account code such as "1010".
        #[arg(long)]
        code: Option<String>,

        /// A hex color of the form "#RRGGBB".
        #[arg(long)]
        color: Option<String>,

        /// The account only groups other accounts.
        #[arg(long)]
        placeholder: bool,

        #[arg(long)]
        hidden: bool,

        #[arg(long)]
        favorite: bool,
    },

    /// List all accounts with their balances.
    List {
        /// Only list favorite accounts.
        #[arg(long)]
        favorites: bool,

        /// Print the accounts as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the details of an account, given its full name or UID.
    Show { account: String },

    /// Flag an account as a favorite.
    Favorite {
        account: String,

        /// Remove the favorite flag instead.
        #[arg(long)]
        unset: bool,
    },

    /// Delete an account and its transactions.
    Delete {
        account: String,

        /// Also delete all sub-accounts instead of moving them to the parent.
        #[arg(long)]
        recursive: bool,
    },

    /// Print the balance of an account, including its sub-accounts.
    Balance { account: String },

    /// Record a transfer of `amount` from one account to another.
    Record {
        /// The account the money comes out of.
        from: String,

        /// The account the money goes into.
        to: String,

        /// The amount, e.g. "12.50".
        amount: String,

        #[arg(long, short, default_value = "")]
        description: String,

        /// The date of the transaction as YYYY-MM-DD. Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },

    /// Write all accounts to a CSV file.
    Export { path: PathBuf },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(db_path) = args.db_path {
        config.db_path = db_path;
    }
    if let Some(currency) = args.currency {
        config.default_currency = Commodity::new(&currency)?;
    }

    setup_logging(&config)?;

    let ledger = Ledger::open(&config.db_path)?;

    match args.command {
        Command::Init => {
            let root_uid = ledger.accounts().get_or_create_root_account_uid()?;
            println!(
                "Initialized ledger at {} (root account {root_uid})",
                config.db_path.display()
            );
        }
        Command::AddAccount {
            full_name,
            account_type,
            description,
            code,
            color,
            placeholder,
            hidden,
            favorite,
        } => {
            if find_account(&ledger, &full_name)?.is_some() {
                eprintln!("An account named {full_name:?} already exists.");
                exit(1);
            }

            let (parent_name, name) = match full_name.rsplit_once(ACCOUNT_NAME_SEPARATOR) {
                Some((parent_name, name)) => (Some(parent_name), name),
                None => (None, full_name.as_str()),
            };

            let mut account =
                Account::new(name, config.default_currency.clone())?.with_type(account_type);
            if let Some(parent_name) = parent_name {
                let parent_uid = ledger.accounts().create_placeholder_hierarchy(
                    parent_name,
                    account_type,
                    &config.default_currency,
                )?;
                account = account.with_parent(parent_uid);
            }
            if let Some(description) = description {
                account.set_description(&description);
            }
            account.set_code(code.as_deref());
            account.set_color(color.as_deref())?;
            account.set_placeholder(placeholder);
            account.set_hidden(hidden);
            account.set_favorite(favorite);

            ledger.accounts().add_record(&account)?;
            println!("Created account {full_name} ({})", account.uid());
        }
        Command::List { favorites, json } => {
            let accounts = if favorites {
                ledger.accounts().get_favorite_accounts()?
            } else {
                ledger.accounts().get_all_records()?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&accounts)?);
            } else {
                for account in &accounts {
                    let balance = ledger.accounts().get_account_balance(account.uid())?;
                    let star = if account.is_favorite() { "*" } else { " " };
                    println!(
                        "{star} {:<40} {:<10} {:>20}",
                        account.full_name(),
                        account.account_type().as_str(),
                        balance.to_string()
                    );
                }
            }
        }
        Command::Show { account } => {
            let account = require_account(&ledger, &account)?;
            let accounts = ledger.accounts();

            println!("UID:          {}", account.uid());
            println!("Name:         {}", account.name());
            println!("Full name:    {}", account.full_name());
            println!("Type:         {}", account.account_type());
            println!("Currency:     {}", account.commodity());
            println!("Description:  {}", account.description());
            println!("Code:         {}", account.code().unwrap_or("-"));
            println!("Color:        {}", account.color().unwrap_or("-"));
            println!("Placeholder:  {}", account.is_placeholder());
            println!("Hidden:       {}", account.is_hidden());
            println!("Favorite:     {}", account.is_favorite());
            println!(
                "Sub-accounts: {}",
                accounts.get_sub_account_count(account.uid())?
            );
            println!(
                "Transactions: {}",
                ledger
                    .transactions()
                    .count_transactions_for_account(account.uid())?
            );
            println!(
                "Balance:      {}",
                accounts.get_account_balance(account.uid())?
            );
        }
        Command::Favorite { account, unset } => {
            let account = require_account(&ledger, &account)?;
            ledger.accounts().set_favorite(account.uid(), !unset)?;

            if unset {
                println!("Removed {} from favorites", account.full_name());
            } else {
                println!("Added {} to favorites", account.full_name());
            }
        }
        Command::Delete { account, recursive } => {
            let account = require_account(&ledger, &account)?;

            if recursive {
                ledger.accounts().recursive_delete_account(account.uid())?;
            } else {
                ledger.accounts().delete_record(account.uid())?;
            }

            println!("Deleted {}", account.full_name());
        }
        Command::Balance { account } => {
            let account = require_account(&ledger, &account)?;
            let balance = ledger.accounts().get_account_balance(account.uid())?;

            println!("{}: {balance}", account.full_name());
        }
        Command::Record {
            from,
            to,
            amount,
            description,
            date,
        } => {
            let from = require_account(&ledger, &from)?;
            let to = require_account(&ledger, &to)?;
            if from.commodity() != to.commodity() {
                eprintln!(
                    "Cannot transfer between {} ({}) and {} ({}), the currencies differ.",
                    from.full_name(),
                    from.commodity(),
                    to.full_name(),
                    to.commodity()
                );
                exit(1);
            }
            let date = match date {
                Some(date) => Date::parse(&date, format_description!("[year]-[month]-[day]"))?,
                None => OffsetDateTime::now_local()
                    .unwrap_or_else(|_| OffsetDateTime::now_utc())
                    .date(),
            };
            let amount = Money::new(&amount, from.commodity().mnemonic())?;

            let mut transaction = Transaction::new(&description, from.commodity().clone(), date);
            let split = Split::new(-amount.clone(), from.uid().clone());
            let pair = split.create_pair(to.uid().clone());
            transaction.add_split(split);
            transaction.add_split(pair);

            ledger.transactions().add_transaction(&transaction)?;
            println!(
                "Recorded {amount} from {} to {} on {date}",
                from.full_name(),
                to.full_name()
            );
        }
        Command::Export { path } => {
            let accounts = ledger.accounts().get_all_records()?;
            export_accounts_csv(&accounts, File::create(&path)?)?;

            println!("Exported {} accounts to {}", accounts.len(), path.display());
        }
    }

    Ok(())
}

/// Look up an account by its full name, falling back to its UID.
fn find_account(ledger: &Ledger, reference: &str) -> Result<Option<Account>, ledger_rs::Error> {
    let account = ledger
        .accounts()
        .get_all_records()?
        .into_iter()
        .find(|account| account.full_name() == reference || account.uid().as_ref() == reference);

    Ok(account)
}

fn require_account(ledger: &Ledger, reference: &str) -> Result<Account, Box<dyn Error>> {
    match find_account(ledger, reference)? {
        Some(account) => Ok(account),
        None => {
            eprintln!("No account named {reference:?}.");
            exit(1);
        }
    }
}
